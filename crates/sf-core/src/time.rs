//! Discrete time index.
//!
//! Every signal in a control loop is stamped with the tick at which it was
//! produced. Ticks are consecutive integers; the physical duration of one
//! tick is carried separately (see `SamplingPeriod` in `sf-signal`).

/// Discrete time index of a control cycle.
pub type Tick = i64;

/// The tick following `t`.
#[inline]
pub fn next_tick(t: Tick) -> Tick {
    t + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_tick_increments() {
        assert_eq!(next_tick(0), 1);
        assert_eq!(next_tick(-1), 0);
    }
}
