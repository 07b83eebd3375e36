//! Time-stamped output values.

use sf_core::Tick;

/// Output port holding the last published value and the tick it belongs to.
///
/// Downstream readers compare [`TimedSignal::time`] against the tick they
/// are computing to decide whether the value is fresh.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSignal<T> {
    value: T,
    time: Tick,
}

impl<T> TimedSignal<T> {
    /// Create a port holding `value` at tick 0.
    pub fn new(value: T) -> Self {
        Self { value, time: 0 }
    }

    /// Create a port holding `value` stamped with `time`.
    pub fn at(value: T, time: Tick) -> Self {
        Self { value, time }
    }

    /// Replace the held value without touching the time stamp.
    pub fn set_constant(&mut self, value: T) {
        self.value = value;
    }

    /// Move the time stamp.
    pub fn set_time(&mut self, time: Tick) {
        self.time = time;
    }

    /// Replace the value and stamp it with `time`.
    pub fn publish(&mut self, value: T, time: Tick) {
        self.value = value;
        self.time = time;
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn time(&self) -> Tick {
        self.time
    }
}

impl<T: Default> Default for TimedSignal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_sets_value_and_time() {
        let mut port = TimedSignal::new(1.0);
        assert_eq!(port.time(), 0);

        port.publish(2.5, 7);
        assert_eq!(*port.value(), 2.5);
        assert_eq!(port.time(), 7);
    }

    #[test]
    fn set_constant_keeps_time() {
        let mut port = TimedSignal::new(vec![0.0; 3]);
        port.set_time(4);
        port.set_constant(vec![1.0; 3]);
        assert_eq!(port.time(), 4);
        assert_eq!(port.value(), &vec![1.0; 3]);
    }
}
