//! Input side of a block: something that yields one sample per tick.
//!
//! Sources are pulled synchronously by the block that owns them. A source
//! may recompute lazily, but a pull always returns before the caller
//! continues; there is no notion of a missed tick.

use sf_core::Tick;

use crate::error::{SignalError, SignalResult};

/// Signal source trait for anything that can be sampled at a given tick.
pub trait SignalSource<T> {
    /// Return the sample for tick `time`.
    fn access(&mut self, time: Tick) -> SignalResult<T>;
}

impl<T, S: SignalSource<T> + ?Sized> SignalSource<T> for Box<S> {
    fn access(&mut self, time: Tick) -> SignalResult<T> {
        (**self).access(time)
    }
}

/// Source that returns the same value at every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSource<T> {
    value: T,
}

impl<T: Clone> ConstantSource<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: Clone> SignalSource<T> for ConstantSource<T> {
    fn access(&mut self, _time: Tick) -> SignalResult<T> {
        Ok(self.value.clone())
    }
}

/// Source replaying a recorded sequence, one sample per tick.
///
/// Tick `t` reads sample `t`. Ticks before the start read the first
/// sample, ticks past the end hold the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSequence<T> {
    samples: Vec<T>,
}

impl<T: Clone> SampledSequence<T> {
    /// Create a sequence source.
    ///
    /// # Errors
    ///
    /// Returns error if `samples` is empty.
    pub fn new(samples: Vec<T>) -> SignalResult<Self> {
        if samples.is_empty() {
            return Err(SignalError::InvalidArg {
                what: "sequence must contain at least one sample",
            });
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl<T: Clone> SignalSource<T> for SampledSequence<T> {
    fn access(&mut self, time: Tick) -> SignalResult<T> {
        let last = self.samples.len() - 1;
        let index = usize::try_from(time).map_or(0, |t| t.min(last));
        Ok(self.samples[index].clone())
    }
}

/// Source backed by a closure of the tick.
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F: FnMut(Tick) -> T> SignalSource<T> for FnSource<F> {
    fn access(&mut self, time: Tick) -> SignalResult<T> {
        Ok((self.f)(time))
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnSource")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_source_ignores_time() {
        let mut src = ConstantSource::new(3.0);
        assert_eq!(src.access(0).unwrap(), 3.0);
        assert_eq!(src.access(1000).unwrap(), 3.0);
        src.set(-1.0);
        assert_eq!(src.access(1).unwrap(), -1.0);
    }

    #[test]
    fn sequence_clamps_at_both_ends() {
        let mut src = SampledSequence::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(src.access(-5).unwrap(), 1.0);
        assert_eq!(src.access(0).unwrap(), 1.0);
        assert_eq!(src.access(1).unwrap(), 2.0);
        assert_eq!(src.access(2).unwrap(), 3.0);
        assert_eq!(src.access(99).unwrap(), 3.0);
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(SampledSequence::<f64>::new(vec![]).is_err());
    }

    #[test]
    fn fn_source_sees_tick() {
        let mut src = FnSource::new(|t: Tick| t as f64 * 0.5);
        assert_eq!(src.access(4).unwrap(), 2.0);
    }

    #[test]
    fn boxed_source_forwards() {
        let mut src: Box<dyn SignalSource<f64>> = Box::new(ConstantSource::new(7.0));
        assert_eq!(src.access(3).unwrap(), 7.0);
    }
}
