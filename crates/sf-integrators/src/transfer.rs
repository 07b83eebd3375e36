//! Transfer-function coefficients.

use sf_signal::{SignalError, SignalResult};

/// Linear ODE `A(d/dt) y = B(d/dt) x` given by its coefficients.
///
/// - `numerator` is `[b_0, b_1, …, b_m]`, `b_i` multiplying the i-th
///   derivative of the input.
/// - `denominator` is `[a_0, a_1, …, a_n]`, `a_i` multiplying the i-th
///   derivative of the output. The leading coefficient `a_n` is taken to
///   be one and is never read; callers normalise beforehand.
///
/// Both lists hold at least one coefficient. A single-element denominator
/// is an order-0 system: the output is the weighted input directly.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction<C> {
    numerator: Vec<C>,
    denominator: Vec<C>,
}

impl<C: Clone> TransferFunction<C> {
    /// # Errors
    ///
    /// Returns error if either coefficient list is empty.
    pub fn new(numerator: Vec<C>, denominator: Vec<C>) -> SignalResult<Self> {
        check_numerator(&numerator)?;
        check_denominator(&denominator)?;
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> &[C] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[C] {
        &self.denominator
    }

    /// Order of the output ODE (`denominator.len() - 1`).
    pub fn order(&self) -> usize {
        self.denominator.len() - 1
    }

    pub fn set_numerator(&mut self, numerator: Vec<C>) -> SignalResult<()> {
        check_numerator(&numerator)?;
        self.numerator = numerator;
        Ok(())
    }

    pub fn set_denominator(&mut self, denominator: Vec<C>) -> SignalResult<()> {
        check_denominator(&denominator)?;
        self.denominator = denominator;
        Ok(())
    }

    pub fn push_numerator(&mut self, coef: C) {
        self.numerator.push(coef);
    }

    pub fn push_denominator(&mut self, coef: C) {
        self.denominator.push(coef);
    }

    /// Remove the highest-order numerator coefficient, keeping at least one.
    pub fn pop_numerator(&mut self) -> Option<C> {
        if self.numerator.len() > 1 {
            self.numerator.pop()
        } else {
            None
        }
    }

    /// Remove the highest-order denominator coefficient, keeping at least one.
    pub fn pop_denominator(&mut self) -> Option<C> {
        if self.denominator.len() > 1 {
            self.denominator.pop()
        } else {
            None
        }
    }
}

fn check_numerator<C>(numerator: &[C]) -> SignalResult<()> {
    if numerator.is_empty() {
        return Err(SignalError::InvalidArg {
            what: "numerator needs at least one coefficient",
        });
    }
    Ok(())
}

fn check_denominator<C>(denominator: &[C]) -> SignalResult<()> {
    if denominator.is_empty() {
        return Err(SignalError::InvalidArg {
            what: "denominator needs at least one coefficient",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_from_denominator() {
        let tf = TransferFunction::new(vec![1.0], vec![1.0]).unwrap();
        assert_eq!(tf.order(), 0);
        let tf = TransferFunction::new(vec![1.0], vec![4.0, 2.0, 1.0]).unwrap();
        assert_eq!(tf.order(), 2);
    }

    #[test]
    fn empty_lists_rejected() {
        assert!(TransferFunction::<f64>::new(vec![], vec![1.0]).is_err());
        assert!(TransferFunction::<f64>::new(vec![1.0], vec![]).is_err());
    }

    #[test]
    fn push_and_pop_keep_one_coefficient() {
        let mut tf = TransferFunction::new(vec![1.0], vec![1.0]).unwrap();
        tf.push_denominator(1.0);
        assert_eq!(tf.order(), 1);
        assert_eq!(tf.pop_denominator(), Some(1.0));
        assert_eq!(tf.pop_denominator(), None);
        assert_eq!(tf.pop_numerator(), None);
        assert_eq!(tf.numerator(), &[1.0]);
    }
}
