//! Arithmetic required from integrated signals and their coefficients.

use std::fmt;

use nalgebra::{DMatrix, DVector};

/// A signal value that can be accumulated and scaled in place.
pub trait Sample: Clone + fmt::Debug {
    /// `self += rhs`
    fn accumulate(&mut self, rhs: &Self);

    /// `self -= rhs`
    fn subtract(&mut self, rhs: &Self);

    /// `self *= k`
    fn rescale(&mut self, k: f64);
}

impl Sample for f64 {
    fn accumulate(&mut self, rhs: &Self) {
        *self += *rhs;
    }

    fn subtract(&mut self, rhs: &Self) {
        *self -= *rhs;
    }

    fn rescale(&mut self, k: f64) {
        *self *= k;
    }
}

impl Sample for DVector<f64> {
    fn accumulate(&mut self, rhs: &Self) {
        self.axpy(1.0, rhs, 1.0);
    }

    fn subtract(&mut self, rhs: &Self) {
        self.axpy(-1.0, rhs, 1.0);
    }

    fn rescale(&mut self, k: f64) {
        self.scale_mut(k);
    }
}

/// A transfer-function coefficient acting on samples of type `S`.
pub trait Coefficient<S>: Clone + fmt::Debug {
    /// Coefficient times sample.
    fn times(&self, sample: &S) -> S;
}

impl Coefficient<f64> for f64 {
    fn times(&self, sample: &f64) -> f64 {
        self * sample
    }
}

impl Coefficient<DVector<f64>> for f64 {
    fn times(&self, sample: &DVector<f64>) -> DVector<f64> {
        sample.scale(*self)
    }
}

impl Coefficient<DVector<f64>> for DMatrix<f64> {
    fn times(&self, sample: &DVector<f64>) -> DVector<f64> {
        self * sample
    }
}
