//! Discrete-time transfer-function integrators.
//!
//! Provides:
//! - [`Sample`] / [`Coefficient`]: the arithmetic an integrator needs from
//!   its signal and coefficient types
//! - [`TransferFunction`]: numerator/denominator coefficients of `B(s)/A(s)`
//! - [`EulerIntegrator`]: fixed-step realisation using chained backward
//!   differences on the input and repeated forward Euler on the output

pub mod euler;
pub mod sample;
pub mod transfer;

pub use euler::{EulerIntegrator, MatrixIntegrator, ScalarIntegrator, VectorIntegrator};
pub use sample::{Coefficient, Sample};
pub use transfer::TransferFunction;
