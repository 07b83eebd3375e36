//! Integration tests: transfer-function integrators driven tick by tick.
//!
//! Covers:
//! - Settled start stays settled for unity-gain systems
//! - Step responses of first- and second-order lags converge
//! - Pure differentiator on a ramp
//! - Vector signals with scalar and matrix coefficients

use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;
use sf_core::Tick;
use sf_integrators::{
    MatrixIntegrator, ScalarIntegrator, TransferFunction, VectorIntegrator,
};
use sf_signal::{ConstantSource, FnSource, SamplingPeriod};

fn step_input(at: Tick) -> FnSource<impl FnMut(Tick) -> f64> {
    FnSource::new(move |t: Tick| if t >= at { 1.0 } else { 0.0 })
}

#[test]
fn constant_input_after_initialize_is_steady() {
    let tf = TransferFunction::new(vec![1.0], vec![1.0]).unwrap();
    let mut int = ScalarIntegrator::new("gain", tf);
    int.plug_input(ConstantSource::new(0.75));
    int.initialize().unwrap();

    for t in 1..=50 {
        assert_eq!(int.output(t).unwrap(), 0.75);
    }
}

#[test]
fn first_order_lag_step_response_converges() {
    let tf = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
    let mut lag = ScalarIntegrator::new("lag", tf);
    lag.plug_input(step_input(1));
    lag.initialize().unwrap();

    let mut y = 0.0;
    let mut prev = 0.0;
    for t in 1..=2000 {
        y = lag.output(t).unwrap();
        assert!(y >= prev, "lag response must be monotonic");
        prev = y;
    }
    // 10 s with tau = 1 s
    assert!((y - 1.0).abs() < 1e-3, "y = {y}");
}

#[test]
fn critically_damped_second_order_settles() {
    // y'' + 2 y' + y = x
    let tf = TransferFunction::new(vec![1.0], vec![1.0, 2.0, 1.0]).unwrap();
    let mut int = ScalarIntegrator::new("second_order", tf);
    int.plug_input(step_input(1));
    int.initialize().unwrap();

    let mut y = 0.0;
    for t in 1..=4000 {
        y = int.output(t).unwrap();
    }
    assert!((y - 1.0).abs() < 1e-3, "y = {y}");
    assert!(int.derivative(4000).unwrap().abs() < 1e-3);
}

#[test]
fn differentiator_on_ramp() {
    // Ramp rising by one per tick at dt = 10 ms has slope 100 /s.
    let tf = TransferFunction::new(vec![0.0, 1.0], vec![1.0]).unwrap();
    let mut int = ScalarIntegrator::new("diff", tf)
        .with_sampling_period(SamplingPeriod::new(0.01).unwrap());
    int.plug_input(FnSource::new(|t: Tick| t as f64));
    int.initialize().unwrap();

    for t in 1..20 {
        let y = int.output(t).unwrap();
        assert!((y - 100.0).abs() < 1e-9);
    }
}

#[test]
fn vector_lag_with_scalar_coefficients() {
    let tf = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
    let mut int = VectorIntegrator::new("vec_lag", tf);
    int.plug_input(ConstantSource::new(DVector::from_vec(vec![1.0, -2.0, 0.5])));
    int.initialize().unwrap();

    let y = int.output(1).unwrap();
    assert_eq!(y, DVector::from_vec(vec![1.0, -2.0, 0.5]));
}

#[test]
fn matrix_coefficients_mix_components() {
    let swap = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
    let tf = TransferFunction::new(vec![swap], vec![DMatrix::identity(2, 2)]).unwrap();
    let mut int = MatrixIntegrator::new("swap", tf);
    int.plug_input(FnSource::new(|t: Tick| DVector::from_vec(vec![t as f64, -(t as f64)])));
    int.initialize().unwrap();

    let y = int.output(3).unwrap();
    assert_eq!(y, DVector::from_vec(vec![-3.0, 3.0]));
}

proptest! {
    #[test]
    fn unity_dc_gain_lag_stays_settled(
        c in -100.0_f64..100.0,
        k in 0.1_f64..10.0,
        dt in 0.001_f64..0.1,
    ) {
        // k y + y' = k x has unit static gain.
        let tf = TransferFunction::new(vec![k], vec![k, 1.0]).unwrap();
        let mut int = ScalarIntegrator::new("lag", tf);
        int.set_sampling_period(dt).unwrap();
        int.plug_input(ConstantSource::new(c));
        int.initialize().unwrap();

        for t in 1..20 {
            let y = int.output(t).unwrap();
            prop_assert!((y - c).abs() <= 1e-9 * c.abs().max(1.0));
        }
    }
}
