//! Euler realisation of a transfer function.
//!
//! Each tick the integrator:
//! 1. pulls one input sample `x(t)`
//! 2. estimates `dx/dt, d²x/dt², …` by chaining first-order backward
//!    differences against the previous tick's estimates
//! 3. solves the ODE for the highest output derivative, using the output
//!    derivatives of the previous tick as feedback
//! 4. integrates that derivative down to the output with forward Euler
//!
//! Higher-order denominators drift quickly with this scheme.

use std::fmt;

use nalgebra::{DMatrix, DVector};
use sf_core::Tick;
use sf_signal::{SamplingPeriod, SignalError, SignalResult, SignalSource, TimedSignal};
use tracing::{debug, trace};

use crate::sample::{Coefficient, Sample};
use crate::transfer::TransferFunction;

/// Scalar signal, scalar coefficients.
pub type ScalarIntegrator = EulerIntegrator<f64, f64>;
/// Vector signal, scalar coefficients.
pub type VectorIntegrator = EulerIntegrator<DVector<f64>, f64>;
/// Vector signal, matrix coefficients.
pub type MatrixIntegrator = EulerIntegrator<DVector<f64>, DMatrix<f64>>;

/// Fixed-step transfer-function integrator with memory of past derivatives.
///
/// Must be [`initialize`](Self::initialize)d from a real input sample
/// before the first step, and again after any coefficient change.
///
/// # Example
///
/// ```
/// use sf_integrators::{ScalarIntegrator, TransferFunction};
/// use sf_signal::ConstantSource;
///
/// // First-order lag: y' = x - y
/// let tf = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
/// let mut lag = ScalarIntegrator::new("lag", tf);
/// lag.plug_input(ConstantSource::new(2.0));
/// lag.initialize().unwrap();
///
/// // Settled start: output stays at the input
/// assert_eq!(lag.output(1).unwrap(), 2.0);
/// ```
pub struct EulerIntegrator<S, C> {
    name: String,
    transfer: TransferFunction<C>,
    period: SamplingPeriod,
    input: Option<Box<dyn SignalSource<S>>>,
    /// Slot `i`: i-th derivative estimate of the input.
    input_memory: Vec<S>,
    /// Slot `i`: i-th derivative of the output; slot 0 is the output.
    output_memory: Vec<S>,
    initialized: bool,
    /// Last tick the input was pulled at.
    time: Tick,
    output: Option<TimedSignal<S>>,
}

impl<S: Sample, C: Coefficient<S>> EulerIntegrator<S, C> {
    /// Create an integrator with the default 5 ms sampling period.
    pub fn new(name: impl Into<String>, transfer: TransferFunction<C>) -> Self {
        Self {
            name: name.into(),
            transfer,
            period: SamplingPeriod::default(),
            input: None,
            input_memory: Vec::new(),
            output_memory: Vec::new(),
            initialized: false,
            time: 0,
            output: None,
        }
    }

    /// Builder-style sampling period.
    pub fn with_sampling_period(mut self, period: SamplingPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Connect the input signal.
    pub fn plug_input(&mut self, source: impl SignalSource<S> + 'static) {
        self.input = Some(Box::new(source));
    }

    pub fn is_plugged(&self) -> bool {
        self.input.is_some()
    }

    /// Set the sampling period in seconds; the reciprocal is recomputed.
    pub fn set_sampling_period(&mut self, dt: f64) -> SignalResult<()> {
        self.period = SamplingPeriod::new(dt)?;
        Ok(())
    }

    pub fn sampling_period(&self) -> f64 {
        self.period.dt()
    }

    pub fn transfer_function(&self) -> &TransferFunction<C> {
        &self.transfer
    }

    /// Replace the coefficients. History is invalidated.
    pub fn set_transfer_function(&mut self, transfer: TransferFunction<C>) {
        self.transfer = transfer;
        self.invalidate();
    }

    pub fn set_numerator(&mut self, numerator: Vec<C>) -> SignalResult<()> {
        self.transfer.set_numerator(numerator)?;
        self.invalidate();
        Ok(())
    }

    pub fn set_denominator(&mut self, denominator: Vec<C>) -> SignalResult<()> {
        self.transfer.set_denominator(denominator)?;
        self.invalidate();
        Ok(())
    }

    pub fn push_numerator(&mut self, coef: C) {
        self.transfer.push_numerator(coef);
        self.invalidate();
    }

    pub fn push_denominator(&mut self, coef: C) {
        self.transfer.push_denominator(coef);
        self.invalidate();
    }

    pub fn pop_numerator(&mut self) -> Option<C> {
        let popped = self.transfer.pop_numerator();
        if popped.is_some() {
            self.invalidate();
        }
        popped
    }

    pub fn pop_denominator(&mut self) -> Option<C> {
        let popped = self.transfer.pop_denominator();
        if popped.is_some() {
            self.invalidate();
        }
        popped
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Input derivative estimates from the last step.
    pub fn input_memory(&self) -> &[S] {
        &self.input_memory
    }

    /// Output and its derivatives from the last step.
    pub fn output_memory(&self) -> &[S] {
        &self.output_memory
    }

    /// Reset the history from one fresh input sample.
    ///
    /// The sample is copied into every input slot and every output slot,
    /// i.e. the system is assumed to start settled. Systems whose initial
    /// derivatives are not equal to the input see a start-up transient.
    pub fn initialize(&mut self) -> SignalResult<()> {
        let x0 = self.pull(self.time)?;
        self.input_memory = vec![x0.clone(); self.transfer.numerator().len()];
        self.output_memory = vec![x0; self.transfer.denominator().len()];
        self.initialized = true;
        self.output = None;
        debug!(
            integrator = %self.name,
            time = self.time,
            order = self.transfer.order(),
            "integrator memory initialised"
        );
        Ok(())
    }

    /// Advance one step and return the new output.
    ///
    /// Pulls exactly one input sample at `time`. Not idempotent: calling it
    /// twice for the same tick advances the system twice. Use
    /// [`output`](Self::output) for cached access.
    pub fn integrate(&mut self, time: Tick) -> SignalResult<S> {
        self.ensure_initialized()?;
        let sample = self.pull(time)?;
        self.time = time;

        let num = self.transfer.numerator();
        let den = self.transfer.denominator();
        let dt = self.period.dt();
        let inv_dt = self.period.inverse();

        // Step 1: sum = b_0 x
        let mut previous = std::mem::replace(&mut self.input_memory[0], sample);
        let mut sum = num[0].times(&self.input_memory[0]);

        // Step 2: sum += b_i d^i x / dt^i
        for i in 1..num.len() {
            let mut diff = self.input_memory[i - 1].clone();
            diff.subtract(&previous);
            diff.rescale(inv_dt);
            previous = std::mem::replace(&mut self.input_memory[i], diff);
            sum.accumulate(&num[i].times(&self.input_memory[i]));
        }

        // Step 3: sum -= a_i d^i y / dt^i, i < n
        let order = den.len() - 1;
        for (coef, y) in den[..order].iter().zip(&self.output_memory) {
            sum.subtract(&coef.times(y));
        }

        // Step 4: d^n y / dt^n = sum, then integrate down to y
        self.output_memory[order] = sum;
        for i in (0..order).rev() {
            let mut step = self.output_memory[i + 1].clone();
            step.rescale(dt);
            self.output_memory[i].accumulate(&step);
        }

        trace!(integrator = %self.name, time, "integrated");
        Ok(self.output_memory[0].clone())
    }

    /// Output at tick `time`, integrating at most once per tick.
    pub fn output(&mut self, time: Tick) -> SignalResult<S> {
        if let Some(out) = &self.output {
            if out.time() == time {
                return Ok(out.value().clone());
            }
        }
        let y = self.integrate(time)?;
        self.output = Some(TimedSignal::at(y.clone(), time));
        Ok(y)
    }

    /// First derivative of the output at tick `time`.
    ///
    /// # Errors
    ///
    /// [`SignalError::InsufficientOrder`] if the denominator has fewer than
    /// two coefficients; the system then has no derivative state.
    pub fn derivative(&mut self, time: Tick) -> SignalResult<S> {
        let len = self.transfer.denominator().len();
        if len < 2 {
            return Err(SignalError::InsufficientOrder { len });
        }
        self.output(time)?;
        Ok(self.output_memory[1].clone())
    }

    fn pull(&mut self, time: Tick) -> SignalResult<S> {
        match self.input.as_mut() {
            Some(source) => source.access(time),
            None => Err(SignalError::NoSource {
                what: format!("{}.input", self.name),
            }),
        }
    }

    fn ensure_initialized(&self) -> SignalResult<()> {
        let sized = self.input_memory.len() == self.transfer.numerator().len()
            && self.output_memory.len() == self.transfer.denominator().len();
        if self.initialized && sized {
            Ok(())
        } else {
            Err(SignalError::NotInitialized {
                what: format!("integrator '{}'", self.name),
            })
        }
    }

    fn invalidate(&mut self) {
        self.initialized = false;
        self.output = None;
        debug!(integrator = %self.name, "coefficients changed, memory invalidated");
    }
}

impl<S: fmt::Debug, C: fmt::Debug> fmt::Debug for EulerIntegrator<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EulerIntegrator")
            .field("name", &self.name)
            .field("transfer", &self.transfer)
            .field("period", &self.period)
            .field("plugged", &self.input.is_some())
            .field("initialized", &self.initialized)
            .field("output_memory", &self.output_memory)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_signal::{ConstantSource, FnSource, SampledSequence};

    fn scalar(num: Vec<f64>, den: Vec<f64>) -> ScalarIntegrator {
        ScalarIntegrator::new("test", TransferFunction::new(num, den).unwrap())
    }

    #[test]
    fn unit_gain_passes_input_through() {
        let mut int = scalar(vec![1.0], vec![1.0]);
        int.plug_input(SampledSequence::new(vec![0.0, 1.5, -2.0, 4.0]).unwrap());
        int.initialize().unwrap();

        assert_eq!(int.integrate(1).unwrap(), 1.5);
        assert_eq!(int.integrate(2).unwrap(), -2.0);
        assert_eq!(int.integrate(3).unwrap(), 4.0);
    }

    #[test]
    fn first_order_lag_single_step() {
        // y' = x - y, dt = 5 ms, step from 0 to 1
        let mut int = scalar(vec![1.0], vec![1.0, 1.0]);
        int.plug_input(SampledSequence::new(vec![0.0, 1.0]).unwrap());
        int.initialize().unwrap();

        let y = int.integrate(1).unwrap();
        assert!((y - 0.005).abs() < 1e-15);
        assert!((int.output_memory()[1] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn differentiator_tracks_ramp_slope() {
        let mut int = scalar(vec![0.0, 1.0], vec![1.0]);
        int.set_sampling_period(0.01).unwrap();
        int.plug_input(FnSource::new(|t: Tick| t as f64));
        int.initialize().unwrap();

        for t in 1..10 {
            let y = int.integrate(t).unwrap();
            assert!((y - 100.0).abs() < 1e-9, "t={t}: {y}");
        }
    }

    #[test]
    fn input_memory_holds_backward_differences() {
        let mut int = scalar(vec![1.0, 0.0, 0.0], vec![1.0]);
        int.set_sampling_period(0.5).unwrap();
        int.plug_input(SampledSequence::new(vec![0.0, 1.0, 3.0]).unwrap());
        int.initialize().unwrap();

        int.integrate(1).unwrap();
        assert_eq!(int.input_memory(), &[1.0, 2.0, 4.0]);
        int.integrate(2).unwrap();
        // dx = (3 - 1) / 0.5, d2x = (4 - 2) / 0.5
        assert_eq!(int.input_memory(), &[3.0, 4.0, 4.0]);
    }

    #[test]
    fn integrate_before_initialize_fails() {
        let mut int = scalar(vec![1.0], vec![1.0]);
        int.plug_input(ConstantSource::new(1.0));
        assert!(matches!(
            int.integrate(1),
            Err(SignalError::NotInitialized { .. })
        ));
    }

    #[test]
    fn unplugged_input_fails() {
        let mut int = scalar(vec![1.0], vec![1.0]);
        assert!(matches!(int.initialize(), Err(SignalError::NoSource { .. })));
    }

    #[test]
    fn coefficient_change_requires_reinitialize() {
        let mut int = scalar(vec![1.0], vec![1.0]);
        int.plug_input(ConstantSource::new(1.0));
        int.initialize().unwrap();
        int.integrate(1).unwrap();

        int.push_denominator(1.0);
        assert!(!int.is_initialized());
        assert!(int.integrate(2).is_err());

        int.initialize().unwrap();
        assert_eq!(int.integrate(2).unwrap(), 1.0);
    }

    #[test]
    fn output_is_cached_per_tick() {
        let mut int = scalar(vec![1.0], vec![1.0, 1.0]);
        int.plug_input(ConstantSource::new(1.0));
        int.set_numerator(vec![2.0]).unwrap();
        int.initialize().unwrap();

        let first = int.output(1).unwrap();
        let again = int.output(1).unwrap();
        assert_eq!(first, again);

        let next = int.output(2).unwrap();
        assert_ne!(first, next);
    }

    #[test]
    fn derivative_requires_order_one() {
        let mut int = scalar(vec![1.0], vec![1.0]);
        int.plug_input(ConstantSource::new(1.0));
        int.initialize().unwrap();
        assert_eq!(
            int.derivative(1),
            Err(SignalError::InsufficientOrder { len: 1 })
        );
    }

    #[test]
    fn derivative_reads_first_slot_without_extra_step() {
        let mut int = scalar(vec![1.0], vec![1.0, 1.0]);
        int.plug_input(SampledSequence::new(vec![0.0, 1.0]).unwrap());
        int.initialize().unwrap();

        let dy = int.derivative(1).unwrap();
        assert!((dy - 1.0).abs() < 1e-15);
        // output(1) was already computed by derivative(1)
        let y = int.output(1).unwrap();
        assert!((y - 0.005).abs() < 1e-15);
        assert_eq!(int.derivative(1).unwrap(), dy);
    }
}
