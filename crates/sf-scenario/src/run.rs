//! Fixed-step scenario runner.

use serde::{Deserialize, Serialize};
use sf_core::Tick;
use sf_device::{Device, FREE_FLYER_DOF};
use tracing::{info, trace};

use crate::build::{build_device, build_integrator};
use crate::schema::Scenario;
use crate::validate::{ValidationError, validate_scenario};
use crate::{ScenarioError, ScenarioResult};

/// Values recorded after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFrame {
    pub tick: Tick,
    pub time_s: f64,
    /// Device state, empty without a device.
    pub state: Vec<f64>,
    /// Published device velocity, laid out like `state`.
    pub velocity: Vec<f64>,
    /// One output per integrator, in scenario order.
    pub outputs: Vec<f64>,
}

/// Time series produced by [`run_scenario`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub state_size: usize,
    pub integrator_ids: Vec<String>,
    pub frames: Vec<ScenarioFrame>,
}

impl ScenarioRecord {
    /// Column names: `tick`, `time_s`, `q0..`, `v0..`, then integrator ids.
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec!["tick".to_string(), "time_s".to_string()];
        columns.extend((0..self.state_size).map(|i| format!("q{i}")));
        columns.extend((0..self.state_size).map(|i| format!("v{i}")));
        columns.extend(self.integrator_ids.iter().cloned());
        columns
    }

    pub fn to_csv(&self) -> String {
        let mut csv = self.header().join(",");
        csv.push('\n');
        for frame in &self.frames {
            let mut row = vec![frame.tick.to_string(), frame.time_s.to_string()];
            row.extend(frame.state.iter().map(f64::to_string));
            row.extend(frame.velocity.iter().map(f64::to_string));
            row.extend(frame.outputs.iter().map(f64::to_string));
            csv.push_str(&row.join(","));
            csv.push('\n');
        }
        csv
    }

    /// `(time_s, value)` pairs of one column, by header name.
    pub fn series(&self, column: &str) -> Option<Vec<(f64, f64)>> {
        let index = self.header().iter().position(|c| c == column)?.checked_sub(2)?;
        let n = self.state_size;
        let pick = |frame: &ScenarioFrame| -> Option<f64> {
            if index < n {
                frame.state.get(index).copied()
            } else if index < 2 * n {
                frame.velocity.get(index - n).copied()
            } else {
                frame.outputs.get(index - 2 * n).copied()
            }
        };
        self.frames
            .iter()
            .map(|f| pick(f).map(|v| (f.time_s, v)))
            .collect()
    }
}

/// Published velocity padded to the state layout. A joint-only velocity
/// lands in `[6..]`, the free-flyer part reads as zero.
fn velocity_row(device: &Device) -> Vec<f64> {
    let n = device.state().len();
    let v = device.velocity_signal().value();
    if v.len() == n {
        return v.iter().copied().collect();
    }
    let mut row = vec![0.0; n];
    if v.len() + FREE_FLYER_DOF == n {
        row[FREE_FLYER_DOF..].copy_from_slice(v.as_slice());
    }
    row
}

/// Validate, build and run a scenario for `steps` ticks.
///
/// Every integrator is initialised from its input at tick 0, which is
/// recorded as the first frame. Each following tick increments the device
/// by `period_s` and evaluates every integrator output at that tick.
///
/// # Errors
///
/// Returns error if the scenario is invalid or a tick fails.
pub fn run_scenario(scenario: &Scenario) -> ScenarioResult<ScenarioRecord> {
    validate_scenario(scenario)?;
    let steps = Tick::try_from(scenario.steps).map_err(|_| {
        ScenarioError::Validation(ValidationError::InvalidValue {
            field: "steps".to_string(),
            value: scenario.steps.to_string(),
            reason: "too many steps".to_string(),
        })
    })?;

    let mut device = scenario.device.as_ref().map(build_device).transpose()?;
    let mut integrators = scenario
        .integrators
        .iter()
        .map(|def| build_integrator(def, scenario.period_s))
        .collect::<ScenarioResult<Vec<_>>>()?;
    for integrator in &mut integrators {
        integrator.initialize()?;
    }

    info!(
        scenario = %scenario.name,
        steps,
        period_s = scenario.period_s,
        integrators = integrators.len(),
        "scenario started"
    );

    let mut record = ScenarioRecord {
        name: scenario.name.clone(),
        state_size: device.as_ref().map_or(0, |d| d.state().len()),
        integrator_ids: integrators.iter().map(|i| i.name().to_string()).collect(),
        frames: Vec::with_capacity(scenario.steps.saturating_add(1).min(1 << 20) as usize),
    };

    let outputs = integrators
        .iter()
        .map(|i| i.output_memory().first().copied().unwrap_or_default())
        .collect();
    record.frames.push(frame(0, scenario.period_s, device.as_ref(), outputs));

    for tick in 1..=steps {
        if let Some(device) = device.as_mut() {
            device.increment(scenario.period_s)?;
        }
        let outputs = integrators
            .iter_mut()
            .map(|i| i.output(tick))
            .collect::<Result<Vec<_>, _>>()?;
        record.frames.push(frame(tick, scenario.period_s, device.as_ref(), outputs));
        trace!(tick, "scenario tick recorded");
    }

    info!(scenario = %scenario.name, frames = record.frames.len(), "scenario finished");
    Ok(record)
}

fn frame(tick: Tick, period_s: f64, device: Option<&Device>, outputs: Vec<f64>) -> ScenarioFrame {
    ScenarioFrame {
        tick,
        time_s: tick as f64 * period_s,
        state: device.map(|d| d.state().iter().copied().collect()).unwrap_or_default(),
        velocity: device.map(velocity_row).unwrap_or_default(),
        outputs,
    }
}
