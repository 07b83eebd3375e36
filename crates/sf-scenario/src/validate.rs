//! Scenario validation logic.

use std::collections::HashSet;

use sf_device::{ControlInputMode, FREE_FLYER_DOF};

use crate::schema::{DeviceDef, IntegratorDef, ScalarSourceDef, Scenario, VectorSourceDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }
    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }
    check_period("period_s", scenario.period_s)?;

    if let Some(device) = &scenario.device {
        validate_device(device)?;
    }

    let mut ids = HashSet::new();
    for integrator in &scenario.integrators {
        if !ids.insert(&integrator.id) {
            return Err(ValidationError::DuplicateId {
                id: integrator.id.clone(),
                context: "integrators".to_string(),
            });
        }
        validate_integrator(integrator)?;
    }

    Ok(())
}

fn check_period(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, value, "must be finite and positive"));
    }
    Ok(())
}

fn check_finite(field: &str, values: &[f64]) -> Result<(), ValidationError> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(invalid(field, v, "must be finite"));
    }
    Ok(())
}

fn validate_device(device: &DeviceDef) -> Result<(), ValidationError> {
    let config = &device.config;
    config
        .validate()
        .map_err(|e| invalid(format!("device '{}'", config.name), config.state_size, &e.to_string()))?;

    let field = format!("device '{}' control", config.name);
    let width = device
        .control
        .width()
        .ok_or_else(|| invalid(&field, "sequence", "samples must be non-empty and of equal width"))?;

    let joints = config.state_size - FREE_FLYER_DOF;
    let fits = match config.control_input {
        ControlInputMode::Position => width == joints,
        ControlInputMode::Velocity | ControlInputMode::Acceleration => {
            width == joints || width == config.state_size
        }
    };
    if !fits {
        return Err(invalid(
            &field,
            width,
            "control width must match the joints (or the full state outside position mode)",
        ));
    }

    match &device.control {
        VectorSourceDef::Constant { values } => check_finite(&field, values)?,
        VectorSourceDef::Sequence { samples } => {
            for s in samples {
                check_finite(&field, s)?;
            }
        }
        VectorSourceDef::Motion { params } => {
            if let Some(p) = params.iter().find(|p| p.period <= 0) {
                return Err(invalid(format!("{field} period"), p.period, "must be positive"));
            }
        }
    }
    Ok(())
}

fn validate_integrator(integrator: &IntegratorDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("integrator '{}' {name}", integrator.id);

    if integrator.id.trim().is_empty() {
        return Err(invalid("integrator id", "", "must not be empty"));
    }
    if integrator.numerator.is_empty() {
        return Err(invalid(field("numerator"), "[]", "needs at least one coefficient"));
    }
    if integrator.denominator.is_empty() {
        return Err(invalid(field("denominator"), "[]", "needs at least one coefficient"));
    }
    check_finite(&field("numerator"), &integrator.numerator)?;
    check_finite(&field("denominator"), &integrator.denominator)?;
    if let Some(dt) = integrator.sampling_period_s {
        check_period(&field("sampling_period_s"), dt)?;
    }

    match &integrator.input {
        ScalarSourceDef::Constant { value } => check_finite(&field("input"), &[*value])?,
        ScalarSourceDef::Ramp { start, slope } => check_finite(&field("input"), &[*start, *slope])?,
        ScalarSourceDef::Sequence { samples } => {
            if samples.is_empty() {
                return Err(invalid(field("input"), "[]", "sequence must not be empty"));
            }
            check_finite(&field("input"), samples)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_device::DeviceConfig;

    fn scenario() -> Scenario {
        Scenario {
            version: LATEST_VERSION,
            name: "test".to_string(),
            period_s: 0.01,
            steps: 10,
            device: None,
            integrators: vec![],
        }
    }

    fn lag(id: &str) -> IntegratorDef {
        IntegratorDef {
            id: id.to_string(),
            numerator: vec![1.0],
            denominator: vec![1.0, 1.0],
            sampling_period_s: None,
            input: ScalarSourceDef::Constant { value: 1.0 },
        }
    }

    fn device(mode: ControlInputMode, values: Vec<f64>) -> DeviceDef {
        DeviceDef {
            config: DeviceConfig {
                control_input: mode,
                ..DeviceConfig::new("robot", 8)
            },
            control: VectorSourceDef::Constant { values },
        }
    }

    #[test]
    fn accepts_minimal_scenario() {
        validate_scenario(&scenario()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let s = Scenario {
            version: LATEST_VERSION + 1,
            ..scenario()
        };
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_bad_period() {
        for period_s in [0.0, -0.1, f64::NAN] {
            let s = Scenario {
                period_s,
                ..scenario()
            };
            assert!(validate_scenario(&s).is_err());
        }
    }

    #[test]
    fn rejects_duplicate_integrators() {
        let s = Scenario {
            integrators: vec![lag("a"), lag("a")],
            ..scenario()
        };
        assert!(matches!(
            validate_scenario(&s),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_empty_coefficients() {
        let mut def = lag("a");
        def.denominator.clear();
        let s = Scenario {
            integrators: vec![def],
            ..scenario()
        };
        assert!(validate_scenario(&s).is_err());
    }

    #[test]
    fn control_width_follows_mode() {
        let ok = [
            device(ControlInputMode::Position, vec![0.0; 2]),
            device(ControlInputMode::Velocity, vec![0.0; 2]),
            device(ControlInputMode::Velocity, vec![0.0; 8]),
            device(ControlInputMode::Acceleration, vec![0.0; 8]),
        ];
        for d in ok {
            let s = Scenario {
                device: Some(d),
                ..scenario()
            };
            validate_scenario(&s).unwrap();
        }

        let bad = [
            device(ControlInputMode::Position, vec![0.0; 8]),
            device(ControlInputMode::Velocity, vec![0.0; 3]),
        ];
        for d in bad {
            let s = Scenario {
                device: Some(d),
                ..scenario()
            };
            assert!(validate_scenario(&s).is_err());
        }
    }

    #[test]
    fn rejects_ragged_sequence() {
        let s = Scenario {
            device: Some(DeviceDef {
                config: DeviceConfig::new("robot", 7),
                control: VectorSourceDef::Sequence {
                    samples: vec![vec![0.0], vec![0.0, 1.0]],
                },
            }),
            ..scenario()
        };
        assert!(validate_scenario(&s).is_err());
    }
}
