use sf_device::{ControlInputMode, DeviceConfig};
use sf_scenario::*;
use sf_signal::{MotionKind, MotionParam};

fn sample_scenario() -> Scenario {
    Scenario {
        version: LATEST_VERSION,
        name: "Arm sweep".to_string(),
        period_s: 0.01,
        steps: 50,
        device: Some(DeviceDef {
            config: DeviceConfig {
                control_input: ControlInputMode::Acceleration,
                initial_state: Some(vec![0.0, 0.0, 0.8, 0.0, 0.0, 0.0, 0.1, -0.1]),
                ..DeviceConfig::new("arm", 8)
            },
            control: VectorSourceDef::Motion {
                params: vec![
                    MotionParam {
                        kind: MotionKind::Sin,
                        amplitude: 0.5,
                        period: 100,
                        ..MotionParam::default()
                    },
                    MotionParam::default(),
                ],
            },
        }),
        integrators: vec![IntegratorDef {
            id: "lag".to_string(),
            numerator: vec![1.0],
            denominator: vec![1.0, 0.1],
            sampling_period_s: Some(0.01),
            input: ScalarSourceDef::Ramp {
                start: 0.0,
                slope: 0.5,
            },
        }],
    }
}

#[test]
fn roundtrip_yaml_scenario() {
    let scenario = sample_scenario();
    let path = std::env::temp_dir().join("sf_scenario_roundtrip.yaml");

    save_yaml(&path, &scenario).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn roundtrip_json_scenario() {
    let scenario = sample_scenario();
    let path = std::env::temp_dir().join("sf_scenario_roundtrip.json");

    save_json(&path, &scenario).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(scenario, loaded);
}

#[test]
fn yaml_uses_flat_device_and_tagged_sources() {
    let yaml = r#"
version: 1
name: Minimal
steps: 3
device:
  name: robot
  state_size: 7
  control_input: position
  control:
    type: Sequence
    samples: [[0.0], [0.5], [1.0]]
integrators:
  - id: gain
    numerator: [2.0]
    denominator: [1.0]
    input:
      type: Constant
      value: 1.5
"#;
    let scenario: Scenario = serde_yaml::from_str(yaml).unwrap();
    validate_scenario(&scenario).unwrap();

    assert_eq!(scenario.period_s, 0.005);
    let device = scenario.device.as_ref().unwrap();
    assert_eq!(device.config.control_input, ControlInputMode::Position);
    assert_eq!(device.control.width(), Some(1));
    assert_eq!(scenario.integrators[0].sampling_period_s, None);
}

#[test]
fn save_rejects_invalid_scenario() {
    let mut scenario = sample_scenario();
    scenario.period_s = -1.0;
    let path = std::env::temp_dir().join("sf_scenario_invalid.yaml");

    assert!(matches!(
        save_yaml(&path, &scenario),
        Err(ScenarioError::Validation(_))
    ));
}
