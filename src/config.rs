//! Scenario configuration
//!
//! A scenario fixes everything about a run up front: the battery voltage,
//! the resistor and capacitor values, the placement order, and the animation
//! and geometry knobs. It is read from YAML or JSON; every field has a
//! default, so an empty file is a valid scenario.
//!
//! ```yaml
//! voltage: 9.0
//! resistors: [3.0, 2.0, 5.0]
//! capacitors: [0.01, 0.02]
//! order: [B, R1, C1, R2]
//! electrons: 35
//! seed: 7
//! animation:
//!   time_scale: 5.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::AnimationSettings;
use crate::circuit::{Capacitor, CircuitPhysics, Resistor};
use crate::electrons::DEFAULT_ELECTRON_COUNT;
use crate::geometry::RectLoopTemplate;
use crate::layout::LayoutFractions;
use crate::order::{OrderError, PlacementOrder};

/// Errors that can occur while loading or validating a scenario
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine scenario format from path: {0}")]
    UnknownExtension(String),

    #[error("unsupported scenario format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("invalid scenario: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything needed to build and animate one circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Battery voltage in volts
    pub voltage: f64,
    /// Resistances in ohms, named `R1..Rn`
    pub resistors: Vec<f64>,
    /// Capacitances in farads, named `C1..Cn`
    pub capacitors: Vec<f64>,
    /// Placement order tokens; `None` means battery, resistors, capacitors
    pub order: Option<Vec<String>>,
    pub electrons: usize,
    /// Seed for the initial electron layout; random when absent
    pub seed: Option<u64>,
    pub animation: AnimationSettings,
    pub template: RectLoopTemplate,
    pub layout: LayoutFractions,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            voltage: 9.0,
            resistors: Vec::new(),
            capacitors: Vec::new(),
            order: None,
            electrons: DEFAULT_ELECTRON_COUNT,
            seed: None,
            animation: AnimationSettings::default(),
            template: RectLoopTemplate::default(),
            layout: LayoutFractions::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load a scenario file, picking the format from its extension
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::UnknownExtension(path.display().to_string()))?;

        let content = fs::read_to_string(path)?;
        let config = match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            "json" => Self::from_json_str(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        tracing::debug!(path = %path.display(), "loaded scenario");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the core cannot animate
    ///
    /// Degenerate circuits (no resistors, zero capacitance) are accepted; they
    /// just produce a still picture.
    pub fn validate(&self) -> ConfigResult<()> {
        fn finite(name: &str, value: f64) -> ConfigResult<()> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")))
            }
        }

        finite("voltage", self.voltage)?;
        for (i, r) in self.resistors.iter().enumerate() {
            finite(&format!("R{}", i + 1), *r)?;
        }
        for (i, c) in self.capacitors.iter().enumerate() {
            finite(&format!("C{}", i + 1), *c)?;
        }

        let anim = &self.animation;
        if !(anim.dt_wall.is_finite() && anim.dt_wall > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.dt_wall must be positive, got {}",
                anim.dt_wall
            )));
        }
        for (name, value) in [
            ("animation.time_scale", anim.time_scale),
            ("animation.speed_scale", anim.speed_scale),
            ("animation.speed_constant", anim.speed_constant),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        let t = &self.template;
        if !(t.width > 0.0 && t.height > 0.0 && t.margin >= 0.0 && t.wire_thickness >= 0.0) {
            return Err(ConfigError::Invalid(
                "template dimensions must be positive".to_string(),
            ));
        }
        if t.mid_inset() * 2.0 >= t.width.min(t.height) {
            return Err(ConfigError::Invalid(format!(
                "template margin and wire thickness leave no room inside {}x{}",
                t.width, t.height
            )));
        }

        for inset in [t.outer_inset(), t.mid_inset()] {
            if !t.perimeter(inset).is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "template {}x{} is too large to measure",
                    t.width, t.height
                )));
            }
        }

        // Current peaks at t = 0, so this bounds every per-frame step
        let gain = anim.speed_constant * anim.speed_scale;
        let peak_step = gain * self.circuit().current(0.0).abs() * anim.dt_wall;
        if !(gain.is_finite() && peak_step.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "electron speed overflows: speed_constant {} x speed_scale {}",
                anim.speed_constant, anim.speed_scale
            )));
        }

        let l = &self.layout;
        if !(0.0 <= l.start && l.start < l.end && l.end <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "layout fractions must satisfy 0 <= start < end <= 1, got {}..{}",
                l.start, l.end
            )));
        }

        Ok(())
    }

    /// Series loop built from the configured values
    pub fn circuit(&self) -> CircuitPhysics {
        CircuitPhysics::new(
            self.voltage,
            Resistor::numbered(&self.resistors),
            Capacitor::numbered(&self.capacitors),
        )
    }

    /// Validated placement order for `circuit`
    pub fn placement_order(&self, circuit: &CircuitPhysics) -> Result<PlacementOrder, OrderError> {
        match &self.order {
            Some(tokens) => PlacementOrder::from_tokens(tokens.as_slice(), circuit),
            None => Ok(PlacementOrder::default_for(circuit)),
        }
    }
}

/// Parse comma-separated numbers such as `"3, 2,5"`; blank entries are skipped
pub fn parse_values_csv(input: &str) -> ConfigResult<Vec<f64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumber(s.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_values_parse() {
        assert_eq!(parse_values_csv("3, 2,5").unwrap(), vec![3.0, 2.0, 5.0]);
        assert_eq!(parse_values_csv("0.01,0.02").unwrap(), vec![0.01, 0.02]);
        assert_eq!(parse_values_csv("1e-3").unwrap(), vec![0.001]);
    }

    #[test]
    fn blank_csv_is_empty() {
        assert!(parse_values_csv("").unwrap().is_empty());
        assert!(parse_values_csv("  ").unwrap().is_empty());
        assert_eq!(parse_values_csv("4,,").unwrap(), vec![4.0]);
    }

    #[test]
    fn csv_rejects_non_numbers() {
        match parse_values_csv("3, ten") {
            Err(ConfigError::InvalidNumber(s)) => assert_eq!(s, "ten"),
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = ScenarioConfig::from_yaml_str("").unwrap();
        assert_eq!(config, ScenarioConfig::default());
        assert_eq!(config.voltage, 9.0);
        assert_eq!(config.electrons, 35);
    }

    #[test]
    fn yaml_scenario_parses() {
        let yaml = r#"
voltage: 12
resistors: [3, 2, 5]
capacitors: [0.01, 0.02]
order: [C1, B]
seed: 7
animation:
  time_scale: 5
template:
  width: 300
"#;
        let config = ScenarioConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.voltage, 12.0);
        assert_eq!(config.resistors, vec![3.0, 2.0, 5.0]);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.animation.time_scale, 5.0);
        assert_eq!(config.animation.speed_constant, 60.0);
        assert_eq!(config.template.width, 300.0);
        assert_eq!(config.template.height, 240.0);

        let circuit = config.circuit();
        assert_eq!(circuit.req(), 10.0);
        let order = config.placement_order(&circuit).unwrap();
        assert_eq!(order.to_order_string(), "C1 B R1 R2 R3 C2");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ScenarioConfig::from_yaml_str("voltag: 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ScenarioConfig::from_json_str(r#"{"animation": {"fps": 30}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = ScenarioConfig::from_json_str(r#"{"animation": {"dt_wall": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ScenarioConfig::from_yaml_str("layout: {start: 0.9, end: 0.1}").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = ScenarioConfig::from_yaml_str("template: {width: 40}").unwrap_err();
        assert!(err.to_string().contains("no room"));
    }

    #[test]
    fn overflowing_speed_is_rejected() {
        let yaml = "resistors: [1]\nanimation: {speed_constant: 1.0e308, speed_scale: 10}";
        let err = ScenarioConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("electron speed overflows"), "{err}");

        // Each factor is fine; the peak current is not
        let err = ScenarioConfig::from_yaml_str("resistors: [1.0e-320]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let open_loop = "capacitors: [0.01]\nanimation: {speed_constant: 1.0e300}";
        assert!(ScenarioConfig::from_yaml_str(open_loop).is_ok());
    }

    #[test]
    fn oversized_template_is_rejected() {
        let yaml = "template: {width: 1.0e308, height: 1.0e308}";
        let err = ScenarioConfig::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");
    }

    #[test]
    fn degenerate_circuits_are_accepted() {
        let config = ScenarioConfig::from_yaml_str("resistors: []\ncapacitors: [0]").unwrap();
        assert_eq!(config.circuit().current(0.0), 0.0);
    }

    #[test]
    fn bad_order_surfaces_order_error() {
        let config = ScenarioConfig::from_yaml_str("resistors: [1]\norder: [R1, R2, B]").unwrap();
        let circuit = config.circuit();
        assert_eq!(
            config.placement_order(&circuit),
            Err(OrderError::UnknownToken("R2".to_string()))
        );
    }

    #[test]
    fn loads_by_extension() {
        let yaml = write_temp(".yaml", "voltage: 5\n");
        assert_eq!(ScenarioConfig::load(yaml.path()).unwrap().voltage, 5.0);

        let json = write_temp(".json", r#"{"voltage": 6, "resistors": [1, 1]}"#);
        let config = ScenarioConfig::load(json.path()).unwrap();
        assert_eq!(config.voltage, 6.0);
        assert_eq!(config.resistors.len(), 2);

        let toml = write_temp(".toml", "voltage = 5");
        assert!(matches!(
            ScenarioConfig::load(toml.path()),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
