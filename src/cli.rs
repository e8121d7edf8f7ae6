use std::path::PathBuf;

use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::circuit::CircuitPhysics;
use crate::config::{ConfigResult, ScenarioConfig, parse_values_csv};
use crate::order::PlacementOrder;

/// Scenario options shared by every subcommand
///
/// Values given on the command line override the scenario file.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Scenario file (.yaml, .yml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Battery voltage in volts
    #[arg(long, allow_negative_numbers = true)]
    pub voltage: Option<f64>,

    /// Resistances in ohms, comma separated (e.g. "3,2,5")
    #[arg(long, value_name = "CSV")]
    pub resistors: Option<String>,

    /// Capacitances in farads, comma separated (e.g. "0.01,0.02")
    #[arg(long, value_name = "CSV")]
    pub capacitors: Option<String>,

    /// Placement order, e.g. "B R1 C1 R2"
    #[arg(long)]
    pub order: Option<String>,

    /// Number of electrons on the loop
    #[arg(long)]
    pub electrons: Option<usize>,

    /// Seed for the initial electron layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulated seconds per wall-clock second
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Visual multiplier on electron speed
    #[arg(long)]
    pub speed_scale: Option<f64>,
}

impl ScenarioArgs {
    /// Scenario file (or defaults) with command-line overrides applied
    pub fn scenario(&self) -> ConfigResult<ScenarioConfig> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::load(path)?,
            None => ScenarioConfig::default(),
        };

        if let Some(voltage) = self.voltage {
            config.voltage = voltage;
        }
        if let Some(csv) = &self.resistors {
            config.resistors = parse_values_csv(csv)?;
        }
        if let Some(csv) = &self.capacitors {
            config.capacitors = parse_values_csv(csv)?;
        }
        if let Some(order) = &self.order {
            let tokens: Vec<String> = order.split_whitespace().map(str::to_string).collect();
            config.order = (!tokens.is_empty()).then_some(tokens);
        }
        if let Some(electrons) = self.electrons {
            config.electrons = electrons;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(time_scale) = self.time_scale {
            config.animation.time_scale = time_scale;
        }
        if let Some(speed_scale) = self.speed_scale {
            config.animation.speed_scale = speed_scale;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Configured placement order, or the default one if it does not fit `circuit`
pub fn order_or_default(config: &ScenarioConfig, circuit: &CircuitPhysics) -> PlacementOrder {
    config.placement_order(circuit).unwrap_or_else(|err| {
        let fallback = PlacementOrder::default_for(circuit);
        tracing::warn!(
            error = %err,
            fallback = %fallback.to_order_string(),
            "ignoring placement order"
        );
        fallback
    })
}

/// Seeded RNG when the scenario fixes a seed, OS entropy otherwise
pub fn scenario_rng(config: &ScenarioConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
