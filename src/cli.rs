// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::config::ControllerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "structure-viewer")]
#[command(about = "Orbit and free-fly camera for voxel structures", long_about = None)]
pub struct Cli {
    /// JSON file with controller settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Initial view distance
    #[arg(long)]
    pub distance: Option<f32>,

    /// Fixed point to look at, as X,Y,Z
    #[arg(long, value_parser = parse_center, allow_hyphen_values = true)]
    pub center: Option<[f32; 3]>,

    /// Disable WASD/Space/Shift free-fly movement
    #[arg(long = "no-keyboard", default_value = "false")]
    pub no_keyboard: bool,

    /// Keep flying while a movement key is held
    #[arg(long, default_value = "false")]
    pub fly: bool,
}

impl Cli {
    /// Layer command-line overrides on top of `config`
    pub fn apply(&self, mut config: ControllerConfig) -> ControllerConfig {
        if let Some(distance) = self.distance {
            config.distance = distance;
        }
        if let Some(center) = self.center {
            config.center = Some(center);
        }
        if self.no_keyboard {
            config.keyboard = false;
        }
        if self.fly {
            config.fly_while_held = true;
        }
        config
    }
}

fn parse_center(value: &str) -> Result<[f32; 3], String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f32; 3]>::try_from(parts).map_err(|parts| format!("expected 3 values, got {}", parts.len()))
}
