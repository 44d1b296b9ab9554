use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::camera::{
    Direction, DEFAULT_DISTANCE, DEFAULT_PITCH, DEFAULT_YAW, MIN_DISTANCE, MOVE_STEP,
};

/// Key names bound to each free-fly direction.
///
/// Names use browser `KeyboardEvent.key` spelling and are matched exactly,
/// so `"w"` does not match `"W"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub left: String,
    pub backward: String,
    pub right: String,
    pub up: String,
    pub down: String,
}

impl KeyBindings {
    pub fn key(&self, direction: Direction) -> &str {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Left => &self.left,
            Direction::Backward => &self.backward,
            Direction::Right => &self.right,
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Look up the direction bound to `key`, first binding wins
    pub fn direction(&self, key: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&direction| self.key(direction) == key)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            left: "a".to_string(),
            backward: "s".to_string(),
            right: "d".to_string(),
            up: " ".to_string(),
            down: "Shift".to_string(),
        }
    }
}

/// Controller tunables, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
    pub min_distance: f32,
    /// Pixels of drag per radian
    pub drag_divisor: f32,
    /// Wheel delta units per unit of view distance
    pub wheel_divisor: f32,
    /// Free-fly distance per frame
    pub move_step: f32,
    pub center: Option<[f32; 3]>,
    pub keyboard: bool,
    /// Keep scheduling frames while a movement key is held
    pub fly_while_held: bool,
    pub bindings: KeyBindings,
}

impl ControllerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Replace unusable divisors and floors with their defaults
    pub fn sanitized(mut self) -> Self {
        if !(self.drag_divisor.is_finite() && self.drag_divisor > 0.0) {
            log::warn!("drag_divisor {} ignored", self.drag_divisor);
            self.drag_divisor = 100.0;
        }
        if !(self.wheel_divisor.is_finite() && self.wheel_divisor > 0.0) {
            log::warn!("wheel_divisor {} ignored", self.wheel_divisor);
            self.wheel_divisor = 100.0;
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            log::warn!("min_distance {} ignored", self.min_distance);
            self.min_distance = MIN_DISTANCE;
        }
        self
    }

    pub fn center(&self) -> Option<Vec3> {
        self.center.map(Vec3::from_array)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            yaw: DEFAULT_YAW,
            distance: DEFAULT_DISTANCE,
            min_distance: MIN_DISTANCE,
            drag_divisor: 100.0,
            wheel_divisor: 100.0,
            move_step: MOVE_STEP,
            center: None,
            keyboard: true,
            fly_while_held: false,
            bindings: KeyBindings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_bindings_cover_wasd_space_shift() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.direction("w"), Some(Direction::Forward));
        assert_eq!(bindings.direction("a"), Some(Direction::Left));
        assert_eq!(bindings.direction("s"), Some(Direction::Backward));
        assert_eq!(bindings.direction("d"), Some(Direction::Right));
        assert_eq!(bindings.direction(" "), Some(Direction::Up));
        assert_eq!(bindings.direction("Shift"), Some(Direction::Down));
    }

    #[test]
    fn bindings_match_exactly() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.direction("W"), None);
        assert_eq!(bindings.direction("shift"), None);
        assert_eq!(bindings.direction("Space"), None);
        assert_eq!(bindings.direction(""), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ControllerConfig =
            serde_json::from_str(r#"{ "distance": 10.0, "bindings": { "up": "e" } }"#).unwrap();
        assert_eq!(config.distance, 10.0);
        assert_eq!(config.pitch, DEFAULT_PITCH);
        assert_eq!(config.bindings.up, "e");
        assert_eq!(config.bindings.forward, "w");
        assert!(config.keyboard);
        assert!(config.center().is_none());
    }

    #[test]
    fn sanitized_restores_bad_values() {
        let config = ControllerConfig {
            drag_divisor: 0.0,
            wheel_divisor: f32::NAN,
            min_distance: -1.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.drag_divisor, 100.0);
        assert_eq!(config.wheel_divisor, 100.0);
        assert_eq!(config.min_distance, MIN_DISTANCE);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "center": [1.0, 2.0, 3.0], "fly_while_held": true }}"#).unwrap();

        let config = ControllerConfig::load(file.path()).unwrap();
        assert_eq!(config.center(), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert!(config.fly_while_held);
    }

    #[test]
    fn load_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ControllerConfig::load(file.path()).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse config"));
    }
}
