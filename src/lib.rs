pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod traits;

pub use camera::{Camera, Direction, MovementState};
pub use config::{ControllerConfig, KeyBindings};
pub use crate::core::{CameraController, SharedController};
