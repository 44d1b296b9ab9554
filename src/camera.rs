use glam::{Mat3, Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

pub const DEFAULT_PITCH: f32 = 0.8;
pub const DEFAULT_YAW: f32 = 0.5;
pub const DEFAULT_DISTANCE: f32 = 4.0;
pub const MIN_DISTANCE: f32 = 1.0;
pub const MOVE_STEP: f32 = 0.04;

/// One of the six free-fly directions, in binding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Left,
    Backward,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Left,
        Direction::Backward,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub left: bool,
    pub backward: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementState {
    const fn to_direction(&self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Forward => self.forward = held,
            Direction::Left => self.left = held,
            Direction::Backward => self.backward = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward,
            Direction::Left => self.left,
            Direction::Backward => self.backward,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.left || self.backward || self.right || self.up || self.down
    }

    /// Camera-local movement vector `(left - right, up - down, forward - backward)`
    pub fn velocity(&self) -> Vec3 {
        Vec3::new(
            self.to_direction(self.left, self.right),
            self.to_direction(self.up, self.down),
            self.to_direction(self.forward, self.backward),
        )
    }
}

/// Orbiting camera with a free-fly offset.
///
/// `position` is stored in the yaw-independent frame: movement is rotated into
/// world space by the current yaw, applied, and rotated back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
    pub position: Vec3,
    pub movement: MovementState,
}

impl Camera {
    pub fn new(pitch: f32, yaw: f32, distance: f32) -> Self {
        Self {
            pitch,
            yaw,
            distance,
            position: Vec3::ZERO,
            movement: MovementState::default(),
        }
    }

    /// Apply a pointer drag of `(dx, dy)` pixels
    pub fn rotate(&mut self, dx: f32, dy: f32, divisor: f32) {
        self.yaw += dx / divisor;
        self.pitch += dy / divisor;
    }

    pub fn zoom(&mut self, delta: f32, divisor: f32) {
        self.distance += delta / divisor;
    }

    /// Wrap yaw into (-2π, 2π), clamp pitch to [-π/2, π/2] and floor the distance
    pub fn normalize(&mut self, min_distance: f32) {
        self.yaw %= TAU;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.distance = self.distance.max(min_distance);
    }

    /// `translate(0, 0, -distance) · rotateX(pitch) · rotateY(yaw) · translate(position)`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_rotation_x(self.pitch)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_translation(self.position)
    }

    /// Advance the free-fly position by one frame. Returns false when no direction is held.
    pub fn integrate_movement(&mut self, step: f32) -> bool {
        if !self.movement.any() {
            return false;
        }

        let world = Mat3::from_rotation_y(self.yaw) * self.position;
        let moved = world + self.movement.velocity() * step;
        self.position = Mat3::from_rotation_y(-self.yaw) * moved;
        true
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_PITCH, DEFAULT_YAW, DEFAULT_DISTANCE)
    }
}
