use crate::math::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle bodies are kept inside.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Tunables for the particle step.
///
/// `drag_force` is a spring stiffness in 1/s²: the selected body accelerates
/// toward the pointer at `offset * drag_force`. `damping` is the fraction of
/// implicit velocity removed each sub-step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub substeps: u32,
    pub drag_force: f32,
    pub dead_zone: f32,
    pub damping: f32,
    pub body_diameter: f32,
    pub restitution: f32,
    pub bounds: Option<Bounds>,
}

impl PhysicsConfig {
    pub fn radius(&self) -> f32 {
        self.body_diameter * 0.5
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            substeps: 2,
            drag_force: 400.0,
            dead_zone: 30.0,
            damping: 0.05,
            body_diameter: 40.0,
            restitution: 0.9,
            bounds: Some(Bounds::new(800.0, 600.0)),
        }
    }
}
