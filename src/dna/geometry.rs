//! Geometry and physics domains - what the particles are and how they move

use super::variants::{FlowType, Layout, Shape};
use crate::seed::SeededRng;
use serde::{Deserialize, Serialize};

/// Instance count: `floor(200 + r * 1500)`
pub const COUNT_BASE: f64 = 200.0;
pub const COUNT_SPREAD: f64 = 1500.0;
/// Per-instance scale: `0.2 + r * 1.5`
pub const SCALE_BASE: f64 = 0.2;
pub const SCALE_SPREAD: f64 = 1.5;
/// Wireframe iff the draw exceeds this
pub const WIREFRAME_THRESHOLD: f64 = 0.6;

/// Speed: `0.05 + r * 0.4`
pub const SPEED_BASE: f64 = 0.05;
pub const SPEED_SPREAD: f64 = 0.4;
/// Gravity: `(r - 0.5) * 5`
pub const GRAVITY_SPAN: f64 = 5.0;

/// Geometry domain of the DNA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub layout: Layout,
    pub shape: Shape,
    /// Number of instances, in [200, 1700)
    pub count: u32,
    /// In [0.2, 1.7)
    pub scale: f64,
    pub roughness: f64,
    pub metalness: f64,
    pub wireframe: bool,
}

impl Geometry {
    /// Seven draws, in field order.
    pub fn draw(rng: &mut SeededRng) -> Self {
        let layout = *rng.pick(&Layout::VARIANTS);
        let shape = *rng.pick(&Shape::VARIANTS);
        let count = rng.spread(COUNT_BASE, COUNT_SPREAD).floor() as u32;
        let scale = rng.spread(SCALE_BASE, SCALE_SPREAD);
        let roughness = rng.next_f64();
        let metalness = rng.next_f64();
        let wireframe = rng.chance(WIREFRAME_THRESHOLD);
        Self { layout, shape, count, scale, roughness, metalness, wireframe }
    }

    pub fn in_bounds(&self) -> bool {
        (COUNT_BASE as u32..(COUNT_BASE + COUNT_SPREAD) as u32).contains(&self.count)
            && (SCALE_BASE..SCALE_BASE + SCALE_SPREAD).contains(&self.scale)
            && (0.0..1.0).contains(&self.roughness)
            && (0.0..1.0).contains(&self.metalness)
    }
}

/// Physics domain of the DNA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Physics {
    /// Time multiplier, in [0.05, 0.45)
    pub speed: f64,
    pub flow_type: FlowType,
    /// Signed vertical bias, in [-2.5, 2.5)
    pub gravity: f64,
}

impl Physics {
    /// Three draws, in field order.
    pub fn draw(rng: &mut SeededRng) -> Self {
        let speed = rng.spread(SPEED_BASE, SPEED_SPREAD);
        let flow_type = *rng.pick(&FlowType::VARIANTS);
        let gravity = (rng.next_f64() - 0.5) * GRAVITY_SPAN;
        Self { speed, flow_type, gravity }
    }

    pub fn in_bounds(&self) -> bool {
        let half = GRAVITY_SPAN / 2.0;
        (SPEED_BASE..SPEED_BASE + SPEED_SPREAD).contains(&self.speed)
            && (-half..half).contains(&self.gravity)
    }
}
