//! Post-processing domain

use crate::seed::SeededRng;
use serde::{Deserialize, Serialize};

pub const BLOOM_BASE: f64 = 0.5;
pub const BLOOM_SPREAD: f64 = 2.0;
pub const NOISE_BASE: f64 = 0.05;
pub const NOISE_SPREAD: f64 = 0.2;
pub const GLITCH_THRESHOLD: f64 = 0.9;
pub const PIXELATE_THRESHOLD: f64 = 0.95;
pub const VIGNETTE_BASE: f64 = 0.4;
pub const VIGNETTE_SPREAD: f64 = 0.6;

/// Post-processing stack parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProcessing {
    /// In [0.5, 2.5)
    pub bloom_intensity: f64,
    /// Film grain opacity, in [0.05, 0.25)
    pub noise_opacity: f64,
    /// Roughly one universe in ten
    pub glitch: bool,
    /// Roughly one universe in twenty
    pub pixelate: bool,
    /// In [0.4, 1.0)
    pub vignette_darkness: f64,
    pub focus_distance: f64,
}

impl PostProcessing {
    /// Six draws, in field order.
    pub fn draw(rng: &mut SeededRng) -> Self {
        Self {
            bloom_intensity: rng.spread(BLOOM_BASE, BLOOM_SPREAD),
            noise_opacity: rng.spread(NOISE_BASE, NOISE_SPREAD),
            glitch: rng.chance(GLITCH_THRESHOLD),
            pixelate: rng.chance(PIXELATE_THRESHOLD),
            vignette_darkness: rng.spread(VIGNETTE_BASE, VIGNETTE_SPREAD),
            focus_distance: rng.next_f64(),
        }
    }

    pub fn in_bounds(&self) -> bool {
        (BLOOM_BASE..BLOOM_BASE + BLOOM_SPREAD).contains(&self.bloom_intensity)
            && (NOISE_BASE..NOISE_BASE + NOISE_SPREAD).contains(&self.noise_opacity)
            && (VIGNETTE_BASE..VIGNETTE_BASE + VIGNETTE_SPREAD).contains(&self.vignette_darkness)
            && (0.0..1.0).contains(&self.focus_distance)
    }

    /// Names of the optional passes this universe enables
    pub fn enabled_passes(&self) -> Vec<&'static str> {
        let mut passes = vec!["bloom", "noise", "vignette"];
        if self.pixelate {
            passes.push("pixelation");
        }
        if self.glitch {
            passes.push("glitch");
        }
        passes
    }
}
