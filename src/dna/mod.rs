//! UniverseDna - the full parameter record of one universe
//!
//! A universe is a pure function of its seed: one SeededRng stream, drawn in a
//! fixed order (colors, geometry, physics, post-processing, audio). Renderers
//! on any platform that replay the same draws get the same universe, down to
//! the last bit of every float.

mod effects;
mod geometry;
mod palette;
mod sound;
mod variants;

pub use effects::PostProcessing;
pub use geometry::{Geometry, Physics};
pub use palette::{ColorError, Hsl, Palette};
pub use sound::Audio;
pub use variants::{FlowType, Layout, ScaleType, Shape};

use crate::seed::SeededRng;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Draws consumed by one generation: 2 + 7 + 3 + 6 + 4
pub const DRAWS_PER_UNIVERSE: u64 = 22;

/// The DNA of one universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseDna {
    pub seed: String,
    pub colors: Palette,
    pub geometry: Geometry,
    pub physics: Physics,
    pub post_processing: PostProcessing,
    pub audio: Audio,
}

/// Derive the DNA of a seed. Total: every string, including the empty one,
/// yields a complete record.
pub fn generate(seed: &str) -> UniverseDna {
    UniverseDna::from_seed(seed)
}

impl UniverseDna {
    pub fn from_seed(seed: &str) -> Self {
        let mut rng = SeededRng::new(seed);
        let dna = Self {
            seed: seed.to_string(),
            colors: Palette::draw(&mut rng),
            geometry: Geometry::draw(&mut rng),
            physics: Physics::draw(&mut rng),
            post_processing: PostProcessing::draw(&mut rng),
            audio: Audio::draw(&mut rng),
        };
        debug_assert_eq!(rng.draws(), DRAWS_PER_UNIVERSE);
        debug!("Generated universe: {}", dna.summary());
        dna
    }

    /// Whether every numeric field sits inside its published range
    pub fn in_bounds(&self) -> bool {
        let unit = |v: f64| (0.0..1.0).contains(&v);
        unit(self.colors.base_hue)
            && (0.5..1.0).contains(&self.colors.base_saturation)
            && self.colors.entries().iter().all(|c| unit(c.h))
            && self.geometry.in_bounds()
            && self.physics.in_bounds()
            && self.post_processing.in_bounds()
            && self.audio.in_bounds()
    }

    /// SHA256 over the canonical field values. Two renderers holding the same
    /// digest hold the same universe.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        for c in self.colors.entries() {
            hasher.update(c.h.to_le_bytes());
            hasher.update(c.s.to_le_bytes());
            hasher.update(c.l.to_le_bytes());
        }
        hasher.update(self.colors.base_saturation.to_le_bytes());

        let g = &self.geometry;
        hasher.update(g.layout.name().as_bytes());
        hasher.update(g.shape.name().as_bytes());
        hasher.update(g.count.to_le_bytes());
        for v in [g.scale, g.roughness, g.metalness] {
            hasher.update(v.to_le_bytes());
        }
        hasher.update([g.wireframe as u8]);

        let p = &self.physics;
        hasher.update(p.speed.to_le_bytes());
        hasher.update(p.flow_type.name().as_bytes());
        hasher.update(p.gravity.to_le_bytes());

        let fx = &self.post_processing;
        for v in [fx.bloom_intensity, fx.noise_opacity, fx.vignette_darkness, fx.focus_distance] {
            hasher.update(v.to_le_bytes());
        }
        hasher.update([fx.glitch as u8, fx.pixelate as u8]);

        let a = &self.audio;
        hasher.update(a.base_freq.to_le_bytes());
        hasher.update(a.scale_type.name().as_bytes());
        hasher.update(a.tempo.to_le_bytes());
        hasher.update(a.detune.to_le_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn summary(&self) -> String {
        format!(
            "Universe '{}' | {} {} x{} | flow={} speed={:.3} | bloom={:.2}{}{} | {} @ {:.1}Hz",
            self.seed,
            self.geometry.layout,
            self.geometry.shape,
            self.geometry.count,
            self.physics.flow_type,
            self.physics.speed,
            self.post_processing.bloom_intensity,
            if self.post_processing.glitch { " +glitch" } else { "" },
            if self.post_processing.pixelate { " +pixelate" } else { "" },
            self.audio.scale_type,
            self.audio.base_freq,
        )
    }
}
