//! Categorical DNA fields
//!
//! Each enum carries an ordered `VARIANTS` list. The generator selects with
//! `floor(draw * VARIANTS.len())`, so the order and length of every list is
//! part of the wire contract: reordering changes every existing universe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spatial arrangement of the instanced particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Sphere,
    Grid,
    Tunnel,
    Spiral,
    Cloud,
    Ring,
}

impl Layout {
    pub const VARIANTS: [Layout; 6] = [
        Layout::Sphere,
        Layout::Grid,
        Layout::Tunnel,
        Layout::Spiral,
        Layout::Cloud,
        Layout::Ring,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Sphere => "sphere",
            Layout::Grid => "grid",
            Layout::Tunnel => "tunnel",
            Layout::Spiral => "spiral",
            Layout::Cloud => "cloud",
            Layout::Ring => "ring",
        }
    }
}

/// Mesh used for each particle instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Sphere,
    Box,
    /// Older renderers spell this `tetrahedon`; accepted on input.
    #[serde(alias = "tetrahedon")]
    Tetrahedron,
    Torus,
    Cone,
}

impl Shape {
    pub const VARIANTS: [Shape; 5] = [
        Shape::Sphere,
        Shape::Box,
        Shape::Tetrahedron,
        Shape::Torus,
        Shape::Cone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Box => "box",
            Shape::Tetrahedron => "tetrahedron",
            Shape::Torus => "torus",
            Shape::Cone => "cone",
        }
    }
}

/// Motion field driving the particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Sine,
    Noise,
    Vortex,
    Explosion,
}

impl FlowType {
    pub const VARIANTS: [FlowType; 4] = [
        FlowType::Sine,
        FlowType::Noise,
        FlowType::Vortex,
        FlowType::Explosion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FlowType::Sine => "sine",
            FlowType::Noise => "noise",
            FlowType::Vortex => "vortex",
            FlowType::Explosion => "explosion",
        }
    }
}

/// Musical scale of the ambient pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Major,
    Minor,
    Pentatonic,
    Lydian,
    Phrygian,
    Chromatic,
}

impl ScaleType {
    pub const VARIANTS: [ScaleType; 6] = [
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::Pentatonic,
        ScaleType::Lydian,
        ScaleType::Phrygian,
        ScaleType::Chromatic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
            ScaleType::Pentatonic => "pentatonic",
            ScaleType::Lydian => "lydian",
            ScaleType::Phrygian => "phrygian",
            ScaleType::Chromatic => "chromatic",
        }
    }

    /// Semitone offsets from the root, one octave
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 10],
            ScaleType::Pentatonic => &[0, 2, 4, 7, 9],
            ScaleType::Lydian => &[0, 2, 4, 6, 7, 9, 11],
            ScaleType::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            ScaleType::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        }
    }
}

macro_rules! display_by_name {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(Layout, Shape, FlowType, ScaleType);
