//! Palette - four harmonically related colors around one base hue

use crate::seed::SeededRng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hue offset of the foreground (complement)
const FOREGROUND_SHIFT: f64 = 0.5;
/// Hue offset of the accent
const ACCENT_SHIFT: f64 = 0.3;

/// A color in HSL space. All components are fractions in [0, 1].
///
/// On the wire a color is its CSS `hsl()` string, which renderers hand
/// straight to the page style and the 3D material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// CSS `hsl()` notation
    pub fn to_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h * 360.0, self.s * 100.0, self.l * 100.0)
    }

    /// Convert to 8-bit sRGB
    pub fn to_rgb(&self) -> [u8; 3] {
        if self.s == 0.0 {
            let v = channel(self.l);
            return [v, v, v];
        }
        let q = if self.l < 0.5 {
            self.l * (1.0 + self.s)
        } else {
            self.l + self.s - self.l * self.s
        };
        let p = 2.0 * self.l - q;
        [
            channel(hue_to_rgb(p, q, self.h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, self.h)),
            channel(hue_to_rgb(p, q, self.h - 1.0 / 3.0)),
        ]
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode(self.to_rgb()))
    }
}

impl From<Hsl> for String {
    fn from(color: Hsl) -> String {
        color.to_css()
    }
}

impl TryFrom<String> for Hsl {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Hsl {
    type Err = ColorError;

    /// Parse `hsl(<deg>, <pct>%, <pct>%)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::Invalid(s.to_string());
        let inner = s
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [h, sat, l] = parts.as_slice() else {
            return Err(invalid());
        };
        let number = |part: &str| -> Result<f64, ColorError> {
            part.trim_end_matches('%').parse::<f64>().map_err(|_| invalid())
        };
        Ok(Hsl::new(
            number(*h)? / 360.0,
            number(*sat)? / 100.0,
            number(*l)? / 100.0,
        ))
    }
}

/// Color parsing errors
#[derive(Debug, thiserror::Error)]
pub enum ColorError {
    #[error("Invalid hsl() color: {0}")]
    Invalid(String),
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Color domain of the DNA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Shared base hue every entry is offset from
    pub base_hue: f64,
    /// Drawn base saturation in [0.5, 1.0). Part of the draw sequence; the
    /// four entries keep their fixed saturations.
    pub base_saturation: f64,
    pub background: Hsl,
    pub foreground: Hsl,
    pub accent: Hsl,
    pub glow: Hsl,
}

impl Palette {
    /// Two draws: base hue, then base saturation.
    pub fn draw(rng: &mut SeededRng) -> Self {
        let hue = rng.next_f64();
        let base_saturation = rng.spread(0.5, 0.5);
        Self::from_hue(hue, base_saturation)
    }

    pub fn from_hue(hue: f64, base_saturation: f64) -> Self {
        Self {
            base_hue: hue,
            base_saturation,
            background: Hsl::new(hue, 0.2, 0.05),
            foreground: Hsl::new((hue + FOREGROUND_SHIFT) % 1.0, 0.1, 0.9),
            accent: Hsl::new((hue + ACCENT_SHIFT) % 1.0, 0.8, 0.6),
            glow: Hsl::new(hue, 0.9, 0.5),
        }
    }

    /// CSS custom properties applied to the document root
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--color-background", self.background.to_css()),
            ("--color-foreground", self.foreground.to_css()),
        ]
    }

    pub fn entries(&self) -> [Hsl; 4] {
        [self.background, self.foreground, self.accent, self.glow]
    }
}
