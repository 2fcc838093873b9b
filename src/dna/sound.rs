//! Audio domain - parameters for the ambient synthesizer

use super::variants::ScaleType;
use crate::seed::SeededRng;
use serde::{Deserialize, Serialize};

pub const FREQ_BASE: f64 = 60.0;
pub const FREQ_SPREAD: f64 = 100.0;
pub const TEMPO_BASE: f64 = 0.1;
pub const TEMPO_SPREAD: f64 = 0.5;
pub const DETUNE_SPREAD: f64 = 20.0;

/// Audio domain of the DNA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audio {
    /// Root frequency in Hz, in [60, 160)
    pub base_freq: f64,
    pub scale_type: ScaleType,
    /// In [0.1, 0.6)
    pub tempo: f64,
    /// Cents, in [0, 20)
    pub detune: f64,
}

impl Audio {
    /// Four draws, in field order.
    pub fn draw(rng: &mut SeededRng) -> Self {
        let base_freq = rng.spread(FREQ_BASE, FREQ_SPREAD);
        let scale_type = *rng.pick(&ScaleType::VARIANTS);
        let tempo = rng.spread(TEMPO_BASE, TEMPO_SPREAD);
        let detune = rng.next_f64() * DETUNE_SPREAD;
        Self { base_freq, scale_type, tempo, detune }
    }

    pub fn in_bounds(&self) -> bool {
        (FREQ_BASE..FREQ_BASE + FREQ_SPREAD).contains(&self.base_freq)
            && (TEMPO_BASE..TEMPO_BASE + TEMPO_SPREAD).contains(&self.tempo)
            && (0.0..DETUNE_SPREAD).contains(&self.detune)
    }

    /// Oscillator frequencies for the first `count` degrees of the scale,
    /// climbing into higher octaves once the scale is exhausted.
    pub fn frequencies(&self, count: usize) -> Vec<f64> {
        let intervals = self.scale_type.intervals();
        (0..count)
            .map(|degree| {
                let octave = (degree / intervals.len()) as i32;
                let semitones = i32::from(intervals[degree % intervals.len()]) + 12 * octave;
                self.base_freq * 2f64.powf(f64::from(semitones) / 12.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(scale_type: ScaleType) -> Audio {
        Audio { base_freq: 110.0, scale_type, tempo: 0.3, detune: 5.0 }
    }

    #[test]
    fn test_draw_count_and_bounds() {
        let mut rng = SeededRng::new("audio");
        let a = Audio::draw(&mut rng);
        assert_eq!(rng.draws(), 4);
        assert!(a.in_bounds());
    }

    #[test]
    fn test_frequencies_start_at_root() {
        let freqs = audio(ScaleType::Minor).frequencies(3);
        assert_eq!(freqs[0], 110.0);
        // minor third above A2
        assert!((freqs[2] - 130.8127826502993).abs() < 1e-9);
    }

    #[test]
    fn test_frequencies_wrap_octaves() {
        let freqs = audio(ScaleType::Pentatonic).frequencies(6);
        assert_eq!(freqs.len(), 6);
        assert!((freqs[5] - 220.0).abs() < 1e-9);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }
}
