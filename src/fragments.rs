//! Fragment layout - where the overlay text of a universe lands
//!
//! Fragments are short lines scattered across the viewport and revealed when
//! the visitor's cursor dwells near them. The layout uses its own draw stream
//! from the universe seed, so it never shifts the DNA draws.

use crate::seed::SeededRng;
use serde::{Deserialize, Serialize};

/// Built-in fragment texts, in canonical order before shuffling
pub const FRAGMENT_TEXTS: [&str; 25] = [
    "you were here",
    "once",
    "this moment",
    "cannot",
    "be held",
    "the space between",
    "seeing and",
    "forgetting",
    "is where",
    "you",
    "exist",
    "briefly",
    "like breath",
    "on glass",
    "already",
    "fading",
    "what you",
    "almost",
    "understood",
    "stays",
    "unnamed",
    "between one",
    "and none",
    "there was",
    "this",
];

/// Share of the texts that make it into a layout
const KEEP_RATIO: f64 = 0.65;
/// Positions are percentages in [MARGIN, MARGIN + SPAN)
const MARGIN: f64 = 8.0;
const SPAN: f64 = 84.0;
/// Two fragments closer than this on both axes collide
const MIN_GAP: f64 = 12.0;
const MAX_ATTEMPTS: u32 = 25;
/// Cursor distance in pixels within which a dwelling cursor reveals a fragment
pub const REVEAL_RADIUS: f64 = 180.0;

/// One placed fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fragment {
    pub id: usize,
    pub text: String,
    /// Horizontal position, percent of viewport width
    pub x: f64,
    /// Vertical position, percent of viewport height
    pub y: f64,
    /// Degrees, in [-2, 2)
    pub rotation: f64,
    /// Degrees, in [-1.5, 1.5)
    pub skew: f64,
    /// Pixels, in [16, 28)
    pub font_size: f64,
    /// Dwell time in milliseconds before the fragment reveals, in [800, 3800)
    pub threshold: f64,
}

impl Fragment {
    fn collides(&self, x: f64, y: f64) -> bool {
        (self.x - x).abs() < MIN_GAP && (self.y - y).abs() < MIN_GAP
    }

    /// Pixel position in a `width` x `height` viewport
    pub fn position_px(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x / 100.0 * width, self.y / 100.0 * height)
    }

    /// Whether a cursor resting at `cursor` (pixels) for `dwell_ms` reveals
    /// this fragment. The dwell must strictly exceed the threshold.
    pub fn reveals(&self, cursor: (f64, f64), viewport: (f64, f64), dwell_ms: f64) -> bool {
        let (fx, fy) = self.position_px(viewport.0, viewport.1);
        (cursor.0 - fx).hypot(cursor.1 - fy) < REVEAL_RADIUS && dwell_ms > self.threshold
    }
}

/// The full fragment layout of a universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentLayout {
    pub seed: String,
    pub fragments: Vec<Fragment>,
}

impl FragmentLayout {
    pub fn generate(seed: &str) -> Self {
        Self::with_texts(seed, &FRAGMENT_TEXTS)
    }

    /// Lay out an arbitrary text pool.
    pub fn with_texts(seed: &str, texts: &[&str]) -> Self {
        let mut rng = SeededRng::new(seed);

        let mut pool: Vec<&str> = texts.to_vec();
        for i in (1..pool.len()).rev() {
            let j = rng.index(i + 1).min(i);
            pool.swap(i, j);
        }

        let count = (pool.len() as f64 * KEEP_RATIO).floor() as usize;
        let mut fragments: Vec<Fragment> = Vec::with_capacity(count);
        for (id, text) in pool.into_iter().take(count).enumerate() {
            let mut x;
            let mut y;
            let mut attempts = 0;
            loop {
                x = rng.spread(MARGIN, SPAN);
                y = rng.spread(MARGIN, SPAN);
                attempts += 1;
                if attempts >= MAX_ATTEMPTS || !fragments.iter().any(|f| f.collides(x, y)) {
                    break;
                }
            }
            fragments.push(Fragment {
                id,
                text: text.to_string(),
                x,
                y,
                rotation: (rng.next_f64() - 0.5) * 4.0,
                skew: (rng.next_f64() - 0.5) * 3.0,
                font_size: rng.spread(16.0, 12.0),
                threshold: rng.spread(800.0, 3000.0),
            });
        }

        Self { seed: seed.to_string(), fragments }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments revealed by a cursor resting at `cursor` for `dwell_ms`
    pub fn revealed_at(
        &self,
        cursor: (f64, f64),
        viewport: (f64, f64),
        dwell_ms: f64,
    ) -> Vec<&Fragment> {
        self.fragments
            .iter()
            .filter(|f| f.reveals(cursor, viewport, dwell_ms))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_deterministic() {
        let a = FragmentLayout::generate("fragments");
        let b = FragmentLayout::generate("fragments");
        assert_eq!(a, b);
        assert_ne!(a, FragmentLayout::generate("fragmentz"));
    }

    #[test]
    fn test_layout_size_and_uniqueness() {
        let layout = FragmentLayout::generate("test");
        assert_eq!(layout.len(), 16);
        let mut texts: Vec<&str> = layout.fragments.iter().map(|f| f.text.as_str()).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), 16);
        assert!(texts.iter().all(|t| FRAGMENT_TEXTS.contains(t)));
    }

    #[test]
    fn test_fragment_bounds() {
        for i in 0..200 {
            let layout = FragmentLayout::generate(&format!("layout-{}", i));
            for f in &layout.fragments {
                assert!((MARGIN..MARGIN + SPAN).contains(&f.x));
                assert!((MARGIN..MARGIN + SPAN).contains(&f.y));
                assert!((-2.0..2.0).contains(&f.rotation));
                assert!((-1.5..1.5).contains(&f.skew));
                assert!((16.0..28.0).contains(&f.font_size));
                assert!((800.0..3800.0).contains(&f.threshold));
            }
        }
    }

    const VIEWPORT: (f64, f64) = (1920.0, 1080.0);

    #[test]
    fn test_reveal_needs_dwell_past_threshold() {
        let layout = FragmentLayout::generate("dwell");
        let f = &layout.fragments[0];
        let cursor = f.position_px(VIEWPORT.0, VIEWPORT.1);
        assert!(!f.reveals(cursor, VIEWPORT, f.threshold));
        assert!(f.reveals(cursor, VIEWPORT, f.threshold + 1.0));
        assert!(layout.revealed_at(cursor, VIEWPORT, 0.0).is_empty());
        assert!(layout
            .revealed_at(cursor, VIEWPORT, 4000.0)
            .iter()
            .any(|r| r.id == f.id));
    }

    #[test]
    fn test_reveal_needs_cursor_nearby() {
        let layout = FragmentLayout::generate("dwell");
        let f = &layout.fragments[0];
        let (fx, fy) = f.position_px(VIEWPORT.0, VIEWPORT.1);
        assert!(f.reveals((fx + 179.0, fy), VIEWPORT, 4000.0));
        assert!(!f.reveals((fx + 181.0, fy), VIEWPORT, 4000.0));
        assert!(!f.reveals((fx + 150.0, fy + 150.0), VIEWPORT, 4000.0));
    }

    #[test]
    fn test_empty_pool() {
        let layout = FragmentLayout::with_texts("nothing", &[]);
        assert!(layout.is_empty());
    }
}
