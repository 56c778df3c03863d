// SPDX-License-Identifier: GPL-3.0-only

//! Film simulation catalog
//!
//! A fixed, ordered list of presets. Each preset carries its operation chain
//! and a short description, which doubles as the style hint sent to the
//! remote enhancement model.

pub mod ops;

pub use ops::{FilterChain, FilterOp};

use crate::constants::IDENTITY_FILTER_ID;

/// A named film simulation
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPreset {
    /// Stable key, stored on every photo
    pub id: &'static str,
    /// Display label
    pub name: &'static str,
    /// Operations applied left to right
    pub ops: &'static [FilterOp],
    /// Free-text style hint
    pub description: &'static str,
}

impl FilterPreset {
    /// Owned operation chain for this preset
    pub fn chain(&self) -> FilterChain {
        FilterChain::from(self.ops)
    }

    /// Whether this is the identity preset
    pub fn is_identity(&self) -> bool {
        self.id == IDENTITY_FILTER_ID
    }
}

/// All presets, in display order
pub static FILTERS: [FilterPreset; 6] = [
    FilterPreset {
        id: "solaris",
        name: "SOLARIS",
        ops: &[
            FilterOp::Contrast(1.1),
            FilterOp::Brightness(1.1),
            FilterOp::Saturate(1.6),
            FilterOp::Sepia(0.15),
            FilterOp::HueRotate(-10.0),
        ],
        description: "Classic retro sunset look. Golden highlights, vibrant teals, and deep purple-tinted shadows.",
    },
    FilterPreset {
        id: "vapor",
        name: "VAPOR",
        ops: &[
            FilterOp::Contrast(1.2),
            FilterOp::Brightness(1.05),
            FilterOp::Saturate(1.8),
            FilterOp::HueRotate(280.0),
            FilterOp::Sepia(0.1),
        ],
        description: "Neon-infused aesthetic with heavy pink and purple bias. Dreamy and nostalgic.",
    },
    FilterPreset {
        id: "overexposed",
        name: "GLOW",
        ops: &[
            FilterOp::Contrast(0.9),
            FilterOp::Brightness(1.3),
            FilterOp::Saturate(1.4),
            FilterOp::Sepia(0.2),
            FilterOp::Blur(0.5),
        ],
        description: "High-key exposure with soft-focus blooming and vintage light leaks.",
    },
    FilterPreset {
        id: "chrome-plus",
        name: "CHROME+",
        ops: &[
            FilterOp::Contrast(1.3),
            FilterOp::Brightness(1.0),
            FilterOp::Saturate(2.0),
            FilterOp::HueRotate(-5.0),
        ],
        description: "Ultra-vibrant color science inspired by early 2000s high-end point-and-shoots.",
    },
    FilterPreset {
        id: "twilight",
        name: "TWILIT",
        ops: &[
            FilterOp::Contrast(1.1),
            FilterOp::Brightness(0.9),
            FilterOp::Saturate(1.5),
            FilterOp::HueRotate(20.0),
            FilterOp::Sepia(0.3),
        ],
        description: "Deep amber tones and warm color temperature for that perpetual golden hour.",
    },
    FilterPreset {
        id: IDENTITY_FILTER_ID,
        name: "RAW",
        ops: &[
            FilterOp::Contrast(1.0),
            FilterOp::Brightness(1.0),
            FilterOp::Saturate(1.0),
        ],
        description: "Unprocessed sensor data.",
    },
];

/// Look up a preset by id
pub fn find_filter(id: &str) -> Option<&'static FilterPreset> {
    FILTERS.iter().find(|f| f.id == id)
}

/// The identity ("RAW") preset
pub fn identity_filter() -> &'static FilterPreset {
    // The catalog is static and always contains the identity entry
    &FILTERS[FILTERS.len() - 1]
}

/// Preset a new session starts with
pub fn default_filter() -> &'static FilterPreset {
    &FILTERS[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = FILTERS.iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), FILTERS.len());
    }

    #[test]
    fn test_identity_preset_present() {
        let identity = identity_filter();
        assert_eq!(identity.id, "none");
        assert!(identity.is_identity());
        assert!(identity.chain().is_identity());
        assert_eq!(find_filter("none"), Some(identity));
    }

    #[test]
    fn test_identity_chain_is_noop() {
        let mut img = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 40, y as u8 * 70, 99, 255]));
        let original = img.clone();
        identity_filter().chain().apply(&mut img);
        assert_eq!(img, original);
    }

    #[test]
    fn test_only_identity_is_noop() {
        for preset in FILTERS.iter().filter(|f| !f.is_identity()) {
            assert!(!preset.chain().is_identity(), "{} should alter pixels", preset.id);
        }
    }

    #[test]
    fn test_fallback_lookup() {
        assert!(find_filter("does-not-exist").is_none());
        assert_eq!(find_filter("vapor").unwrap().name, "VAPOR");
        assert_eq!(default_filter().id, "solaris");
    }

    #[test]
    fn test_chain_text_matches_catalog() {
        assert_eq!(
            find_filter("overexposed").unwrap().chain().to_string(),
            "contrast(0.9) brightness(1.3) saturate(1.4) sepia(0.2) blur(0.5px)"
        );
    }
}
