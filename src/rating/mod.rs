//! Rating normalization between a caller scale and native encodings.
//!
//! Each tag format stores ratings on its own scale, and players do not
//! agree on how half-star steps map onto that scale. A [`RatingProfile`]
//! is a fixed table of the raw values one convention uses for 0, 0.5, 1,
//! ..., 5 stars. A [`RatingScheme`] ties a format to the profiles it reads,
//! the profile it writes, and its native maximum.
//!
//! # Algorithm
//!
//! - Read: raw `0` is `0`. A raw value found in a read profile at slot `k`
//!   maps to `round(k * max / 10)`. Anything else falls back to
//!   `ceil(raw * max / native_max)` so a non-zero rating never reads as zero.
//! - Write: a value sitting exactly on slot `k` of the caller scale is stored
//!   as the write profile's raw value for `k`. Anything else is scaled
//!   proportionally and rounded.

use crate::model::TagFormat;

/// Raw values for 0 to 5 stars in half-star steps. `None` marks an
/// undefined slot.
pub type RatingProfile = [Option<u8>; 11];

/// Raw values written by common Windows/WMP-style players (POPM).
pub const BASE_255_NON_PROPORTIONAL: RatingProfile = [
    Some(0),
    Some(13),
    Some(1),
    Some(54),
    Some(64),
    Some(118),
    Some(128),
    Some(186),
    Some(196),
    Some(242),
    Some(255),
];

/// Linear 0..=100 in steps of ten.
pub const BASE_100_PROPORTIONAL: RatingProfile = [
    Some(0),
    Some(10),
    Some(20),
    Some(30),
    Some(40),
    Some(50),
    Some(60),
    Some(70),
    Some(80),
    Some(90),
    Some(100),
];

/// Whole stars only, on a 0..=255 scale.
pub const BASE_255_PROPORTIONAL: RatingProfile = [
    None,
    None,
    Some(51),
    None,
    Some(102),
    None,
    Some(153),
    None,
    Some(204),
    None,
    Some(255),
];

/// How one tag format encodes ratings.
#[derive(Debug, Clone, Copy)]
pub struct RatingScheme {
    /// Profiles tried, in order, when decoding
    pub read: &'static [RatingProfile],
    /// Profile used when encoding
    pub write: &'static RatingProfile,
    /// Largest raw value the format stores
    pub native_max: u32,
}

const POPM_READ: [RatingProfile; 2] = [BASE_255_NON_PROPORTIONAL, BASE_255_PROPORTIONAL];
const RIFF_READ: [RatingProfile; 1] = [BASE_100_PROPORTIONAL];

/// ID3v2 POPM and Vorbis RATING share the 255 scale.
pub const BASE_255_SCHEME: RatingScheme = RatingScheme {
    read: &POPM_READ,
    write: &BASE_255_NON_PROPORTIONAL,
    native_max: 255,
};

/// RIFF IRTD stores 0..=100.
pub const BASE_100_SCHEME: RatingScheme = RatingScheme {
    read: &RIFF_READ,
    write: &BASE_100_PROPORTIONAL,
    native_max: 100,
};

/// The rating scheme of a format, or `None` when it stores no rating.
pub fn scheme_for(format: TagFormat) -> Option<&'static RatingScheme> {
    match format {
        TagFormat::Id3v2 | TagFormat::Vorbis => Some(&BASE_255_SCHEME),
        TagFormat::Riff => Some(&BASE_100_SCHEME),
        TagFormat::Id3v1 => None,
    }
}

/// Decode a raw stored rating onto `0..=target_max`.
///
/// With `target_max` of `None` the raw value is returned, clamped to the
/// native maximum.
pub fn normalize_read(raw: u32, scheme: &RatingScheme, target_max: Option<u32>) -> u32 {
    let raw = raw.min(scheme.native_max);
    let Some(max) = target_max else {
        return raw;
    };
    if raw == 0 || max == 0 {
        return 0;
    }

    let slot = scheme.read.iter().find_map(|profile| {
        profile
            .iter()
            .position(|value| value.map(u32::from) == Some(raw))
    });

    let (raw, max64) = (u64::from(raw), u64::from(max));
    let scaled = match slot {
        Some(k) => (k as u64 * max64 + 5) / 10,
        None => (raw * max64).div_ceil(u64::from(scheme.native_max)),
    };
    (scaled as u32).max(1)
}

/// Encode a caller rating on `0..=target_max` into the raw stored value.
///
/// With `target_max` of `None` the value is stored as-is, clamped to the
/// native maximum.
pub fn denormalize_write(value: u32, scheme: &RatingScheme, target_max: Option<u32>) -> u32 {
    let Some(max) = target_max else {
        return value.min(scheme.native_max);
    };
    if max == 0 {
        return 0;
    }

    let (value, max) = (u64::from(value.min(max)), u64::from(max));
    if (value * 10) % max == 0 {
        let k = (value * 10 / max) as usize;
        if let Some(raw) = scheme.write[k] {
            return u32::from(raw);
        }
    }
    ((value * u64::from(scheme.native_max) + max / 2) / max) as u32
}
