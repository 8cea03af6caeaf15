//! Format priority per audio container.
//!
//! Resolves which tag formats apply to a container and in which order:
//! 1. The container's native format (Vorbis for FLAC, RIFF INFO for WAV)
//! 2. ID3v2, where the container carries one
//! 3. ID3v1, read-only, last
//!
//! MP3 has no native format, so ID3v2 leads. The first entry is the
//! default write target.
//!
//! # Design
//!
//! The table is immutable data behind a `match`. Merging is
//! first-writer-wins by priority: a key resolved from a higher priority
//! format is never overridden by a lower one, whatever the write order was.

use crate::model::{AudioType, TagFormat, UnifiedMetadata};

const MP3_PRIORITY: &[TagFormat] = &[TagFormat::Id3v2, TagFormat::Id3v1];
const FLAC_PRIORITY: &[TagFormat] = &[TagFormat::Vorbis, TagFormat::Id3v2, TagFormat::Id3v1];
const WAV_PRIORITY: &[TagFormat] = &[TagFormat::Riff, TagFormat::Id3v2, TagFormat::Id3v1];

/// Applicable formats for a container, highest priority first.
pub fn applicable_formats(audio_type: AudioType) -> &'static [TagFormat] {
    match audio_type {
        AudioType::Mp3 => MP3_PRIORITY,
        AudioType::Flac => FLAC_PRIORITY,
        AudioType::Wav => WAV_PRIORITY,
    }
}

pub fn is_applicable(audio_type: AudioType, format: TagFormat) -> bool {
    applicable_formats(audio_type).contains(&format)
}

/// Where format-unspecified writes go. Always writable.
pub fn default_write_format(audio_type: AudioType) -> TagFormat {
    applicable_formats(audio_type)
        .iter()
        .copied()
        .find(TagFormat::is_writable)
        .unwrap_or(TagFormat::Id3v2)
}

/// Merge per-format views given in priority order.
pub fn merge<I>(views: I) -> UnifiedMetadata
where
    I: IntoIterator<Item = UnifiedMetadata>,
{
    let mut merged = UnifiedMetadata::new();
    for view in views {
        for (key, value) in view {
            merged.entry(key).or_insert(value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{UnifiedKey, UnifiedValue};

    fn view(pairs: &[(UnifiedKey, &str)]) -> UnifiedMetadata {
        pairs
            .iter()
            .map(|(k, v)| (*k, UnifiedValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(
            applicable_formats(AudioType::Mp3),
            &[TagFormat::Id3v2, TagFormat::Id3v1]
        );
        assert_eq!(applicable_formats(AudioType::Flac)[0], TagFormat::Vorbis);
        assert_eq!(applicable_formats(AudioType::Wav)[0], TagFormat::Riff);
        assert!(!is_applicable(AudioType::Mp3, TagFormat::Riff));
        assert!(is_applicable(AudioType::Wav, TagFormat::Id3v2));
    }

    #[test]
    fn test_default_write_format_is_never_id3v1() {
        assert_eq!(default_write_format(AudioType::Mp3), TagFormat::Id3v2);
        assert_eq!(default_write_format(AudioType::Flac), TagFormat::Vorbis);
        assert_eq!(default_write_format(AudioType::Wav), TagFormat::Riff);
    }

    #[test]
    fn test_merge_first_wins() {
        let high = view(&[(UnifiedKey::Title, "High")]);
        let low = view(&[
            (UnifiedKey::Title, "Low"),
            (UnifiedKey::AlbumName, "Only Low"),
        ]);
        let merged = merge([high, low]);
        assert_eq!(merged[&UnifiedKey::Title], UnifiedValue::from("High"));
        assert_eq!(merged[&UnifiedKey::AlbumName], UnifiedValue::from("Only Low"));
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::<UnifiedMetadata>::new()).is_empty());
    }
}
