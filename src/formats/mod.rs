//! Tag format adapters.
//!
//! Each adapter wraps one native tag and exposes it as plain string
//! entries per [`UnifiedKey`]. Everything that is the same across formats
//! (separator parsing, rating scaling, shape validation) happens here, on
//! top of [`FormatAdapter`], so the adapters only deal with their own
//! field names and storage quirks.
//!
//! # Support matrix
//!
//! [`native_field`] is the single source of truth for which keys a format
//! stores. [`support`] derives writability from it.

mod container;
mod id3v1;
mod id3v2;
mod riff;
mod vorbis;

use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{
    AudioType, Id3v2Version, TagFormat, UnifiedKey, UnifiedMetadata, UnifiedValue, ValueKind,
};
use crate::multivalue;
use crate::rating;

pub use container::{NativeTags, read_native, remove_format};
pub use id3v1::{Id3v1Adapter, Id3v1Fields};
pub use id3v2::Id3v2Adapter;
pub use riff::RiffAdapter;
pub use vorbis::VorbisAdapter;

/// Whether a format can store a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Writable,
    ReadOnly,
    Unsupported,
}

/// Native field name of `key` in `format`, or `None` when unsupported.
pub fn native_field(format: TagFormat, key: UnifiedKey) -> Option<&'static str> {
    match format {
        TagFormat::Id3v1 => id3v1::native_field(key),
        TagFormat::Id3v2 => id3v2::native_field(key),
        TagFormat::Riff => riff::native_field(key),
        TagFormat::Vorbis => vorbis::native_field(key),
    }
}

pub fn support(format: TagFormat, key: UnifiedKey) -> Support {
    match native_field(format, key) {
        None => Support::Unsupported,
        Some(_) if !format.is_writable() => Support::ReadOnly,
        Some(_) => Support::Writable,
    }
}

/// Keys a format can store, in key order.
pub fn supported_keys(format: TagFormat) -> Vec<UnifiedKey> {
    UnifiedKey::ALL
        .into_iter()
        .filter(|key| native_field(format, *key).is_some())
        .collect()
}

/// One native tag viewed as string entries.
pub trait FormatAdapter {
    fn format(&self) -> TagFormat;

    /// Stored entries for `key`, in file order. Empty when absent.
    fn entries(&self, key: UnifiedKey) -> Vec<String>;

    /// Replace every stored entry of `key`. An empty vector removes the field.
    fn set_entries(&mut self, key: UnifiedKey, entries: Vec<String>) -> Result<()>;

    /// Largest list this format reports for `key`.
    fn list_limit(&self, _key: UnifiedKey) -> Option<usize> {
        None
    }

    fn is_empty(&self) -> bool;

    /// Persist the tag into `path`. An empty tag removes it from the file.
    fn save(&self, path: &Path) -> Result<()>;
}

/// Build the adapter of `format` over the tags read from a file.
///
/// Formats missing from the file start empty, so writes create them.
pub fn adapter_for(
    format: TagFormat,
    audio_type: AudioType,
    tags: &NativeTags,
    id3v2_version: Id3v2Version,
) -> Box<dyn FormatAdapter> {
    match format {
        TagFormat::Id3v1 => Box::new(Id3v1Adapter::new(tags.id3v1.clone().unwrap_or_default())),
        TagFormat::Id3v2 => Box::new(Id3v2Adapter::new(
            tags.id3v2.clone().unwrap_or_default(),
            audio_type,
            id3v2_version,
        )),
        TagFormat::Riff => Box::new(RiffAdapter::new(tags.riff.clone().unwrap_or_default())),
        TagFormat::Vorbis => {
            Box::new(VorbisAdapter::new(tags.vorbis.clone().unwrap_or_default()))
        }
    }
}

/// Decode one key from an adapter. Absent, blank or unparsable values are `None`.
pub fn read_value(
    adapter: &dyn FormatAdapter,
    key: UnifiedKey,
    rating_max: Option<u32>,
) -> Option<UnifiedValue> {
    let format = adapter.format();
    if native_field(format, key).is_none() {
        return None;
    }

    let entries = adapter.entries(key);
    match key.kind() {
        ValueKind::List => {
            let mut values = multivalue::parse_entries(&entries, format.class())?;
            if let Some(limit) = adapter.list_limit(key) {
                values.truncate(limit);
            }
            Some(UnifiedValue::List(values))
        }
        ValueKind::Text => multivalue::first_text(&entries).map(UnifiedValue::Text),
        ValueKind::Number => {
            let text = multivalue::first_text(&entries)?;
            let Some(number) = parse_number(&text) else {
                warn!(%format, %key, value = %text, "Ignoring unparsable number");
                return None;
            };
            if key == UnifiedKey::Rating {
                let scheme = rating::scheme_for(format)?;
                Some(UnifiedValue::Number(rating::normalize_read(
                    number, scheme, rating_max,
                )))
            } else {
                Some(UnifiedValue::Number(number))
            }
        }
    }
}

/// Decode every supported key present in an adapter.
pub fn read_all(adapter: &dyn FormatAdapter, rating_max: Option<u32>) -> UnifiedMetadata {
    supported_keys(adapter.format())
        .into_iter()
        .filter_map(|key| read_value(adapter, key, rating_max).map(|value| (key, value)))
        .collect()
}

/// Validate `value` for `key` in `format` and turn it into native entries.
///
/// Does not touch any file. An empty result means the field is removed.
pub fn encode_value(
    format: TagFormat,
    key: UnifiedKey,
    value: Option<&UnifiedValue>,
    rating_max: Option<u32>,
) -> Result<Vec<String>> {
    match support(format, key) {
        Support::Unsupported => return Err(Error::unsupported(key, format)),
        Support::ReadOnly => return Err(Error::ReadOnlyFormat(format)),
        Support::Writable => {}
    }

    let Some(value) = value else {
        return Ok(Vec::new());
    };
    // a lone string is accepted for a list key as its only entry
    let list_from_text = key.kind() == ValueKind::List && value.kind() == ValueKind::Text;
    if value.kind() != key.kind() && !list_from_text {
        return Err(Error::InvalidMetadataType {
            key,
            expected: key.kind(),
        });
    }

    Ok(match value {
        UnifiedValue::List(values) => multivalue::clean(values),
        UnifiedValue::Text(text) if list_from_text => {
            multivalue::clean(std::slice::from_ref(text))
        }
        UnifiedValue::Text(text) if text.trim().is_empty() => Vec::new(),
        UnifiedValue::Text(text) => vec![text.clone()],
        UnifiedValue::Number(number) if key == UnifiedKey::Rating => {
            let scheme =
                rating::scheme_for(format).ok_or_else(|| Error::unsupported(key, format))?;
            vec![rating::denormalize_write(*number, scheme, rating_max).to_string()]
        }
        UnifiedValue::Number(number) => vec![number.to_string()],
    })
}

/// Integers, or decimals rounded to the nearest integer.
fn parse_number(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(n) = text.parse::<u32>() {
        return Some(n);
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormatClass;

    #[test]
    fn test_support_matrix_samples() {
        assert_eq!(support(TagFormat::Id3v1, UnifiedKey::Title), Support::ReadOnly);
        assert_eq!(support(TagFormat::Id3v1, UnifiedKey::Lyrics), Support::Unsupported);
        assert_eq!(support(TagFormat::Id3v2, UnifiedKey::Lyrics), Support::Writable);
        assert_eq!(support(TagFormat::Riff, UnifiedKey::Lyrics), Support::Unsupported);
        assert_eq!(support(TagFormat::Riff, UnifiedKey::Bpm), Support::Unsupported);
        assert_eq!(support(TagFormat::Riff, UnifiedKey::Rating), Support::Writable);
        assert_eq!(support(TagFormat::Vorbis, UnifiedKey::Lyrics), Support::Unsupported);
    }

    #[test]
    fn test_id3v2_supports_every_key() {
        assert_eq!(supported_keys(TagFormat::Id3v2).len(), UnifiedKey::ALL.len());
    }

    #[test]
    fn test_encode_rejects_unsupported_and_read_only() {
        let lyrics = UnifiedValue::from("la la");
        assert!(matches!(
            encode_value(TagFormat::Riff, UnifiedKey::Lyrics, Some(&lyrics), Some(100)),
            Err(Error::MetadataNotSupported { .. })
        ));
        assert!(matches!(
            encode_value(TagFormat::Id3v1, UnifiedKey::Title, Some(&lyrics), Some(100)),
            Err(Error::ReadOnlyFormat(TagFormat::Id3v1))
        ));
    }

    #[test]
    fn test_encode_rejects_wrong_shape() {
        let text = UnifiedValue::from("five");
        let err = encode_value(TagFormat::Id3v2, UnifiedKey::Rating, Some(&text), Some(100))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidMetadataType {
                key: UnifiedKey::Rating,
                expected: ValueKind::Number
            }
        ));
    }

    #[test]
    fn test_encode_text_for_list_key_is_one_entry() {
        let solo = UnifiedValue::from(" Solo Artist ");
        assert_eq!(
            encode_value(TagFormat::Vorbis, UnifiedKey::ArtistsNames, Some(&solo), None).unwrap(),
            vec!["Solo Artist".to_string()]
        );
        let blank = UnifiedValue::from(" ");
        assert!(
            encode_value(TagFormat::Id3v2, UnifiedKey::Composers, Some(&blank), None)
                .unwrap()
                .is_empty()
        );

        // the reverse is still a shape error
        let list = UnifiedValue::from(vec!["A", "B"]);
        assert!(matches!(
            encode_value(TagFormat::Vorbis, UnifiedKey::Title, Some(&list), None),
            Err(Error::InvalidMetadataType { .. })
        ));
    }

    #[test]
    fn test_encode_blank_means_delete() {
        let blank = UnifiedValue::from("   ");
        assert!(
            encode_value(TagFormat::Vorbis, UnifiedKey::Title, Some(&blank), None)
                .unwrap()
                .is_empty()
        );
        let blanks = UnifiedValue::from(vec!["", " "]);
        assert!(
            encode_value(TagFormat::Vorbis, UnifiedKey::ArtistsNames, Some(&blanks), None)
                .unwrap()
                .is_empty()
        );
        assert!(
            encode_value(TagFormat::Vorbis, UnifiedKey::Title, None, None)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_encode_rating_uses_format_scale() {
        let rating = UnifiedValue::from(50u32);
        assert_eq!(
            encode_value(TagFormat::Id3v2, UnifiedKey::Rating, Some(&rating), Some(100)).unwrap(),
            vec!["118".to_string()]
        );
        assert_eq!(
            encode_value(TagFormat::Riff, UnifiedKey::Rating, Some(&rating), Some(100)).unwrap(),
            vec!["50".to_string()]
        );
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 120 "), Some(120));
        assert_eq!(parse_number("127.6"), Some(128));
        assert_eq!(parse_number("-3"), None);
        assert_eq!(parse_number("fast"), None);
    }

    #[test]
    fn test_read_value_applies_class_and_limit() {
        let mut riff = RiffAdapter::new(Default::default());
        riff.set_entries(UnifiedKey::GenresNames, vec!["Rock; Pop".to_string()])
            .unwrap();
        assert_eq!(TagFormat::Riff.class(), FormatClass::Legacy);
        assert_eq!(
            read_value(&riff, UnifiedKey::GenresNames, Some(100)),
            Some(UnifiedValue::from(vec!["Rock"]))
        );

        let mut vorbis = VorbisAdapter::new(Default::default());
        vorbis
            .set_entries(
                UnifiedKey::GenresNames,
                vec!["Rock; Pop".to_string(), "Jazz".to_string()],
            )
            .unwrap();
        assert_eq!(
            read_value(&vorbis, UnifiedKey::GenresNames, Some(100)),
            Some(UnifiedValue::from(vec!["Rock; Pop", "Jazz"]))
        );
    }

    #[test]
    fn test_read_all_skips_absent_keys() {
        let mut vorbis = VorbisAdapter::new(Default::default());
        vorbis
            .set_entries(UnifiedKey::Title, vec!["Song".to_string()])
            .unwrap();
        vorbis
            .set_entries(UnifiedKey::Rating, vec!["196".to_string()])
            .unwrap();
        let all = read_all(&vorbis, Some(100));
        assert_eq!(all.len(), 2);
        assert_eq!(all[&UnifiedKey::Rating], UnifiedValue::Number(80));
    }
}
