//! ID3v1 / ID3v1.1 trailer, read-only.

use lofty::id3::v1::GENRES;
use std::path::Path;

use super::FormatAdapter;
use crate::error::{Error, Result};
use crate::model::{TagFormat, UnifiedKey};

pub(crate) const ID3V1_TAG_SIZE: usize = 128;

pub(super) fn native_field(key: UnifiedKey) -> Option<&'static str> {
    Some(match key {
        UnifiedKey::Title => "title",
        UnifiedKey::ArtistsNames => "artist",
        UnifiedKey::AlbumName => "album",
        UnifiedKey::ReleaseDate => "year",
        UnifiedKey::Comment => "comment",
        UnifiedKey::TrackNumber => "track",
        UnifiedKey::GenresNames => "genre",
        _ => return None,
    })
}

/// Decoded fields of a `TAG` block. Text fields are at most 30 bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Id3v1Fields {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<String>,
    pub comment: Option<String>,
    pub track: Option<u8>,
    pub genre: Option<u8>,
}

impl Id3v1Fields {
    /// Decode a 128-byte block. `None` unless it starts with `TAG`.
    pub fn parse(block: &[u8; ID3V1_TAG_SIZE]) -> Option<Self> {
        if &block[..3] != b"TAG" {
            return None;
        }

        // v1.1 steals the last two comment bytes for a zero and the track
        let (comment, track) = if block[125] == 0 && block[126] != 0 {
            (&block[97..125], Some(block[126]))
        } else {
            (&block[97..127], None)
        };

        Some(Self {
            title: latin1(&block[3..33]),
            artist: latin1(&block[33..63]),
            album: latin1(&block[63..93]),
            year: latin1(&block[93..97]),
            comment: latin1(comment),
            track,
            genre: (block[127] != 255).then_some(block[127]),
        })
    }

    /// Genre name from the standard table; unknown codes as their number.
    pub fn genre_name(&self) -> Option<String> {
        self.genre.map(|code| {
            GENRES
                .get(usize::from(code))
                .map(|name| name.to_string())
                .unwrap_or_else(|| code.to_string())
        })
    }
}

fn latin1(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    let text: String = bytes[..end].iter().map(|b| char::from(*b)).collect();
    let text = text.trim_end();
    (!text.is_empty()).then(|| text.to_string())
}

pub struct Id3v1Adapter {
    fields: Id3v1Fields,
}

impl Id3v1Adapter {
    pub fn new(fields: Id3v1Fields) -> Self {
        Self { fields }
    }
}

impl FormatAdapter for Id3v1Adapter {
    fn format(&self) -> TagFormat {
        TagFormat::Id3v1
    }

    fn entries(&self, key: UnifiedKey) -> Vec<String> {
        let f = &self.fields;
        let value = match key {
            UnifiedKey::Title => f.title.clone(),
            UnifiedKey::ArtistsNames => f.artist.clone(),
            UnifiedKey::AlbumName => f.album.clone(),
            UnifiedKey::ReleaseDate => f.year.clone(),
            UnifiedKey::Comment => f.comment.clone(),
            UnifiedKey::TrackNumber => f.track.map(|t| t.to_string()),
            UnifiedKey::GenresNames => f.genre_name(),
            _ => None,
        };
        value.into_iter().collect()
    }

    fn set_entries(&mut self, _key: UnifiedKey, _entries: Vec<String>) -> Result<()> {
        Err(Error::ReadOnlyFormat(TagFormat::Id3v1))
    }

    fn is_empty(&self) -> bool {
        self.fields == Id3v1Fields::default()
    }

    fn save(&self, _path: &Path) -> Result<()> {
        Err(Error::ReadOnlyFormat(TagFormat::Id3v1))
    }
}
