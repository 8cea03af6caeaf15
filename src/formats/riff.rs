//! RIFF INFO chunks in WAV files.
//!
//! An INFO list may repeat a chunk id. Every repeat is read as one more
//! entry, and a write replaces all of them with one joined chunk.

use lofty::config::WriteOptions;
use lofty::iff::wav::RiffInfoList;
use lofty::tag::TagExt;
use std::path::Path;

use super::FormatAdapter;
use super::container::save_tag;
use crate::error::{Error, Result};
use crate::model::{TagFormat, UnifiedKey};
use crate::multivalue::{self, RIFF_SEPARATOR};

pub(super) fn native_field(key: UnifiedKey) -> Option<&'static str> {
    Some(match key {
        UnifiedKey::Title => "INAM",
        UnifiedKey::ArtistsNames => "IART",
        UnifiedKey::AlbumName => "IPRD",
        UnifiedKey::AlbumArtistsNames => "IAAR",
        UnifiedKey::GenresNames => "IGNR",
        UnifiedKey::Rating => "IRTD",
        UnifiedKey::Comment => "ICMT",
        UnifiedKey::Copyright => "ICOP",
        UnifiedKey::Publisher => "IPUB",
        UnifiedKey::Encoder => "ISFT",
        UnifiedKey::Language => "ILNG",
        UnifiedKey::ReleaseDate => "ICRD",
        UnifiedKey::TrackNumber => "IPRT",
        UnifiedKey::Keywords => "IKEY",
        _ => return None,
    })
}

pub struct RiffAdapter {
    info: RiffInfoList,
}

impl RiffAdapter {
    pub fn new(info: RiffInfoList) -> Self {
        Self { info }
    }
}

impl FormatAdapter for RiffAdapter {
    fn format(&self) -> TagFormat {
        TagFormat::Riff
    }

    fn entries(&self, key: UnifiedKey) -> Vec<String> {
        let Some(id) = native_field(key) else {
            return Vec::new();
        };
        (&self.info)
            .into_iter()
            .filter(|(item, _)| item.eq_ignore_ascii_case(id))
            .map(|(_, value)| value.clone())
            .collect()
    }

    fn set_entries(&mut self, key: UnifiedKey, entries: Vec<String>) -> Result<()> {
        let id = native_field(key).ok_or_else(|| Error::unsupported(key, TagFormat::Riff))?;
        // `remove` only drops the first match
        while self.info.remove(id).is_some() {}
        if let Some(value) = multivalue::join(&entries, RIFF_SEPARATOR) {
            self.info.insert(id.to_string(), value);
        }
        Ok(())
    }

    /// Genres collapse to the first token.
    fn list_limit(&self, key: UnifiedKey) -> Option<usize> {
        (key == UnifiedKey::GenresNames).then_some(1)
    }

    fn is_empty(&self) -> bool {
        TagExt::is_empty(&self.info)
    }

    fn save(&self, path: &Path) -> Result<()> {
        save_tag(&self.info, path, WriteOptions::default())
    }
}
