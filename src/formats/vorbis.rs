//! Vorbis comments (FLAC). Field names are case-insensitive and repeat
//! once per value.

use lofty::ogg::VorbisComments;
use lofty::tag::TagExt;
use std::path::Path;

use super::FormatAdapter;
use super::container::{flac_write_options, rewrite_flac_stream};
use crate::error::{Error, Result};
use crate::model::{TagFormat, UnifiedKey};

pub(super) fn native_field(key: UnifiedKey) -> Option<&'static str> {
    Some(match key {
        UnifiedKey::Title => "TITLE",
        UnifiedKey::ArtistsNames => "ARTIST",
        UnifiedKey::AlbumName => "ALBUM",
        UnifiedKey::AlbumArtistsNames => "ALBUMARTIST",
        UnifiedKey::GenresNames => "GENRE",
        UnifiedKey::Composers => "COMPOSER",
        UnifiedKey::Rating => "RATING",
        UnifiedKey::Bpm => "BPM",
        UnifiedKey::Comment => "COMMENT",
        UnifiedKey::Copyright => "COPYRIGHT",
        UnifiedKey::Publisher => "ORGANIZATION",
        UnifiedKey::Encoder => "ENCODER",
        UnifiedKey::Url => "WWW",
        UnifiedKey::Isrc => "ISRC",
        UnifiedKey::Mood => "MOOD",
        UnifiedKey::Key => "KEY",
        UnifiedKey::Language => "LANGUAGE",
        UnifiedKey::ReleaseDate => "DATE",
        UnifiedKey::TrackNumber => "TRACKNUMBER",
        UnifiedKey::DiscNumber => "DISCNUMBER",
        UnifiedKey::InvolvedPeople => "INVOLVEDPEOPLE",
        UnifiedKey::Musicians => "PERFORMER",
        UnifiedKey::Keywords => "KEYWORDS",
        UnifiedKey::Lyrics => return None,
    })
}

pub struct VorbisAdapter {
    comments: VorbisComments,
}

impl VorbisAdapter {
    pub fn new(comments: VorbisComments) -> Self {
        Self { comments }
    }
}

impl FormatAdapter for VorbisAdapter {
    fn format(&self) -> TagFormat {
        TagFormat::Vorbis
    }

    fn entries(&self, key: UnifiedKey) -> Vec<String> {
        let Some(name) = native_field(key) else {
            return Vec::new();
        };
        let values = self.comments.get_all(name).map(String::from);
        // only the first COMMENT is surfaced
        if key == UnifiedKey::Comment {
            values.take(1).collect()
        } else {
            values.collect()
        }
    }

    fn set_entries(&mut self, key: UnifiedKey, entries: Vec<String>) -> Result<()> {
        let name = native_field(key).ok_or_else(|| Error::unsupported(key, TagFormat::Vorbis))?;
        let _ = self.comments.remove(name);
        for entry in entries {
            self.comments.push(name.to_string(), entry);
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        TagExt::is_empty(&self.comments)
    }

    fn save(&self, path: &Path) -> Result<()> {
        rewrite_flac_stream(path, |stream| {
            self.comments.save_to(stream, flac_write_options())
        })
    }
}
