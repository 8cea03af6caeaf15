//! ID3v2.3 / ID3v2.4 frames.
//!
//! v2.4 writes UTF-8 and keeps list values apart with null separators inside
//! one frame. v2.3 has no such separator, so lists are joined with `" / "`
//! and written as UTF-16. Reading accepts both.
//!
//! MOOD is `TMOO` in v2.4. v2.3 has no such frame, so it goes to
//! `TXXX:MOOD` there.

use lofty::TextEncoding;
use lofty::config::WriteOptions;
use lofty::id3::v2::{
    CommentFrame, ExtendedUrlFrame, Frame, FrameId, Id3v2Tag, PopularimeterFrame, TextInformationFrame,
    TimestampFrame, UnsynchronizedTextFrame,
};
use lofty::tag::items::Timestamp;
use lofty::tag::{Accessor, TagExt};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

use super::FormatAdapter;
use super::container::{save_tag, write_flac_id3v2};
use crate::error::{Error, Result};
use crate::model::{AudioType, Id3v2Version, TagFormat, UnifiedKey};
use crate::multivalue::ID3V23_SEPARATOR;

/// Owner string of the POPM frames this crate writes.
pub const POPM_EMAIL: &str = "unitag@localhost";

/// Where a key lives in an ID3v2 tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// A `T***` text frame
    Text(&'static str),
    /// A `TXXX` frame with this description
    UserText(&'static str),
    /// `COMM`, empty description
    Comment,
    /// `USLT`
    Lyrics,
    /// `POPM`, first frame
    Popularimeter,
    /// `WXXX`, empty description
    UserUrl,
    /// `TDRC`
    RecordingTime,
    /// `TMOO`, or `TXXX:MOOD` in v2.3
    Mood,
}

const MOOD_DESCRIPTION: &str = "MOOD";

fn slot(key: UnifiedKey) -> Slot {
    match key {
        UnifiedKey::Title => Slot::Text("TIT2"),
        UnifiedKey::ArtistsNames => Slot::Text("TPE1"),
        UnifiedKey::AlbumName => Slot::Text("TALB"),
        UnifiedKey::AlbumArtistsNames => Slot::Text("TPE2"),
        UnifiedKey::GenresNames => Slot::Text("TCON"),
        UnifiedKey::Composers => Slot::Text("TCOM"),
        UnifiedKey::Rating => Slot::Popularimeter,
        UnifiedKey::Bpm => Slot::Text("TBPM"),
        UnifiedKey::Comment => Slot::Comment,
        UnifiedKey::Copyright => Slot::Text("TCOP"),
        UnifiedKey::Publisher => Slot::Text("TPUB"),
        UnifiedKey::Lyrics => Slot::Lyrics,
        UnifiedKey::Encoder => Slot::Text("TSSE"),
        UnifiedKey::Url => Slot::UserUrl,
        UnifiedKey::Isrc => Slot::Text("TSRC"),
        UnifiedKey::Mood => Slot::Mood,
        UnifiedKey::Key => Slot::Text("TKEY"),
        UnifiedKey::Language => Slot::Text("TLAN"),
        UnifiedKey::ReleaseDate => Slot::RecordingTime,
        UnifiedKey::TrackNumber => Slot::Text("TRCK"),
        UnifiedKey::DiscNumber => Slot::Text("TPOS"),
        UnifiedKey::InvolvedPeople => Slot::UserText("INVOLVED PEOPLE"),
        UnifiedKey::Musicians => Slot::UserText("MUSICIANS"),
        UnifiedKey::Keywords => Slot::UserText("KEYWORDS"),
    }
}

pub(super) fn native_field(key: UnifiedKey) -> Option<&'static str> {
    Some(match slot(key) {
        Slot::Text(id) => id,
        Slot::UserText(_) => "TXXX",
        Slot::Comment => "COMM",
        Slot::Lyrics => "USLT",
        Slot::Popularimeter => "POPM",
        Slot::UserUrl => "WXXX",
        Slot::RecordingTime => "TDRC",
        Slot::Mood => "TMOO",
    })
}

fn frame_id(id: &'static str) -> FrameId<'static> {
    FrameId::Valid(Cow::Borrowed(id))
}

pub struct Id3v2Adapter {
    tag: Id3v2Tag,
    audio_type: AudioType,
    version: Id3v2Version,
}

impl Id3v2Adapter {
    pub fn new(tag: Id3v2Tag, audio_type: AudioType, version: Id3v2Version) -> Self {
        Self {
            tag,
            audio_type,
            version,
        }
    }

    fn encoding(&self) -> TextEncoding {
        match self.version {
            Id3v2Version::V3 => TextEncoding::UTF16,
            Id3v2Version::V4 => TextEncoding::UTF8,
        }
    }

    /// Collapse list entries into one frame value for the target version.
    fn pack(&self, entries: Vec<String>) -> String {
        match self.version {
            Id3v2Version::V4 => entries.join("\0"),
            Id3v2Version::V3 => entries.join(ID3V23_SEPARATOR),
        }
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions::default().use_id3v23(self.version == Id3v2Version::V3)
    }

    fn text_entries(&self, id: &'static str) -> Vec<String> {
        if id == "TCON"
            && let Some(genres) = self.tag.genres()
        {
            return genres.map(String::from).collect();
        }
        match self.tag.get(&frame_id(id)) {
            Some(Frame::Text(frame)) => split_nulls(&frame.value),
            _ => Vec::new(),
        }
    }

    fn recording_time(&self) -> Vec<String> {
        match self.tag.get(&frame_id("TDRC")) {
            Some(Frame::Timestamp(frame)) => vec![frame.timestamp.to_string()],
            Some(Frame::Text(frame)) => split_nulls(&frame.value),
            // v2.3 files that were never upgraded on read
            _ => self.text_entries("TYER"),
        }
    }
}

fn split_nulls(value: &str) -> Vec<String> {
    value.split('\0').map(String::from).collect()
}

impl FormatAdapter for Id3v2Adapter {
    fn format(&self) -> TagFormat {
        TagFormat::Id3v2
    }

    fn entries(&self, key: UnifiedKey) -> Vec<String> {
        match slot(key) {
            Slot::Text(id) => self.text_entries(id),
            Slot::UserText(description) => self
                .tag
                .get_user_text(description)
                .map(split_nulls)
                .unwrap_or_default(),
            Slot::Comment => self.tag.comment().map(|c| c.into_owned()).into_iter().collect(),
            Slot::Lyrics => self
                .tag
                .unsync_text()
                .next()
                .map(|frame| frame.content.clone())
                .into_iter()
                .collect(),
            Slot::Popularimeter => match self.tag.get(&frame_id("POPM")) {
                Some(Frame::Popularimeter(frame)) => vec![frame.rating.to_string()],
                _ => Vec::new(),
            },
            Slot::UserUrl => match self.tag.get(&frame_id("WXXX")) {
                Some(Frame::UserUrl(frame)) => vec![frame.content.clone()],
                _ => Vec::new(),
            },
            Slot::RecordingTime => self.recording_time(),
            Slot::Mood => {
                let entries = self.text_entries("TMOO");
                if !entries.is_empty() {
                    return entries;
                }
                self.tag
                    .get_user_text(MOOD_DESCRIPTION)
                    .map(split_nulls)
                    .unwrap_or_default()
            }
        }
    }

    fn set_entries(&mut self, key: UnifiedKey, entries: Vec<String>) -> Result<()> {
        let slot = slot(key);
        if entries.is_empty() {
            match slot {
                Slot::Text(id) => {
                    let _ = self.tag.remove(&frame_id(id));
                }
                Slot::UserText(description) => {
                    let _ = self.tag.remove_user_text(description);
                }
                Slot::Comment => self.tag.remove_comment(),
                Slot::Lyrics => {
                    let _ = self.tag.remove(&frame_id("USLT"));
                }
                Slot::Popularimeter => {
                    let _ = self.tag.remove(&frame_id("POPM"));
                }
                Slot::UserUrl => {
                    let _ = self.tag.remove(&frame_id("WXXX"));
                }
                Slot::RecordingTime => {
                    let _ = self.tag.remove(&frame_id("TDRC"));
                    let _ = self.tag.remove(&frame_id("TYER"));
                }
                Slot::Mood => {
                    let _ = self.tag.remove(&frame_id("TMOO"));
                    let _ = self.tag.remove_user_text(MOOD_DESCRIPTION);
                }
            }
            return Ok(());
        }

        let encoding = self.encoding();
        let value = self.pack(entries);
        debug!(%key, ?slot, version = self.version.as_str(), "Setting ID3v2 frame");

        match slot {
            Slot::Text(id) => {
                let _ = self.tag.remove(&frame_id(id));
                self.tag.insert(Frame::Text(TextInformationFrame::new(
                    frame_id(id),
                    encoding,
                    value,
                )));
            }
            Slot::UserText(description) => {
                self.tag.insert_user_text(description.to_string(), value);
            }
            Slot::Comment => {
                // `set_comment` would always pick UTF-8, which v2.3 lacks
                self.tag.remove_comment();
                self.tag.insert(Frame::Comment(CommentFrame::new(
                    encoding,
                    *b"eng",
                    String::new(),
                    value,
                )));
            }
            Slot::Lyrics => {
                let _ = self.tag.remove(&frame_id("USLT"));
                self.tag
                    .insert(Frame::UnsynchronizedText(UnsynchronizedTextFrame::new(
                        encoding,
                        *b"eng",
                        String::new(),
                        value,
                    )));
            }
            Slot::Popularimeter => {
                let rating: u8 = value
                    .parse()
                    .map_err(|_| Error::invalid_value(key, format!("'{value}' is not 0..=255")))?;
                let counter = match self.tag.get(&frame_id("POPM")) {
                    Some(Frame::Popularimeter(existing)) => existing.counter,
                    _ => 0,
                };
                let _ = self.tag.remove(&frame_id("POPM"));
                self.tag.insert(Frame::Popularimeter(PopularimeterFrame::new(
                    POPM_EMAIL.to_string(),
                    rating,
                    counter,
                )));
            }
            Slot::UserUrl => {
                let _ = self.tag.remove(&frame_id("WXXX"));
                // the URL body is always Latin-1, whatever the description uses
                self.tag.insert(Frame::UserUrl(ExtendedUrlFrame::new(
                    TextEncoding::Latin1,
                    String::new(),
                    value,
                )));
            }
            Slot::RecordingTime => {
                let timestamp: Timestamp = value.trim().parse().map_err(|_| {
                    Error::invalid_value(key, format!("'{value}' is not a date (YYYY[-MM[-DD]])"))
                })?;
                let _ = self.tag.remove(&frame_id("TDRC"));
                let _ = self.tag.remove(&frame_id("TYER"));
                self.tag.insert(Frame::Timestamp(TimestampFrame::new(
                    frame_id("TDRC"),
                    encoding,
                    timestamp,
                )));
            }
            Slot::Mood => {
                let _ = self.tag.remove(&frame_id("TMOO"));
                let _ = self.tag.remove_user_text(MOOD_DESCRIPTION);
                match self.version {
                    Id3v2Version::V4 => self.tag.insert(Frame::Text(TextInformationFrame::new(
                        frame_id("TMOO"),
                        encoding,
                        value,
                    ))),
                    Id3v2Version::V3 => {
                        self.tag.insert_user_text(MOOD_DESCRIPTION.to_string(), value)
                    }
                };
            }
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        TagExt::is_empty(&self.tag)
    }

    fn save(&self, path: &Path) -> Result<()> {
        if self.audio_type != AudioType::Flac {
            return save_tag(&self.tag, path, self.write_options());
        }

        let encoded = if TagExt::is_empty(&self.tag) {
            None
        } else {
            let mut bytes = Vec::new();
            self.tag
                .dump_to(&mut bytes, self.write_options())
                .map_err(|e| Error::codec(path, e))?;
            Some(bytes)
        };
        write_flac_id3v2(path, encoded)
    }
}
