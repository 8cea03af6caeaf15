//! Core types of the unified metadata model.
//!
//! Defines the format-agnostic key vocabulary ([`UnifiedKey`]), the tag
//! formats ([`TagFormat`]) and audio containers ([`AudioType`]) the crate
//! understands, and the value type exchanged with callers
//! ([`UnifiedValue`]).
//!
//! All of these are plain `Copy`/`Clone` data. The tables relating them
//! (native field names, priority order) live in `formats` and `priority`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::Error;

/// Unified metadata, keyed by [`UnifiedKey`]. Absent keys are not present.
pub type UnifiedMetadata = BTreeMap<UnifiedKey, UnifiedValue>;

/// A batch of changes. `None` deletes the key.
pub type MetadataUpdate = BTreeMap<UnifiedKey, Option<UnifiedValue>>;

/// Shape of the value carried by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// A single string
    Text,
    /// An ordered list of strings
    List,
    /// An unsigned integer
    Number,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::List => "list",
            ValueKind::Number => "number",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format-agnostic field identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnifiedKey {
    Title,
    ArtistsNames,
    AlbumName,
    AlbumArtistsNames,
    GenresNames,
    Composers,
    Rating,
    Bpm,
    Comment,
    Copyright,
    Publisher,
    Lyrics,
    Encoder,
    Url,
    Isrc,
    Mood,
    Key,
    Language,
    ReleaseDate,
    TrackNumber,
    DiscNumber,
    InvolvedPeople,
    Musicians,
    Keywords,
}

impl UnifiedKey {
    /// Every key, in declaration order.
    pub const ALL: [UnifiedKey; 24] = [
        UnifiedKey::Title,
        UnifiedKey::ArtistsNames,
        UnifiedKey::AlbumName,
        UnifiedKey::AlbumArtistsNames,
        UnifiedKey::GenresNames,
        UnifiedKey::Composers,
        UnifiedKey::Rating,
        UnifiedKey::Bpm,
        UnifiedKey::Comment,
        UnifiedKey::Copyright,
        UnifiedKey::Publisher,
        UnifiedKey::Lyrics,
        UnifiedKey::Encoder,
        UnifiedKey::Url,
        UnifiedKey::Isrc,
        UnifiedKey::Mood,
        UnifiedKey::Key,
        UnifiedKey::Language,
        UnifiedKey::ReleaseDate,
        UnifiedKey::TrackNumber,
        UnifiedKey::DiscNumber,
        UnifiedKey::InvolvedPeople,
        UnifiedKey::Musicians,
        UnifiedKey::Keywords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnifiedKey::Title => "TITLE",
            UnifiedKey::ArtistsNames => "ARTISTS_NAMES",
            UnifiedKey::AlbumName => "ALBUM_NAME",
            UnifiedKey::AlbumArtistsNames => "ALBUM_ARTISTS_NAMES",
            UnifiedKey::GenresNames => "GENRES_NAMES",
            UnifiedKey::Composers => "COMPOSERS",
            UnifiedKey::Rating => "RATING",
            UnifiedKey::Bpm => "BPM",
            UnifiedKey::Comment => "COMMENT",
            UnifiedKey::Copyright => "COPYRIGHT",
            UnifiedKey::Publisher => "PUBLISHER",
            UnifiedKey::Lyrics => "LYRICS",
            UnifiedKey::Encoder => "ENCODER",
            UnifiedKey::Url => "URL",
            UnifiedKey::Isrc => "ISRC",
            UnifiedKey::Mood => "MOOD",
            UnifiedKey::Key => "KEY",
            UnifiedKey::Language => "LANGUAGE",
            UnifiedKey::ReleaseDate => "RELEASE_DATE",
            UnifiedKey::TrackNumber => "TRACK_NUMBER",
            UnifiedKey::DiscNumber => "DISC_NUMBER",
            UnifiedKey::InvolvedPeople => "INVOLVED_PEOPLE",
            UnifiedKey::Musicians => "MUSICIANS",
            UnifiedKey::Keywords => "KEYWORDS",
        }
    }

    /// Declared value shape.
    pub fn kind(&self) -> ValueKind {
        match self {
            UnifiedKey::ArtistsNames
            | UnifiedKey::AlbumArtistsNames
            | UnifiedKey::GenresNames
            | UnifiedKey::Composers
            | UnifiedKey::InvolvedPeople
            | UnifiedKey::Musicians
            | UnifiedKey::Keywords => ValueKind::List,
            UnifiedKey::Rating | UnifiedKey::Bpm => ValueKind::Number,
            _ => ValueKind::Text,
        }
    }
}

impl fmt::Display for UnifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnifiedKey {
    type Err = Error;

    /// Accepts the canonical names in any case, with `-` or `_`, plus the
    /// singular aliases `GENRE_NAME` and `COMPOSER`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "GENRE_NAME" => return Ok(UnifiedKey::GenresNames),
            "COMPOSER" => return Ok(UnifiedKey::Composers),
            _ => {}
        }
        UnifiedKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| Error::UnknownKey(s.to_string()))
    }
}

/// Separator-parsing class of a tag format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// One string per field; list values are always separator-split
    Legacy,
    /// Repeated fields; only a single collapsed entry is split
    Modern,
}

/// A tag container format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TagFormat {
    Id3v1,
    Id3v2,
    Riff,
    Vorbis,
}

impl TagFormat {
    pub const ALL: [TagFormat; 4] = [
        TagFormat::Id3v1,
        TagFormat::Id3v2,
        TagFormat::Riff,
        TagFormat::Vorbis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagFormat::Id3v1 => "ID3V1",
            TagFormat::Id3v2 => "ID3V2",
            TagFormat::Riff => "RIFF",
            TagFormat::Vorbis => "VORBIS",
        }
    }

    /// ID3v1 is only ever read.
    pub fn is_writable(&self) -> bool {
        !matches!(self, TagFormat::Id3v1)
    }

    pub fn class(&self) -> FormatClass {
        match self {
            TagFormat::Id3v1 | TagFormat::Riff => FormatClass::Legacy,
            TagFormat::Id3v2 | TagFormat::Vorbis => FormatClass::Modern,
        }
    }
}

impl fmt::Display for TagFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TagFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id3v1" => Ok(TagFormat::Id3v1),
            "id3v2" => Ok(TagFormat::Id3v2),
            "riff" | "riff_info" | "info" => Ok(TagFormat::Riff),
            "vorbis" | "vorbis_comments" => Ok(TagFormat::Vorbis),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// ID3v2 revision used when writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Id3v2Version {
    #[serde(rename = "2.3")]
    V3,
    #[default]
    #[serde(rename = "2.4")]
    V4,
}

impl Id3v2Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Id3v2Version::V3 => "2.3",
            Id3v2Version::V4 => "2.4",
        }
    }
}

impl std::str::FromStr for Id3v2Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_start_matches('v') {
            "2.3" | "3" | "23" => Ok(Id3v2Version::V3),
            "2.4" | "4" | "24" => Ok(Id3v2Version::V4),
            _ => Err(Error::config(format!("unknown ID3v2 version '{s}'"))),
        }
    }
}

/// Audio container, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AudioType {
    Mp3,
    Flac,
    Wav,
}

impl AudioType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioType::Mp3 => "mp3",
            AudioType::Flac => "flac",
            AudioType::Wav => "wav",
        }
    }

    /// Detects the container from the extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("mp3") => Ok(AudioType::Mp3),
            Some("flac") => Ok(AudioType::Flac),
            Some("wav") => Ok(AudioType::Wav),
            _ => Err(Error::file_type(format!(
                "{} (expected .mp3, .flac or .wav)",
                path.display()
            ))),
        }
    }
}

impl fmt::Display for AudioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata value as seen by callers.
///
/// Serialized untagged: `"text"`, `42` or `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnifiedValue {
    Number(u32),
    Text(String),
    List(Vec<String>),
}

impl UnifiedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            UnifiedValue::Text(_) => ValueKind::Text,
            UnifiedValue::List(_) => ValueKind::List,
            UnifiedValue::Number(_) => ValueKind::Number,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            UnifiedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            UnifiedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<u32> {
        match self {
            UnifiedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True when writing this value means deleting the field.
    pub fn is_blank(&self) -> bool {
        match self {
            UnifiedValue::Text(s) => s.trim().is_empty(),
            UnifiedValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            UnifiedValue::Number(_) => false,
        }
    }
}

impl fmt::Display for UnifiedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnifiedValue::Text(s) => f.write_str(s),
            UnifiedValue::Number(n) => write!(f, "{n}"),
            UnifiedValue::List(items) => f.write_str(&items.join("; ")),
        }
    }
}

impl From<&str> for UnifiedValue {
    fn from(value: &str) -> Self {
        UnifiedValue::Text(value.to_string())
    }
}

impl From<String> for UnifiedValue {
    fn from(value: String) -> Self {
        UnifiedValue::Text(value)
    }
}

impl From<u32> for UnifiedValue {
    fn from(value: u32) -> Self {
        UnifiedValue::Number(value)
    }
}

impl From<Vec<String>> for UnifiedValue {
    fn from(value: Vec<String>) -> Self {
        UnifiedValue::List(value)
    }
}

impl From<Vec<&str>> for UnifiedValue {
    fn from(value: Vec<&str>) -> Self {
        UnifiedValue::List(value.into_iter().map(String::from).collect())
    }
}
