//! Unified metadata facade.
//!
//! The public read/write/delete operations. Each call opens the file,
//! reads the native tags it needs through lofty, and closes it again;
//! nothing is cached between calls.
//!
//! # Features
//! - Merged view across every tag in the file, by format priority
//! - Single-format views and single-key lookups
//! - Validated, all-or-nothing batch updates against one format
//! - Whole-file and per-format deletion
//!
//! # Example
//!
//! ```ignore
//! use unitag::{AudioFile, ReadOptions, UnifiedKey};
//!
//! let file = AudioFile::open("song.flac")?;
//! let merged = file.merged(&ReadOptions::default())?;
//! println!("{:?}", merged.get(&UnifiedKey::Title));
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::formats::{self, NativeTags, Support};
use crate::model::{
    AudioType, Id3v2Version, MetadataUpdate, TagFormat, UnifiedKey, UnifiedMetadata, UnifiedValue,
};
use crate::priority;

/// Default caller rating scale.
pub const DEFAULT_RATING_MAX: u32 = 100;

/// Options for read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Caller rating scale. `None` returns raw stored values.
    pub normalized_rating_max_value: Option<u32>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            normalized_rating_max_value: Some(DEFAULT_RATING_MAX),
        }
    }
}

/// Options for update operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Target format. `None` writes to the container's default format.
    pub format: Option<TagFormat>,
    /// Caller rating scale. `None` stores values raw.
    pub normalized_rating_max_value: Option<u32>,
    /// ID3v2 revision used when the target is ID3v2.
    pub id3v2_version: Id3v2Version,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            format: None,
            normalized_rating_max_value: Some(DEFAULT_RATING_MAX),
            id3v2_version: Id3v2Version::default(),
        }
    }
}

impl UpdateOptions {
    /// Default options targeting one format.
    pub fn for_format(format: TagFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }
}

fn check_rating_max(max: Option<u32>) -> Result<()> {
    match max {
        Some(0) => Err(Error::config(
            "normalized_rating_max_value must be greater than zero",
        )),
        _ => Ok(()),
    }
}

/// An audio file on disk, identified by path and container type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    path: PathBuf,
    audio_type: AudioType,
}

impl AudioFile {
    /// Validate the path and derive the container from its extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let audio_type = AudioType::from_path(path)?;
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        Ok(Self {
            path: path.to_path_buf(),
            audio_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn audio_type(&self) -> AudioType {
        self.audio_type
    }

    /// Tag formats this container can hold, highest priority first.
    pub fn applicable_formats(&self) -> &'static [TagFormat] {
        priority::applicable_formats(self.audio_type)
    }

    fn check_applicable(&self, format: TagFormat) -> Result<()> {
        if priority::is_applicable(self.audio_type, format) {
            Ok(())
        } else {
            Err(Error::file_type(format!(
                "{format} tags are not used in {} files",
                self.audio_type
            )))
        }
    }

    fn read_tags(&self) -> Result<NativeTags> {
        formats::read_native(&self.path, self.audio_type)
    }

    fn view(&self, tags: &NativeTags, format: TagFormat, rating_max: Option<u32>) -> UnifiedMetadata {
        let adapter = formats::adapter_for(format, self.audio_type, tags, Id3v2Version::default());
        formats::read_all(adapter.as_ref(), rating_max)
    }

    /// Every key resolved across all applicable formats by priority.
    pub fn merged(&self, options: &ReadOptions) -> Result<UnifiedMetadata> {
        check_rating_max(options.normalized_rating_max_value)?;
        let tags = self.read_tags()?;
        let rating_max = options.normalized_rating_max_value;

        Ok(priority::merge(
            self.applicable_formats()
                .iter()
                .filter(|format| tags.has(**format))
                .map(|format| self.view(&tags, *format, rating_max)),
        ))
    }

    /// Every key of one format.
    pub fn single_format(&self, format: TagFormat, options: &ReadOptions) -> Result<UnifiedMetadata> {
        check_rating_max(options.normalized_rating_max_value)?;
        self.check_applicable(format)?;
        let tags = self.read_tags()?;
        if !tags.has(format) {
            return Ok(UnifiedMetadata::new());
        }
        Ok(self.view(&tags, format, options.normalized_rating_max_value))
    }

    /// One key, from `format` or from the merged view.
    pub fn specific(
        &self,
        key: UnifiedKey,
        format: Option<TagFormat>,
        options: &ReadOptions,
    ) -> Result<Option<UnifiedValue>> {
        check_rating_max(options.normalized_rating_max_value)?;
        let rating_max = options.normalized_rating_max_value;

        let formats: Vec<TagFormat> = match format {
            Some(format) => {
                self.check_applicable(format)?;
                if formats::support(format, key) == Support::Unsupported {
                    return Err(Error::unsupported(key, format));
                }
                vec![format]
            }
            None => self.applicable_formats().to_vec(),
        };

        let tags = self.read_tags()?;
        Ok(formats
            .into_iter()
            .filter(|format| tags.has(*format))
            .find_map(|format| {
                let adapter =
                    formats::adapter_for(format, self.audio_type, &tags, Id3v2Version::default());
                formats::read_value(adapter.as_ref(), key, rating_max)
            }))
    }

    /// Apply a batch of changes to one format.
    ///
    /// Every key is validated before the file is touched, so an unsupported
    /// key or a bad value leaves the file unchanged.
    pub fn update(&self, update: &MetadataUpdate, options: &UpdateOptions) -> Result<()> {
        check_rating_max(options.normalized_rating_max_value)?;
        let format = options
            .format
            .unwrap_or_else(|| priority::default_write_format(self.audio_type));
        self.check_applicable(format)?;
        if !format.is_writable() {
            return Err(Error::ReadOnlyFormat(format));
        }

        let encoded = update
            .iter()
            .map(|(key, value)| {
                formats::encode_value(
                    format,
                    *key,
                    value.as_ref(),
                    options.normalized_rating_max_value,
                )
                .map(|entries| (*key, entries))
            })
            .collect::<Result<Vec<_>>>()?;
        if encoded.is_empty() {
            return Ok(());
        }

        let tags = self.read_tags()?;
        let mut adapter = formats::adapter_for(format, self.audio_type, &tags, options.id3v2_version);
        for (key, entries) in encoded {
            adapter.set_entries(key, entries)?;
        }
        adapter.save(&self.path)?;

        info!(
            path = %self.path.display(),
            %format,
            keys = update.len(),
            "Updated metadata"
        );
        Ok(())
    }

    /// Remove every writable tag. ID3v1 trailers stay.
    ///
    /// Returns `true` on success, also when the file had no tags.
    pub fn delete_all(&self) -> Result<bool> {
        let tags = self.read_tags()?;
        for format in self.applicable_formats() {
            if format.is_writable() && tags.has(*format) {
                formats::remove_format(&self.path, self.audio_type, *format)?;
            }
        }
        debug!(path = %self.path.display(), "Deleted all writable metadata");
        Ok(true)
    }

    /// Remove one format's tag. Returns whether a tag was present.
    pub fn delete_format(&self, format: TagFormat) -> Result<bool> {
        self.check_applicable(format)?;
        if !format.is_writable() {
            return Err(Error::ReadOnlyFormat(format));
        }
        let tags = self.read_tags()?;
        if !tags.has(format) {
            return Ok(false);
        }
        formats::remove_format(&self.path, self.audio_type, format)?;
        Ok(true)
    }
}

// ============================================================================
// Path-based operations
// ============================================================================

/// Merged view of every tag in the file.
pub fn get_merged_unified_metadata(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<UnifiedMetadata> {
    AudioFile::open(path)?.merged(options)
}

/// View of one tag format. Fails with `FileTypeNotSupported` when the
/// container cannot hold that format.
pub fn get_single_format_app_metadata(
    path: impl AsRef<Path>,
    format: TagFormat,
    options: &ReadOptions,
) -> Result<UnifiedMetadata> {
    AudioFile::open(path)?.single_format(format, options)
}

/// One key. With an explicit format that lacks the key, fails with
/// `MetadataNotSupported`.
pub fn get_specific_metadata(
    path: impl AsRef<Path>,
    key: UnifiedKey,
    format: Option<TagFormat>,
    options: &ReadOptions,
) -> Result<Option<UnifiedValue>> {
    AudioFile::open(path)?.specific(key, format, options)
}

/// Write a batch of changes. `None`, `""` and empty lists delete the key.
pub fn update_file_metadata(
    path: impl AsRef<Path>,
    update: &MetadataUpdate,
    options: &UpdateOptions,
) -> Result<()> {
    AudioFile::open(path)?.update(update, options)
}

/// Remove every writable tag from the file.
pub fn delete_all_metadata(path: impl AsRef<Path>) -> Result<bool> {
    AudioFile::open(path)?.delete_all()
}

/// Remove one format's tag from the file.
pub fn delete_format_metadata(path: impl AsRef<Path>, format: TagFormat) -> Result<bool> {
    AudioFile::open(path)?.delete_format(format)
}
