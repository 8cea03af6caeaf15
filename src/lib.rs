//! unitag - one set of metadata keys over ID3v1, ID3v2, RIFF INFO and
//! Vorbis comments in MP3, WAV and FLAC files.

pub mod cli;
pub mod config;
pub mod error;
pub mod formats;
pub mod metadata;
pub mod model;
pub mod multivalue;
pub mod priority;
pub mod rating;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
pub use metadata::{
    AudioFile, ReadOptions, UpdateOptions, delete_all_metadata, delete_format_metadata,
    get_merged_unified_metadata, get_single_format_app_metadata, get_specific_metadata,
    update_file_metadata,
};
pub use model::{
    AudioType, Id3v2Version, MetadataUpdate, TagFormat, UnifiedKey, UnifiedMetadata, UnifiedValue,
};
