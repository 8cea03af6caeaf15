//! Reading native tags out of MP3, FLAC and WAV files.
//!
//! lofty handles the tag codecs. Two gaps are filled here:
//! - ID3v1 trailers are parsed for every container, not only MPEG
//! - an ID3v2 tag in front of a FLAC stream is written by splicing the
//!   encoded tag ahead of the `fLaC` marker, since lofty treats it as
//!   read-only
//! - Vorbis comments in a FLAC stream are written on an in-memory copy
//!   with any ID3v2 prefix cut off, then the prefix is put back

use lofty::config::{ParseOptions, WriteOptions};
use lofty::error::LoftyError;
use lofty::file::AudioFile as _;
use lofty::flac::FlacFile;
use lofty::id3::v2::Id3v2Tag;
use lofty::iff::wav::{RiffInfoList, WavFile};
use lofty::mpeg::MpegFile;
use lofty::ogg::VorbisComments;
use lofty::tag::{TagExt, TagType};
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::id3v1::{ID3V1_TAG_SIZE, Id3v1Fields};
use crate::error::{Error, Result, ResultExt};
use crate::model::{AudioType, TagFormat};

/// Every native tag found in one file.
#[derive(Debug, Clone, Default)]
pub struct NativeTags {
    pub id3v1: Option<Id3v1Fields>,
    pub id3v2: Option<Id3v2Tag>,
    pub riff: Option<RiffInfoList>,
    pub vorbis: Option<VorbisComments>,
}

impl NativeTags {
    /// Whether the file carries a tag of `format` at all.
    pub fn has(&self, format: TagFormat) -> bool {
        match format {
            TagFormat::Id3v1 => self.id3v1.is_some(),
            TagFormat::Id3v2 => self.id3v2.is_some(),
            TagFormat::Riff => self.riff.is_some(),
            TagFormat::Vorbis => self.vorbis.is_some(),
        }
    }
}

fn parse_options() -> ParseOptions {
    ParseOptions::new().read_properties(false)
}

/// Read every tag the container can hold. The file is closed on return.
pub fn read_native(path: &Path, audio_type: AudioType) -> Result<NativeTags> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    let mut file =
        File::open(path).with_context(format!("Failed to open {}", path.display()))?;
    let mut tags = NativeTags::default();

    match audio_type {
        AudioType::Mp3 => {
            let mpeg = MpegFile::read_from(&mut file, parse_options())
                .map_err(|e| Error::codec(path, e))?;
            tags.id3v2 = mpeg.id3v2().cloned();
        }
        AudioType::Flac => {
            let flac = FlacFile::read_from(&mut file, parse_options())
                .map_err(|e| Error::codec(path, e))?;
            tags.id3v2 = flac.id3v2().cloned();
            tags.vorbis = flac.vorbis_comments().cloned();
        }
        AudioType::Wav => {
            let wav = WavFile::read_from(&mut file, parse_options())
                .map_err(|e| Error::codec(path, e))?;
            tags.id3v2 = wav.id3v2().cloned();
            tags.riff = wav.riff_info().cloned();
        }
    }

    tags.id3v1 = read_id3v1_trailer(&mut file)?;

    debug!(
        path = %path.display(),
        id3v1 = tags.id3v1.is_some(),
        id3v2 = tags.id3v2.is_some(),
        riff = tags.riff.is_some(),
        vorbis = tags.vorbis.is_some(),
        "Read native tags"
    );
    Ok(tags)
}

/// The 128-byte `TAG` block at the very end of the file, if any.
fn read_id3v1_trailer<R: Read + Seek>(reader: &mut R) -> Result<Option<Id3v1Fields>> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < ID3V1_TAG_SIZE as u64 {
        return Ok(None);
    }

    let mut block = [0u8; ID3V1_TAG_SIZE];
    reader.seek(SeekFrom::End(-(ID3V1_TAG_SIZE as i64)))?;
    reader.read_exact(&mut block)?;
    Ok(Id3v1Fields::parse(&block))
}

/// Remove the tag of `format` from the file. Absent tags are not an error.
pub fn remove_format(path: &Path, audio_type: AudioType, format: TagFormat) -> Result<()> {
    let tag_type = match format {
        TagFormat::Id3v1 => return Err(Error::ReadOnlyFormat(format)),
        TagFormat::Id3v2 if audio_type == AudioType::Flac => {
            return write_flac_id3v2(path, None);
        }
        TagFormat::Id3v2 => TagType::Id3v2,
        TagFormat::Riff => TagType::RiffInfo,
        TagFormat::Vorbis => {
            let empty = VorbisComments::default();
            rewrite_flac_stream(path, |stream| empty.save_to(stream, flac_write_options()))?;
            info!(path = %path.display(), %format, "Removed tag");
            return Ok(());
        }
    };

    tag_type
        .remove_from_path(path)
        .map_err(|e| Error::codec(path, e))?;
    info!(path = %path.display(), %format, "Removed tag");
    Ok(())
}

/// Save a lofty tag in place, mapping codec failures to the path.
pub(super) fn save_tag<T>(tag: &T, path: &Path, options: WriteOptions) -> Result<()>
where
    T: TagExt<Err = LoftyError>,
{
    tag.save_to_path(path, options)
        .map_err(|e| Error::codec(path, e))
}

/// Replace the ID3v2 block in front of a FLAC stream. `None` strips it.
pub(super) fn write_flac_id3v2(path: &Path, encoded: Option<Vec<u8>>) -> Result<()> {
    let original =
        std::fs::read(path).with_context(format!("Failed to read {}", path.display()))?;
    let stream = &original[id3v2_prefix_len(&original)..];

    let mut out = encoded.unwrap_or_default();
    out.extend_from_slice(stream);
    replace_file(path, &out)
}

/// FLAC metadata writes never add a PADDING block.
pub(super) fn flac_write_options() -> WriteOptions {
    WriteOptions::default().preferred_padding(0)
}

/// Let `rewrite` edit the bare FLAC stream in memory, then put any
/// ID3v2 prefix back in front of the result.
pub(super) fn rewrite_flac_stream<F>(path: &Path, rewrite: F) -> Result<()>
where
    F: FnOnce(&mut Cursor<Vec<u8>>) -> std::result::Result<(), LoftyError>,
{
    let original =
        std::fs::read(path).with_context(format!("Failed to read {}", path.display()))?;
    let prefix_len = id3v2_prefix_len(&original);

    let mut stream = Cursor::new(original[prefix_len..].to_vec());
    rewrite(&mut stream).map_err(|e| Error::codec(path, e))?;

    // lofty writes from offset 0 and never shortens the buffer
    let written = usize::try_from(stream.position()).unwrap_or(usize::MAX);
    let stream = stream.into_inner();
    let end = if written == 0 { stream.len() } else { written.min(stream.len()) };

    let mut out = original[..prefix_len].to_vec();
    out.extend_from_slice(&stream[..end]);
    replace_file(path, &out)
}

fn replace_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    std::fs::write(&temp, bytes).with_context(format!("Failed to write {}", temp.display()))?;
    std::fs::rename(&temp, path)
        .with_context(format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Length of a leading ID3v2 tag, header and footer included.
fn id3v2_prefix_len(bytes: &[u8]) -> usize {
    if bytes.len() < 10 || &bytes[..3] != b"ID3" {
        return 0;
    }

    let size = bytes[6..10]
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | usize::from(b & 0x7F));
    let footer = if bytes[5] & 0x10 != 0 { 10 } else { 0 };
    (10 + size + footer).min(bytes.len())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".unitag.tmp");
    path.with_file_name(name)
}
