//! Test utilities and fixtures for unitag tests.
//!
//! Builds tiny but well-formed MP3, WAV and FLAC files on disk so the
//! read/write paths run against real containers without shipping binary
//! samples in the repo.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{append_id3v1, write_fixture};
//!
//! #[test]
//! fn test_something() {
//!     let (_dir, path) = write_fixture(AudioType::Mp3);
//!     append_id3v1(&path, "Title", "Artist", "Album", "1999", 17);
//!     // ... test logic
//! }
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::model::{AudioType, UnifiedKey, UnifiedValue, ValueKind};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo.
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
const MPEG_FRAME_LEN: usize = 417;

/// Writes an untagged file of the given container into a fresh temp dir.
///
/// # Returns
///
/// A tuple of (temp directory handle, file path).
/// Keep the TempDir alive for the duration of your test.
pub fn write_fixture(audio_type: AudioType) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join(format!("fixture.{}", audio_type.as_str()));
    let bytes = match audio_type {
        AudioType::Mp3 => mp3_bytes(),
        AudioType::Wav => wav_bytes(),
        AudioType::Flac => flac_bytes_with_padding(FLAC_PADDING),
    };
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    (dir, path)
}

fn mp3_bytes() -> Vec<u8> {
    let mut frame = MPEG_FRAME_HEADER.to_vec();
    frame.resize(MPEG_FRAME_LEN, 0);
    frame.repeat(3)
}

/// Writes an untagged FLAC with no PADDING block, STREAMINFO only.
pub fn write_bare_flac() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("bare.flac");
    std::fs::write(&path, flac_bytes_with_padding(0)).expect("Failed to write fixture");
    (dir, path)
}

/// Writes a WAV whose `LIST`/`INFO` chunk holds `items` in order, duplicates
/// included.
pub fn write_wav_with_info(items: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("info.wav");

    let mut info = b"INFO".to_vec();
    for (id, value) in items {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        info.extend_from_slice(id.as_bytes());
        info.extend_from_slice(&(data.len() as u32).to_le_bytes());
        info.extend_from_slice(&data);
        if data.len() % 2 == 1 {
            info.push(0);
        }
    }

    let mut list = b"LIST".to_vec();
    list.extend_from_slice(&(info.len() as u32).to_le_bytes());
    list.extend_from_slice(&info);

    let mut bytes = wav_bytes();
    bytes.extend_from_slice(&list);
    let riff_size = (bytes.len() - 8) as u32;
    bytes[4..8].copy_from_slice(&riff_size.to_le_bytes());

    std::fs::write(&path, bytes).expect("Failed to write fixture");
    (dir, path)
}

fn wav_bytes() -> Vec<u8> {
    let mut fmt = Vec::new();
    fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
    fmt.extend_from_slice(&1u16.to_le_bytes()); // mono
    fmt.extend_from_slice(&8000u32.to_le_bytes());
    fmt.extend_from_slice(&16000u32.to_le_bytes());
    fmt.extend_from_slice(&2u16.to_le_bytes());
    fmt.extend_from_slice(&16u16.to_le_bytes());

    let data = [0u8; 8];

    let mut body = b"WAVE".to_vec();
    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
    body.extend_from_slice(&fmt);
    body.extend_from_slice(b"data");
    body.extend_from_slice(&(data.len() as u32).to_le_bytes());
    body.extend_from_slice(&data);

    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

/// PADDING block size of the default FLAC fixture.
const FLAC_PADDING: usize = 16;

fn flac_bytes_with_padding(padding: usize) -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    // STREAMINFO, 34 bytes, last block unless padding follows
    let last = if padding == 0 { 0x80 } else { 0x00 };
    bytes.extend_from_slice(&[last, 0x00, 0x00, 0x22]);
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&[0; 6]); // frame sizes unknown
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36);
    bytes.extend_from_slice(&packed.to_be_bytes());
    bytes.extend_from_slice(&[0; 16]); // MD5
    if padding > 0 {
        // last-block flag set, PADDING
        bytes.push(0x81);
        bytes.extend_from_slice(&(padding as u32).to_be_bytes()[1..]);
        bytes.resize(bytes.len() + padding, 0);
    }
    bytes.extend_from_slice(&[0xFF, 0xF8, 0x69, 0x08, 0x00, 0x00, 0x00, 0x00]);
    bytes
}

/// Builds an ID3v1.1 block with track 1 and a fixed comment.
///
/// Text fields longer than 30 bytes are truncated.
pub fn id3v1_block(title: &str, artist: &str, album: &str, year: &str, genre: u8) -> [u8; 128] {
    fn put(block: &mut [u8; 128], offset: usize, len: usize, text: &str) {
        let bytes = text.as_bytes();
        let n = bytes.len().min(len);
        block[offset..offset + n].copy_from_slice(&bytes[..n]);
    }

    let mut block = [0u8; 128];
    block[..3].copy_from_slice(b"TAG");
    put(&mut block, 3, 30, title);
    put(&mut block, 33, 30, artist);
    put(&mut block, 63, 30, album);
    put(&mut block, 93, 4, year);
    put(&mut block, 97, 28, "Legacy comment");
    block[125] = 0;
    block[126] = 1;
    block[127] = genre;
    block
}

/// Appends an ID3v1.1 trailer to an existing file.
pub fn append_id3v1(path: &Path, title: &str, artist: &str, album: &str, year: &str, genre: u8) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("Failed to open fixture");
    file.write_all(&id3v1_block(title, artist, album, year, genre))
        .expect("Failed to append ID3v1");
}

/// A valid sample value of the right shape for `key`.
pub fn sample_value(key: UnifiedKey) -> UnifiedValue {
    match key.kind() {
        ValueKind::List => UnifiedValue::from(vec!["Alpha", "Beta"]),
        ValueKind::Number if key == UnifiedKey::Rating => UnifiedValue::Number(80),
        ValueKind::Number => UnifiedValue::Number(120),
        ValueKind::Text => UnifiedValue::from(match key {
            UnifiedKey::Title => "Sample Title",
            UnifiedKey::AlbumName => "Sample Album",
            UnifiedKey::Comment => "Sample comment",
            UnifiedKey::Copyright => "2024 Sample Records",
            UnifiedKey::Publisher => "Sample Records",
            UnifiedKey::Lyrics => "First line\nSecond line",
            UnifiedKey::Encoder => "unitag",
            UnifiedKey::Url => "https://example.com/track",
            UnifiedKey::Isrc => "USRC17607839",
            UnifiedKey::Mood => "Calm",
            UnifiedKey::Key => "Am",
            UnifiedKey::Language => "eng",
            UnifiedKey::ReleaseDate => "2024-01-15",
            UnifiedKey::TrackNumber => "3",
            UnifiedKey::DiscNumber => "1",
            _ => "sample",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_carry_container_magic() {
        let (_dir, mp3) = write_fixture(AudioType::Mp3);
        let bytes = std::fs::read(&mp3).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xFB]);
        assert_eq!(bytes.len(), MPEG_FRAME_LEN * 3);

        let (_dir, wav) = write_fixture(AudioType::Wav);
        let bytes = std::fs::read(&wav).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        let riff_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(riff_size as usize, bytes.len() - 8);

        let (_dir, flac) = write_fixture(AudioType::Flac);
        let bytes = std::fs::read(&flac).unwrap();
        assert_eq!(&bytes[..4], b"fLaC");
        assert_eq!(bytes.len(), 4 + 4 + 34 + 4 + FLAC_PADDING + 8);
        assert_eq!(bytes[8 + 34], 0x81);

        let (_dir, bare) = write_bare_flac();
        let bytes = std::fs::read(&bare).unwrap();
        assert_eq!(bytes[4], 0x80);
        assert_eq!(bytes.len(), 4 + 4 + 34 + 8);
    }

    #[test]
    fn test_wav_info_chunk_layout() {
        let (_dir, path) = write_wav_with_info(&[("IART", "A"), ("IART", "Bb")]);
        let bytes = std::fs::read(&path).unwrap();
        let riff_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(riff_size as usize, bytes.len() - 8);

        let list = bytes.windows(4).position(|w| w == b"LIST").unwrap();
        assert_eq!(&bytes[list + 8..list + 12], b"INFO");
        // "A\0" is even, "Bb\0" gets a pad byte
        assert_eq!(bytes.len() - list, 8 + 4 + (8 + 2) + (8 + 4));
    }

    #[test]
    fn test_id3v1_block_layout() {
        let block = id3v1_block("Title", "Artist", "Album", "1999", 17);
        assert_eq!(&block[..3], b"TAG");
        assert_eq!(&block[3..8], b"Title");
        assert_eq!(&block[93..97], b"1999");
        assert_eq!(block[125], 0);
        assert_eq!(block[126], 1);
        assert_eq!(block[127], 17);
    }

    #[test]
    fn test_append_id3v1_grows_file() {
        let (_dir, path) = write_fixture(AudioType::Mp3);
        let before = std::fs::metadata(&path).unwrap().len();
        append_id3v1(&path, "T", "A", "B", "2000", 0);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), before + 128);
    }

    #[test]
    fn test_sample_values_match_key_kind() {
        for key in UnifiedKey::ALL {
            assert_eq!(sample_value(key).kind(), key.kind(), "{key}");
        }
    }
}
