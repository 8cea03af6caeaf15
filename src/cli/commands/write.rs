//! Write commands: `write`, `delete`.

use anyhow::{Context, bail};
use std::path::Path;

use crate::metadata::{self, UpdateOptions};
use crate::model::{MetadataUpdate, TagFormat, UnifiedKey, UnifiedValue, ValueKind};
use crate::multivalue;

/// Parse a `KEY=VALUE` assignment into a typed update entry.
///
/// List keys split the value on the usual separators, number keys must
/// parse as an unsigned integer. An empty value deletes the key.
pub fn parse_assignment(assignment: &str) -> anyhow::Result<(UnifiedKey, Option<UnifiedValue>)> {
    let Some((key, value)) = assignment.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{assignment}'");
    };
    let key: UnifiedKey = key.parse()?;
    if value.trim().is_empty() {
        return Ok((key, None));
    }

    let value = match key.kind() {
        ValueKind::Text => UnifiedValue::Text(value.to_string()),
        ValueKind::List => UnifiedValue::List(multivalue::split(value)),
        ValueKind::Number => UnifiedValue::Number(
            value
                .trim()
                .parse()
                .with_context(|| format!("{key} expects a whole number, got '{value}'"))?,
        ),
    };
    Ok((key, Some(value)))
}

/// Apply `--set` and `--delete` to one tag format in a single save
pub fn cmd_write(
    path: &Path,
    set: &[String],
    delete: &[UnifiedKey],
    options: &UpdateOptions,
) -> anyhow::Result<()> {
    if set.is_empty() && delete.is_empty() {
        bail!("Nothing to write: pass --set KEY=VALUE or --delete KEY");
    }

    let mut update = MetadataUpdate::new();
    for assignment in set {
        let (key, value) = parse_assignment(assignment)?;
        update.insert(key, value);
    }
    for key in delete {
        update.insert(*key, None);
    }

    metadata::update_file_metadata(path, &update, options)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let target = options
        .format
        .map(|format| format.as_str())
        .unwrap_or("default format");
    println!("✓ {} keys written to {:?} ({target})", update.len(), path);
    Ok(())
}

/// Remove every writable tag, or one format's tag
pub fn cmd_delete(path: &Path, format: Option<TagFormat>) -> anyhow::Result<()> {
    match format {
        Some(format) => {
            let removed = metadata::delete_format_metadata(path, format)
                .with_context(|| format!("Failed to delete {format} from {}", path.display()))?;
            if removed {
                println!("✓ Removed {format} tag from {:?}", path);
            } else {
                println!("No {format} tag in {:?}", path);
            }
        }
        None => {
            metadata::delete_all_metadata(path)
                .with_context(|| format!("Failed to delete tags from {}", path.display()))?;
            println!("✓ Removed all writable tags from {:?}", path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ReadOptions, get_merged_unified_metadata};
    use crate::model::AudioType;
    use crate::test_utils::write_fixture;

    #[test]
    fn test_parse_assignment_by_kind() {
        assert_eq!(
            parse_assignment("TITLE=A = B").unwrap(),
            (UnifiedKey::Title, Some(UnifiedValue::from("A = B")))
        );
        assert_eq!(
            parse_assignment("GENRES_NAMES=Rock; Pop").unwrap(),
            (UnifiedKey::GenresNames, Some(UnifiedValue::from(vec!["Rock", "Pop"])))
        );
        assert_eq!(
            parse_assignment("bpm= 128 ").unwrap(),
            (UnifiedKey::Bpm, Some(UnifiedValue::Number(128)))
        );
        assert_eq!(parse_assignment("COMMENT=").unwrap(), (UnifiedKey::Comment, None));
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("TITLE").is_err());
        assert!(parse_assignment("NOPE=x").is_err());
        assert!(parse_assignment("RATING=five").is_err());
    }

    #[test]
    fn test_write_then_delete() {
        let (_dir, path) = write_fixture(AudioType::Flac);
        cmd_write(
            &path,
            &["TITLE=Song".to_string(), "ARTISTS_NAMES=A, B".to_string()],
            &[],
            &UpdateOptions::default(),
        )
        .unwrap();

        let merged = get_merged_unified_metadata(&path, &ReadOptions::default()).unwrap();
        assert_eq!(merged[&UnifiedKey::Title], UnifiedValue::from("Song"));
        assert_eq!(merged[&UnifiedKey::ArtistsNames], UnifiedValue::from(vec!["A", "B"]));

        cmd_write(&path, &[], &[UnifiedKey::Title], &UpdateOptions::default()).unwrap();
        let merged = get_merged_unified_metadata(&path, &ReadOptions::default()).unwrap();
        assert!(!merged.contains_key(&UnifiedKey::Title));

        cmd_delete(&path, None).unwrap();
        let merged = get_merged_unified_metadata(&path, &ReadOptions::default()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_write_requires_changes() {
        let (_dir, path) = write_fixture(AudioType::Mp3);
        assert!(cmd_write(&path, &[], &[], &UpdateOptions::default()).is_err());
    }
}
