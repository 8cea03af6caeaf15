//! Read commands: `read`, `get`, `keys`.

use anyhow::Context;
use std::path::Path;

use crate::formats::{self, Support};
use crate::metadata::{self, ReadOptions};
use crate::model::{TagFormat, UnifiedKey, UnifiedMetadata};

/// Print the merged view, or one format's view, as pretty JSON
pub fn cmd_read(path: &Path, format: Option<TagFormat>, options: &ReadOptions) -> anyhow::Result<()> {
    let metadata = match format {
        Some(format) => metadata::get_single_format_app_metadata(path, format, options),
        None => metadata::get_merged_unified_metadata(path, options),
    }
    .with_context(|| format!("Failed to read {}", path.display()))?;

    println!("{}", to_json(&metadata)?);
    Ok(())
}

fn to_json(metadata: &UnifiedMetadata) -> anyhow::Result<String> {
    serde_json::to_string_pretty(metadata).context("Failed to encode metadata as JSON")
}

/// Print a single key. Absent keys print nothing.
pub fn cmd_get(
    path: &Path,
    key: UnifiedKey,
    format: Option<TagFormat>,
    options: &ReadOptions,
) -> anyhow::Result<()> {
    let value = metadata::get_specific_metadata(path, key, format, options)
        .with_context(|| format!("Failed to read {key} from {}", path.display()))?;

    match value {
        Some(value) => println!("{value}"),
        None => eprintln!("{key} is not set"),
    }
    Ok(())
}

/// Print every key with its value shape and per-format support
pub fn cmd_keys(format: Option<TagFormat>) -> anyhow::Result<()> {
    match format {
        Some(format) => {
            for key in formats::supported_keys(format) {
                let field = formats::native_field(format, key).unwrap_or_default();
                println!("{:<22} {:<7} {}", key.as_str(), key.kind().as_str(), field);
            }
        }
        None => {
            print!("{:<22} {:<7}", "KEY", "KIND");
            for format in TagFormat::ALL {
                print!(" {:<7}", format.as_str());
            }
            println!();
            for key in UnifiedKey::ALL {
                print!("{:<22} {:<7}", key.as_str(), key.kind().as_str());
                for format in TagFormat::ALL {
                    print!(" {:<7}", support_mark(formats::support(format, key)));
                }
                println!();
            }
        }
    }
    Ok(())
}

fn support_mark(support: Support) -> &'static str {
    match support {
        Support::Writable => "rw",
        Support::ReadOnly => "r",
        Support::Unsupported => "-",
    }
}
