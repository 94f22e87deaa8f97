use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::SessionError;
use crate::keys::KeyName;

#[derive(Parser, Debug)]
#[command(name = "region_snip")]
#[command(version, about = "Select a region of the screen and save it as a PNG")]
pub struct Cli {
    /// Output file path for the selected region
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Key that closes the overlay without saving (e.g. Escape, Q, F4)
    #[arg(short = 'e', long = "escapekey", value_name = "KEY", default_value = "Escape")]
    pub escape_key: KeyName,
}

/// Resolve `raw` to an absolute file path whose parent directory exists.
/// Nothing is created on disk.
pub fn validate_output_path(raw: &Path) -> Result<PathBuf, SessionError> {
    let invalid = |source: Option<io::Error>| SessionError::InvalidOutputPath {
        path: raw.display().to_string(),
        source,
    };
    let full = std::path::absolute(raw).map_err(|e| invalid(Some(e)))?;
    if full.file_name().is_none() || ends_with_separator(raw) {
        return Err(invalid(None));
    }
    let dir = full.parent().ok_or_else(|| invalid(None))?;
    if !dir.is_dir() {
        return Err(SessionError::OutputDirectoryMissing {
            dir: dir.to_path_buf(),
        });
    }
    Ok(full)
}

// `absolute` keeps a trailing separator but `file_name` would still report
// the last component, so check the raw text.
fn ends_with_separator(raw: &Path) -> bool {
    raw.to_str()
        .map(|s| s.ends_with(std::path::MAIN_SEPARATOR) || s.ends_with('/'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn parses_file_and_default_key() {
        let cli = Cli::try_parse_from(["region_snip", "-f", "out.png"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("out.png"));
        assert_eq!(cli.escape_key.code(), KeyCode::Escape);
    }

    #[test]
    fn parses_long_flags_and_custom_key() {
        let cli =
            Cli::try_parse_from(["region_snip", "--file", "a.png", "--escapekey", "q"]).unwrap();
        assert_eq!(cli.escape_key.code(), KeyCode::KeyQ);
    }

    #[test]
    fn file_is_required() {
        assert!(Cli::try_parse_from(["region_snip"]).is_err());
        assert!(Cli::try_parse_from(["region_snip", "-e", "Escape"]).is_err());
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = Cli::try_parse_from(["region_snip", "-f", "a.png", "-e", "nokey"]).unwrap_err();
        assert!(err.to_string().contains("unknown key name 'nokey'"));
    }

    #[test]
    fn accepts_file_in_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        let resolved = validate_output_path(&path).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved.file_name().unwrap(), "shot.png");
        assert!(!resolved.exists());
    }

    #[test]
    fn relative_path_is_made_absolute() {
        let resolved = validate_output_path(Path::new("relative-shot.png")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative-shot.png"));
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("shot.png");
        match validate_output_path(&path) {
            Err(SessionError::OutputDirectoryMissing { dir: missing }) => {
                assert!(missing.ends_with("missing"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_or_directory_like_paths_are_invalid() {
        assert!(matches!(
            validate_output_path(Path::new("")),
            Err(SessionError::InvalidOutputPath { .. })
        ));
        let dir = tempfile::tempdir().unwrap();
        let trailing = format!("{}/", dir.path().join("shot").display());
        assert!(matches!(
            validate_output_path(Path::new(&trailing)),
            Err(SessionError::InvalidOutputPath { .. })
        ));
    }
}
