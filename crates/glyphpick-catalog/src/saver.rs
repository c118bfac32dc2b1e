//! Writes selected icons to the local filesystem as SVG files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use glyphpick_types::IconRecord;

/// Error type for save operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The caller passed an empty icon list.
    #[error("no icons to save")]
    NoIcons,

    /// Filesystem failure creating the directory or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a save operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaveReport {
    /// File names written, in input order.
    pub saved: Vec<String>,
    /// Icon names that carried no SVG content and were skipped.
    pub failed: Vec<String>,
    /// Absolute destination directory.
    pub save_path: PathBuf,
}

/// Write each icon's SVG content to `<dir>/<name>.svg`.
///
/// Icons without SVG content are reported in `failed` rather than
/// aborting the batch. Duplicate names get a numeric suffix so one save
/// never silently overwrites another from the same batch.
pub async fn save_icons(icons: &[IconRecord], dir: &Path) -> Result<SaveReport, SaveError> {
    if icons.is_empty() {
        return Err(SaveError::NoIcons);
    }

    let save_path = std::path::absolute(dir)?;
    tokio::fs::create_dir_all(&save_path).await?;

    let mut saved = Vec::new();
    let mut failed = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for icon in icons {
        let Some(svg) = icon.svg_content.as_deref().filter(|s| !s.is_empty()) else {
            warn!(icon = %icon.name, "icon has no SVG content, skipping");
            failed.push(icon.name.clone());
            continue;
        };

        let file_name = unique_file_name(&icon.name, &mut taken);
        tokio::fs::write(save_path.join(&file_name), svg).await?;
        saved.push(file_name);
    }

    info!(
        saved = saved.len(),
        failed = failed.len(),
        path = %save_path.display(),
        "icons saved"
    );

    Ok(SaveReport {
        saved,
        failed,
        save_path,
    })
}

/// Sanitize an icon name into a file name, deduplicating within a batch.
fn unique_file_name(name: &str, taken: &mut HashSet<String>) -> String {
    let base: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
        .collect();
    let base = if base.is_empty() { "icon".to_string() } else { base };

    let mut candidate = format!("{base}.svg");
    let mut n = 1;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{base}-{n}.svg");
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn icon(name: &str, svg: Option<&str>) -> IconRecord {
        let mut record = IconRecord::new(1, name);
        record.svg_content = svg.map(String::from);
        record
    }

    #[tokio::test]
    async fn test_saves_svg_files() {
        let dir = tempfile::tempdir().unwrap();
        let icons = vec![icon("home", Some("<svg>h</svg>")), icon("cart", Some("<svg>c</svg>"))];

        let report = save_icons(&icons, dir.path()).await.unwrap();
        assert_eq!(report.saved, vec!["home.svg", "cart.svg"]);
        assert!(report.failed.is_empty());

        let content = std::fs::read_to_string(dir.path().join("home.svg")).unwrap();
        assert_eq!(content, "<svg>h</svg>");
    }

    #[tokio::test]
    async fn test_icons_without_svg_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let icons = vec![icon("good", Some("<svg/>")), icon("empty", Some("")), icon("none", None)];

        let report = save_icons(&icons, dir.path()).await.unwrap();
        assert_eq!(report.saved, vec!["good.svg"]);
        assert_eq!(report.failed, vec!["empty", "none"]);
    }

    #[tokio::test]
    async fn test_duplicate_names_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let icons = vec![icon("star", Some("<svg>1</svg>")), icon("star", Some("<svg>2</svg>"))];

        let report = save_icons(&icons, dir.path()).await.unwrap();
        assert_eq!(report.saved, vec!["star.svg", "star-1.svg"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            save_icons(&[], dir.path()).await,
            Err(SaveError::NoIcons)
        ));
    }

    #[tokio::test]
    async fn test_path_separators_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let icons = vec![icon("a/b", Some("<svg/>"))];

        let report = save_icons(&icons, dir.path()).await.unwrap();
        assert_eq!(report.saved, vec!["a_b.svg"]);
        assert!(dir.path().join("a_b.svg").exists());
    }
}
