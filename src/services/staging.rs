use crate::models::LocalFile;
use std::path::{Path, PathBuf};

/// Lists regular files directly under `dir`, sorted by name.
pub async fn discover_files(dir: &Path) -> std::io::Result<Vec<LocalFile>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match LocalFile::new(entry.path()) {
            Some(file) => files.push(file),
            None => tracing::warn!("Skipping non UTF-8 file name: {:?}", entry.file_name()),
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!("Discovered {} files in {}", files.len(), dir.display());
    Ok(files)
}

/// Moves an uploaded file into `archive_dir`, creating it if needed.
///
/// An existing file of the same name is never replaced; the moved file gets
/// a numeric suffix instead (`report.pdf` becomes `report-1.pdf`).
pub async fn archive_file(file: &LocalFile, archive_dir: &Path) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(archive_dir).await?;
    let mut target = archive_dir.join(&file.name);
    let mut n = 0;
    while tokio::fs::try_exists(&target).await? {
        n += 1;
        target = archive_dir.join(suffixed_name(&file.name, n));
    }
    if n > 0 {
        tracing::warn!(
            "⚠️  {} already archived, keeping both as {}",
            file.name,
            target.display()
        );
    }
    tokio::fs::rename(&file.path, &target).await?;
    Ok(target)
}

fn suffixed_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{name}-{n}"),
    }
}
