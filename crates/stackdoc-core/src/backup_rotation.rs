use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const BACKUP_STAMP_LEN: usize = 15;

/// Retention policy for timestamped copies of a previously written report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackupPolicy {
    /// Number of backups kept per report; `0` keeps every backup.
    pub max_backups: usize,
}

impl BackupPolicy {
    pub fn keep_all() -> Self {
        Self { max_backups: 0 }
    }

    /// Returns true when old backups are pruned after each write.
    pub fn is_pruning(self) -> bool {
        self.max_backups > 0
    }
}

/// Builds `<stem>_<stamp><ext>` next to `path`.
pub fn backup_path_for(path: &Path, stamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("report");
    let file_name = match path.extension().and_then(|value| value.to_str()) {
        Some(extension) => format!("{stem}_{stamp}.{extension}"),
        None => format!("{stem}_{stamp}"),
    };
    match path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Copies an existing report aside before it gets replaced.
///
/// Returns `Ok(None)` when there is nothing to back up. `stamp` is expected in
/// `YYYYmmdd_HHMMSS` form so lexical order matches chronological order.
pub fn backup_existing_file(path: &Path, stamp: &str) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }
    let destination = backup_path_for(path, stamp);
    std::fs::copy(path, &destination).with_context(|| {
        format!(
            "failed to back up {} to {}",
            path.display(),
            destination.display()
        )
    })?;
    Ok(Some(destination))
}

/// Lists backups of `path`, oldest first.
pub fn list_backups(path: &Path) -> Result<Vec<PathBuf>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !parent.is_dir() {
        return Ok(Vec::new());
    }
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("report");
    let suffix = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|extension| format!(".{extension}"))
        .unwrap_or_default();
    let prefix = format!("{stem}_");

    let mut backups = Vec::new();
    for entry in std::fs::read_dir(parent)
        .with_context(|| format!("failed to read {}", parent.display()))?
    {
        let entry = entry.with_context(|| format!("failed to read entry in {}", parent.display()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let Some(stamp) = name
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            continue;
        };
        if is_backup_stamp(stamp) {
            backups.push(entry.path());
        }
    }
    backups.sort();
    Ok(backups)
}

/// Removes the oldest backups of `path` beyond the policy limit.
pub fn prune_backups(path: &Path, policy: BackupPolicy) -> Result<Vec<PathBuf>> {
    if !policy.is_pruning() {
        return Ok(Vec::new());
    }
    let backups = list_backups(path)?;
    let excess = backups.len().saturating_sub(policy.max_backups);
    let mut removed = Vec::with_capacity(excess);
    for backup in backups.into_iter().take(excess) {
        std::fs::remove_file(&backup)
            .with_context(|| format!("failed to prune backup {}", backup.display()))?;
        removed.push(backup);
    }
    Ok(removed)
}

fn is_backup_stamp(raw: &str) -> bool {
    raw.len() == BACKUP_STAMP_LEN
        && raw.char_indices().all(|(index, ch)| {
            if index == 8 {
                ch == '_'
            } else {
                ch.is_ascii_digit()
            }
        })
}
