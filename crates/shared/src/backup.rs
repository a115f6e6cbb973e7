use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::Result;

const BACKUP_TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

#[async_trait::async_trait]
pub trait DatabaseBackup: Send + Sync {
    /// File name of the live database, `None` when it is not file backed.
    fn database_name(&self) -> Option<String>;

    /// Writes a copy of the live database to `folder/file_name` and returns its path.
    async fn backup_database(&self, folder: &Path, file_name: &str) -> Result<PathBuf>;

    /// Replaces the content of the live database with the one stored in `file`.
    async fn restore_database(&self, file: &Path) -> Result<()>;
}

/// `aisleron.db` at 2024-01-31 23:59:59 becomes `aisleron-backup-20240131_235959.db`.
///
/// The base is everything before the last `.`; a name without one gets no extension.
pub fn backup_file_name(database_name: &str, at: OffsetDateTime) -> Result<String> {
    let timestamp = at.format(BACKUP_TIMESTAMP)?;
    let name = match database_name.rsplit_once('.') {
        Some((base, extension)) => format!("{base}-backup-{timestamp}.{extension}"),
        None => format!("{database_name}-backup-{timestamp}"),
    };

    Ok(name)
}
