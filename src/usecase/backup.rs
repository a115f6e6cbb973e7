use std::path::{Path, PathBuf};

use aisleron_shared::{DATABASE_NAME, DatabaseBackup, Result, backup_file_name};
use time::OffsetDateTime;

/// Writes `<name>-backup-<timestamp>.<ext>` into a folder.
pub struct CreateDatabaseBackup<B> {
    backup: B,
}

impl<B: DatabaseBackup> CreateDatabaseBackup<B> {
    pub fn new(backup: B) -> Self {
        Self { backup }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, folder: &Path) -> Result<PathBuf> {
        let name = self
            .backup
            .database_name()
            .unwrap_or_else(|| DATABASE_NAME.to_owned());
        let file_name = backup_file_name(&name, OffsetDateTime::now_utc())?;

        self.backup.backup_database(folder, &file_name).await
    }
}

pub struct RestoreDatabaseBackup<B> {
    backup: B,
}

impl<B: DatabaseBackup> RestoreDatabaseBackup<B> {
    pub fn new(backup: B) -> Self {
        Self { backup }
    }

    #[tracing::instrument(skip(self))]
    pub async fn call(&self, file: &Path) -> Result<()> {
        self.backup.restore_database(file).await
    }
}
