use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use aisleron_shared::{DATABASE_NAME, DatabaseBackup, Error, Result};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Calls {
    backups: Vec<PathBuf>,
    restores: Vec<PathBuf>,
}

/// Test double recording every backup and restore it is asked for.
#[derive(Clone)]
pub struct FakeDatabaseBackup {
    database_name: Option<String>,
    failing: bool,
    calls: Arc<Mutex<Calls>>,
}

impl Default for FakeDatabaseBackup {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDatabaseBackup {
    pub fn new() -> Self {
        Self {
            database_name: Some(DATABASE_NAME.to_owned()),
            failing: false,
            calls: Default::default(),
        }
    }

    /// Reports no database file, like an in-memory database.
    pub fn unnamed() -> Self {
        Self {
            database_name: None,
            ..Self::new()
        }
    }

    /// Every call fails with a not found I/O error, after being recorded.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub async fn backups(&self) -> Vec<PathBuf> {
        self.calls.lock().await.backups.clone()
    }

    pub async fn restores(&self) -> Vec<PathBuf> {
        self.calls.lock().await.restores.clone()
    }

    fn outcome(&self) -> Result<()> {
        if self.failing {
            return Err(Error::Io(io::Error::from(io::ErrorKind::NotFound)));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseBackup for FakeDatabaseBackup {
    fn database_name(&self) -> Option<String> {
        self.database_name.clone()
    }

    async fn backup_database(&self, folder: &Path, file_name: &str) -> Result<PathBuf> {
        let target = folder.join(file_name);
        self.calls.lock().await.backups.push(target.clone());
        self.outcome()?;

        Ok(target)
    }

    async fn restore_database(&self, file: &Path) -> Result<()> {
        self.calls.lock().await.restores.push(file.to_path_buf());
        self.outcome()
    }
}
