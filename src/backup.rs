use std::io;
use std::path::{Path, PathBuf};

use aisleron_shared::{Changes, DatabaseBackup, Error, Result, Table};
use sqlx::{Connection, SqliteConnection, SqlitePool};
use tokio::io::AsyncReadExt;

const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

const TABLES: [&str; 4] = ["location", "aisle", "product", "aisle_product"];

/// Children first so foreign keys hold while clearing.
const CLEAR: [&str; 4] = [
    r#"DELETE FROM main."aisle_product""#,
    r#"DELETE FROM main."aisle""#,
    r#"DELETE FROM main."product""#,
    r#"DELETE FROM main."location""#,
];

/// Parents first so foreign keys hold while copying.
const COPY: [&str; 4] = [
    r#"INSERT INTO main."location" ("id", "type", "default_filter", "name", "pinned")
       SELECT "id", "type", "default_filter", "name", "pinned" FROM backup."location""#,
    r#"INSERT INTO main."product" ("id", "name", "in_stock")
       SELECT "id", "name", "in_stock" FROM backup."product""#,
    r#"INSERT INTO main."aisle" ("id", "name", "location_id", "rank", "is_default")
       SELECT "id", "name", "location_id", "rank", "is_default" FROM backup."aisle""#,
    r#"INSERT INTO main."aisle_product" ("id", "aisle_id", "product_id", "rank")
       SELECT "id", "aisle_id", "product_id", "rank" FROM backup."aisle_product""#,
];

/// Backup and restore of the live SQLite database.
#[derive(Clone)]
pub struct SqliteBackup {
    pool: SqlitePool,
    changes: Changes,
}

impl SqliteBackup {
    pub fn new(pool: SqlitePool, changes: Changes) -> Self {
        Self { pool, changes }
    }
}

async fn check_header(file: &Path) -> Result<()> {
    let mut header = [0u8; 16];
    let mut reader = tokio::fs::File::open(file).await?;

    match reader.read_exact(&mut header).await {
        Ok(_) if &header == SQLITE_HEADER => Ok(()),
        Ok(_) => Err(Error::InvalidBackup(format!(
            "{} is not a SQLite database",
            file.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(Error::InvalidBackup(
            format!("{} is too short to be a SQLite database", file.display()),
        )),
        Err(err) => Err(err.into()),
    }
}

async fn copy_rows(connection: &mut SqliteConnection) -> Result<()> {
    let tables = sqlx::query_scalar::<_, String>(
        r#"SELECT "name" FROM backup.sqlite_master WHERE "type" = 'table'"#,
    )
    .fetch_all(&mut *connection)
    .await?;

    if let Some(missing) = TABLES.iter().find(|table| !tables.iter().any(|t| t == *table)) {
        return Err(Error::InvalidBackup(format!("table {missing} is missing")));
    }

    let mut tx = connection.begin().await?;
    for statement in CLEAR.iter().chain(COPY.iter()) {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    Ok(())
}

#[async_trait::async_trait]
impl DatabaseBackup for SqliteBackup {
    fn database_name(&self) -> Option<String> {
        let options = self.pool.connect_options();
        let name = options.get_filename().file_name()?.to_str()?;

        (name != ":memory:").then(|| name.to_owned())
    }

    #[tracing::instrument(skip(self))]
    async fn backup_database(&self, folder: &Path, file_name: &str) -> Result<PathBuf> {
        let metadata = tokio::fs::metadata(folder).await?;
        if !metadata.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a folder", folder.display()),
            )));
        }

        let target = folder.join(file_name);
        if tokio::fs::try_exists(&target).await? {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", target.display()),
            )));
        }

        sqlx::query("VACUUM INTO ?")
            .bind(target.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await?;

        tracing::info!(target = %target.display(), "database backed up");

        Ok(target)
    }

    #[tracing::instrument(skip(self))]
    async fn restore_database(&self, file: &Path) -> Result<()> {
        check_header(file).await?;

        let mut connection = self.pool.acquire().await?;
        sqlx::query("ATTACH DATABASE ? AS backup")
            .bind(file.to_string_lossy().into_owned())
            .execute(&mut *connection)
            .await?;

        let copied = copy_rows(&mut connection).await;
        let detached = sqlx::query("DETACH DATABASE backup")
            .execute(&mut *connection)
            .await;

        copied?;
        detached?;

        tracing::info!(file = %file.display(), "database restored");
        self.changes.notify(Table::ALL);

        Ok(())
    }
}
