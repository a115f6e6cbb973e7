use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Location;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Location::Table)
        .col(
            ColumnDef::new(Location::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Location::Type)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(Location::DefaultFilter)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(Location::Name).string().not_null())
        .col(
            ColumnDef::new(Location::Pinned)
                .boolean()
                .not_null()
                .default(false),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Location::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateUk1;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE UNIQUE INDEX "uk_location_Qm3vRt" ON "location" ("name" COLLATE NOCASE)"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_location_Qm3vRt""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}

/// At most one GENERIC (home) location.
pub struct CreateUk2;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateUk2 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE UNIQUE INDEX "uk_location_Tn4wKe" ON "location" ("type") WHERE "type" = 'GENERIC'"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_location_Tn4wKe""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}
