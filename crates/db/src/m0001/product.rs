use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Product;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(Product::Table)
        .col(
            ColumnDef::new(Product::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Product::Name).string().not_null())
        .col(
            ColumnDef::new(Product::InStock)
                .boolean()
                .not_null()
                .default(true),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(Product::Table).to_owned()
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
            r#"CREATE UNIQUE INDEX "uk_product_Lw8pXe" ON "product" ("name" COLLATE NOCASE)"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(r#"DROP INDEX "uk_product_Lw8pXe""#)
            .execute(connection)
            .await?;

        Ok(())
    }
}
