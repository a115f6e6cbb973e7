use aisleron_shared::{DEFAULT_AISLE_NAME, FilterType, LocationType};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::table::{Aisle, Location};

/// Home location and its default aisle, present in every database.
pub struct Seed;

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Seed {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let (sql, values) = Query::insert()
            .into_table(Location::Table)
            .columns([
                Location::Type,
                Location::DefaultFilter,
                Location::Name,
                Location::Pinned,
            ])
            .values_panic([
                LocationType::Generic.to_string().into(),
                FilterType::Needed.to_string().into(),
                "Home".into(),
                false.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        let location_id = sqlx::query_with(&sql, values)
            .execute(&mut *connection)
            .await?
            .last_insert_rowid();

        let (sql, values) = Query::insert()
            .into_table(Aisle::Table)
            .columns([
                Aisle::Name,
                Aisle::LocationId,
                Aisle::Rank,
                Aisle::IsDefault,
            ])
            .values_panic([
                DEFAULT_AISLE_NAME.into(),
                location_id.into(),
                0.into(),
                true.into(),
            ])
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values)
            .execute(&mut *connection)
            .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let (sql, values) = Query::delete()
            .from_table(Location::Table)
            .and_where(Expr::col(Location::Type).eq(LocationType::Generic.to_string()))
            .build_sqlx(SqliteQueryBuilder);

        sqlx::query_with(&sql, values).execute(connection).await?;

        Ok(())
    }
}
