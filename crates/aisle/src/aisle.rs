use aisleron_db::table;
use aisleron_shared::{Aisle, AisleProduct, AisleRepository, Changes, Error, Repository, Result, Table};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool, prelude::FromRow};

use crate::aisle_product::{fetch_by_aisle, fetch_by_location};

#[derive(Debug, Default, FromRow)]
pub struct AisleRow {
    pub id: i64,
    pub name: String,
    pub location_id: i64,
    pub rank: i32,
    pub is_default: bool,
}

impl From<AisleRow> for Aisle {
    fn from(row: AisleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            location_id: row.location_id,
            rank: row.rank,
            is_default: row.is_default,
            products: vec![],
        }
    }
}

/// Aisle persistence. Products inside an [`Aisle`] are read-only here; placements are
/// written through [`crate::SqliteAisleProductRepository`].
#[derive(Clone)]
pub struct SqliteAisleRepository {
    pool: SqlitePool,
    changes: Changes,
}

impl SqliteAisleRepository {
    pub fn new(pool: SqlitePool, changes: Changes) -> Self {
        Self { pool, changes }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::Aisle::Id,
            table::Aisle::Name,
            table::Aisle::LocationId,
            table::Aisle::Rank,
            table::Aisle::IsDefault,
        ])
        .from(table::Aisle::Table)
        .order_by(table::Aisle::Rank, Order::Asc)
        .order_by(table::Aisle::Id, Order::Asc)
        .to_owned()
}

async fn fetch_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Vec<Aisle>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, AisleRow, _>(&sql, values)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

async fn fetch_optional<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Option<Aisle>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, AisleRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Into::into))
}

async fn fetch_one_by_id<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Aisle>> {
    let statement = select()
        .and_where(Expr::col(table::Aisle::Id).eq(id))
        .limit(1)
        .to_owned();

    fetch_optional(executor, statement).await
}

async fn fetch_by_location_id<'e, E: SqliteExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<Vec<Aisle>> {
    let statement = select()
        .and_where(Expr::col(table::Aisle::LocationId).eq(location_id))
        .to_owned();

    fetch_all(executor, statement).await
}

/// Moves each placement into its aisle; placements come sorted by rank.
fn attach(aisles: &mut [Aisle], products: Vec<AisleProduct>) {
    for product in products {
        if let Some(aisle) = aisles.iter_mut().find(|aisle| aisle.id == product.aisle_id) {
            aisle.products.push(product);
        }
    }
}

async fn insert_row(connection: &mut SqliteConnection, item: &Aisle) -> Result<i64> {
    let (sql, values) = Query::insert()
        .into_table(table::Aisle::Table)
        .columns([
            table::Aisle::Name,
            table::Aisle::LocationId,
            table::Aisle::Rank,
            table::Aisle::IsDefault,
        ])
        .values_panic([
            item.name.to_owned().into(),
            item.location_id.into(),
            item.rank.into(),
            item.is_default.into(),
        ])
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values)
        .execute(connection)
        .await
        .map_err(|err| Error::unique_violation(err, Error::DuplicateDefaultAisle))?;

    Ok(result.last_insert_rowid())
}

/// The default flag is fixed at creation and never rewritten. A default aisle
/// also stays in its location.
async fn update_row(connection: &mut SqliteConnection, item: &Aisle) -> Result<bool> {
    let Some(stored) = fetch_one_by_id(&mut *connection, item.id).await? else {
        return Ok(false);
    };

    let location_id = if stored.is_default {
        stored.location_id
    } else {
        item.location_id
    };

    let (sql, values) = Query::update()
        .table(table::Aisle::Table)
        .values([
            (table::Aisle::Name, item.name.to_owned().into()),
            (table::Aisle::LocationId, location_id.into()),
            (table::Aisle::Rank, item.rank.into()),
        ])
        .and_where(Expr::col(table::Aisle::Id).eq(item.id))
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values).execute(connection).await?;

    Ok(result.rows_affected() > 0)
}

#[async_trait::async_trait]
impl Repository<Aisle> for SqliteAisleRepository {
    async fn get(&self, id: i64) -> Result<Option<Aisle>> {
        fetch_one_by_id(&self.pool, id).await
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Aisle>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(table::Aisle::Id).is_in(ids.iter().copied()))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_all(&self) -> Result<Vec<Aisle>> {
        fetch_all(&self.pool, select()).await
    }

    async fn add(&self, item: &Aisle) -> Result<i64> {
        let mut connection = self.pool.acquire().await?;
        let id = insert_row(&mut connection, item).await?;

        tracing::debug!(id, location_id = item.location_id, name = %item.name, "aisle added");
        self.changes.notify(&[Table::Aisle]);

        Ok(id)
    }

    async fn add_multiple(&self, items: &[Aisle]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(insert_row(&mut tx, item).await?);
        }
        tx.commit().await?;

        self.changes.notify(&[Table::Aisle]);

        Ok(ids)
    }

    async fn update(&self, item: &Aisle) -> Result<()> {
        let mut connection = self.pool.acquire().await?;
        if update_row(&mut connection, item).await? {
            self.changes.notify(&[Table::Aisle]);
        }

        Ok(())
    }

    async fn update_multiple(&self, items: &[Aisle]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let mut changed = false;
        for item in items {
            changed |= update_row(&mut tx, item).await?;
        }
        tx.commit().await?;

        if changed {
            self.changes.notify(&[Table::Aisle]);
        }

        Ok(())
    }

    async fn remove(&self, item: &Aisle) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(stored) = fetch_one_by_id(&mut *tx, item.id).await? else {
            return Ok(());
        };

        if stored.is_default {
            return Err(Error::DeleteDefaultAisle);
        }

        let (sql, values) = Query::delete()
            .from_table(table::AisleProduct::Table)
            .and_where(Expr::col(table::AisleProduct::AisleId).eq(stored.id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(table::Aisle::Table)
            .and_where(Expr::col(table::Aisle::Id).eq(stored.id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::debug!(id = stored.id, "aisle removed");
        self.changes.notify(&[Table::Aisle, Table::AisleProduct]);

        Ok(())
    }
}

#[async_trait::async_trait]
impl AisleRepository for SqliteAisleRepository {
    async fn get_for_location(&self, location_id: i64) -> Result<Vec<Aisle>> {
        fetch_by_location_id(&self.pool, location_id).await
    }

    async fn get_for_location_with_products(&self, location_id: i64) -> Result<Vec<Aisle>> {
        // one read transaction so aisles and placements come from the same snapshot
        let mut tx = self.pool.begin().await?;
        let mut aisles = fetch_by_location_id(&mut *tx, location_id).await?;
        let products = fetch_by_location(&mut *tx, location_id).await?;
        tx.commit().await?;

        attach(&mut aisles, products);

        Ok(aisles)
    }

    async fn get_default_aisles(&self) -> Result<Vec<Aisle>> {
        let statement = select()
            .and_where(Expr::col(table::Aisle::IsDefault).eq(true))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_default_aisle_for(&self, location_id: i64) -> Result<Option<Aisle>> {
        let statement = select()
            .and_where(Expr::col(table::Aisle::LocationId).eq(location_id))
            .and_where(Expr::col(table::Aisle::IsDefault).eq(true))
            .limit(1)
            .to_owned();

        fetch_optional(&self.pool, statement).await
    }

    async fn get_with_products(&self, aisle_id: i64) -> Result<Option<Aisle>> {
        let mut tx = self.pool.begin().await?;
        let Some(mut aisle) = fetch_one_by_id(&mut *tx, aisle_id).await? else {
            return Ok(None);
        };
        aisle.products = fetch_by_aisle(&mut *tx, aisle_id).await?;
        tx.commit().await?;

        Ok(Some(aisle))
    }
}
