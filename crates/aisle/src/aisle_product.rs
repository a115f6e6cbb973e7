use aisleron_db::table;
use aisleron_shared::{
    AisleProduct, AisleProductRepository, Changes, Product, Repository, Result, Table,
};
use sea_query::{
    Expr, ExprTrait, JoinType, Order, Query, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool, prelude::FromRow};

#[derive(Debug, Default, FromRow)]
pub struct AisleProductRow {
    pub id: i64,
    pub aisle_id: i64,
    pub product_id: i64,
    pub rank: i32,
    pub name: String,
    pub in_stock: bool,
}

impl From<AisleProductRow> for AisleProduct {
    fn from(row: AisleProductRow) -> Self {
        Self {
            id: row.id,
            aisle_id: row.aisle_id,
            rank: row.rank,
            product: Product {
                id: row.product_id,
                name: row.name,
                in_stock: row.in_stock,
            },
        }
    }
}

#[derive(Clone)]
pub struct SqliteAisleProductRepository {
    pool: SqlitePool,
    changes: Changes,
}

impl SqliteAisleProductRepository {
    pub fn new(pool: SqlitePool, changes: Changes) -> Self {
        Self { pool, changes }
    }
}

/// Placements joined with their product, ordered by rank then id.
fn select() -> SelectStatement {
    Query::select()
        .columns([
            (table::AisleProduct::Table, table::AisleProduct::Id),
            (table::AisleProduct::Table, table::AisleProduct::AisleId),
            (table::AisleProduct::Table, table::AisleProduct::ProductId),
            (table::AisleProduct::Table, table::AisleProduct::Rank),
        ])
        .columns([
            (table::Product::Table, table::Product::Name),
            (table::Product::Table, table::Product::InStock),
        ])
        .from(table::AisleProduct::Table)
        .join(
            JoinType::InnerJoin,
            table::Product::Table,
            Expr::col((table::Product::Table, table::Product::Id))
                .equals((table::AisleProduct::Table, table::AisleProduct::ProductId)),
        )
        .order_by(
            (table::AisleProduct::Table, table::AisleProduct::Rank),
            Order::Asc,
        )
        .order_by(
            (table::AisleProduct::Table, table::AisleProduct::Id),
            Order::Asc,
        )
        .to_owned()
}

async fn fetch_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Vec<AisleProduct>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, AisleProductRow, _>(&sql, values)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub(crate) async fn fetch_by_aisle<'e, E: SqliteExecutor<'e>>(
    executor: E,
    aisle_id: i64,
) -> Result<Vec<AisleProduct>> {
    let statement = select()
        .and_where(Expr::col((table::AisleProduct::Table, table::AisleProduct::AisleId)).eq(aisle_id))
        .to_owned();

    fetch_all(executor, statement).await
}

/// Every placement of every aisle of a location.
pub(crate) async fn fetch_by_location<'e, E: SqliteExecutor<'e>>(
    executor: E,
    location_id: i64,
) -> Result<Vec<AisleProduct>> {
    let statement = select()
        .join(
            JoinType::InnerJoin,
            table::Aisle::Table,
            Expr::col((table::Aisle::Table, table::Aisle::Id))
                .equals((table::AisleProduct::Table, table::AisleProduct::AisleId)),
        )
        .and_where(Expr::col((table::Aisle::Table, table::Aisle::LocationId)).eq(location_id))
        .to_owned();

    fetch_all(executor, statement).await
}

async fn insert_row(connection: &mut SqliteConnection, item: &AisleProduct) -> Result<i64> {
    let (sql, values) = Query::insert()
        .into_table(table::AisleProduct::Table)
        .columns([
            table::AisleProduct::AisleId,
            table::AisleProduct::ProductId,
            table::AisleProduct::Rank,
        ])
        .values_panic([
            item.aisle_id.into(),
            item.product.id.into(),
            item.rank.into(),
        ])
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values).execute(connection).await?;

    Ok(result.last_insert_rowid())
}

async fn update_row(connection: &mut SqliteConnection, item: &AisleProduct) -> Result<bool> {
    let (sql, values) = Query::update()
        .table(table::AisleProduct::Table)
        .values([
            (table::AisleProduct::AisleId, item.aisle_id.into()),
            (table::AisleProduct::ProductId, item.product.id.into()),
            (table::AisleProduct::Rank, item.rank.into()),
        ])
        .and_where(Expr::col(table::AisleProduct::Id).eq(item.id))
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values).execute(connection).await?;

    Ok(result.rows_affected() > 0)
}

#[async_trait::async_trait]
impl Repository<AisleProduct> for SqliteAisleProductRepository {
    async fn get(&self, id: i64) -> Result<Option<AisleProduct>> {
        let statement = select()
            .and_where(Expr::col((table::AisleProduct::Table, table::AisleProduct::Id)).eq(id))
            .to_owned();

        Ok(fetch_all(&self.pool, statement).await?.into_iter().next())
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<AisleProduct>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(
                Expr::col((table::AisleProduct::Table, table::AisleProduct::Id))
                    .is_in(ids.iter().copied()),
            )
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_all(&self) -> Result<Vec<AisleProduct>> {
        fetch_all(&self.pool, select()).await
    }

    async fn add(&self, item: &AisleProduct) -> Result<i64> {
        let mut connection = self.pool.acquire().await?;
        let id = insert_row(&mut connection, item).await?;
        self.changes.notify(&[Table::AisleProduct]);

        Ok(id)
    }

    async fn add_multiple(&self, items: &[AisleProduct]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(insert_row(&mut tx, item).await?);
        }
        tx.commit().await?;

        self.changes.notify(&[Table::AisleProduct]);

        Ok(ids)
    }

    async fn update(&self, item: &AisleProduct) -> Result<()> {
        let mut connection = self.pool.acquire().await?;
        if update_row(&mut connection, item).await? {
            self.changes.notify(&[Table::AisleProduct]);
        }

        Ok(())
    }

    async fn update_multiple(&self, items: &[AisleProduct]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let mut changed = false;
        for item in items {
            changed |= update_row(&mut tx, item).await?;
        }
        tx.commit().await?;

        if changed {
            self.changes.notify(&[Table::AisleProduct]);
        }

        Ok(())
    }

    async fn remove(&self, item: &AisleProduct) -> Result<()> {
        let (sql, values) = Query::delete()
            .from_table(table::AisleProduct::Table)
            .and_where(Expr::col(table::AisleProduct::Id).eq(item.id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            self.changes.notify(&[Table::AisleProduct]);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl AisleProductRepository for SqliteAisleProductRepository {
    async fn get_by_aisle(&self, aisle_id: i64) -> Result<Vec<AisleProduct>> {
        fetch_by_aisle(&self.pool, aisle_id).await
    }

    async fn get_product_aisles(&self, product_id: i64) -> Result<Vec<AisleProduct>> {
        let statement = select()
            .and_where(
                Expr::col((table::AisleProduct::Table, table::AisleProduct::ProductId))
                    .eq(product_id),
            )
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn update_aisle_product_rank(&self, item: &AisleProduct) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let (sql, values) = Query::select()
            .column(table::AisleProduct::AisleId)
            .from(table::AisleProduct::Table)
            .and_where(Expr::col(table::AisleProduct::Id).eq(item.id))
            .build_sqlx(SqliteQueryBuilder);
        let Some(aisle_id) = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(());
        };

        let (sql, values) = Query::update()
            .table(table::AisleProduct::Table)
            .value(
                table::AisleProduct::Rank,
                Expr::col(table::AisleProduct::Rank).add(1),
            )
            .and_where(Expr::col(table::AisleProduct::AisleId).eq(aisle_id))
            .and_where(Expr::col(table::AisleProduct::Id).ne(item.id))
            .and_where(Expr::col(table::AisleProduct::Rank).gte(item.rank))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::update()
            .table(table::AisleProduct::Table)
            .value(table::AisleProduct::Rank, item.rank)
            .and_where(Expr::col(table::AisleProduct::Id).eq(item.id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::debug!(id = item.id, rank = item.rank, "aisle product rank updated");
        self.changes.notify(&[Table::AisleProduct]);

        Ok(())
    }

    async fn remove_products_from_aisle(&self, aisle_id: i64) -> Result<()> {
        let (sql, values) = Query::delete()
            .from_table(table::AisleProduct::Table)
            .and_where(Expr::col(table::AisleProduct::AisleId).eq(aisle_id))
            .build_sqlx(SqliteQueryBuilder);

        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            self.changes.notify(&[Table::AisleProduct]);
        }

        Ok(())
    }
}
