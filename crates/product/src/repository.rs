use aisleron_db::table;
use aisleron_shared::{Changes, Error, Product, ProductRepository, Repository, Result, Table};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool, prelude::FromRow};

#[derive(Debug, Default, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub in_stock: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            in_stock: row.in_stock,
        }
    }
}

#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
    changes: Changes,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool, changes: Changes) -> Self {
        Self { pool, changes }
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::Product::Id,
            table::Product::Name,
            table::Product::InStock,
        ])
        .from(table::Product::Table)
        .order_by(table::Product::Id, Order::Asc)
        .to_owned()
}

async fn fetch_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Vec<Product>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, ProductRow, _>(&sql, values)
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

async fn fetch_optional<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Option<Product>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, ProductRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?;

    Ok(row.map(Into::into))
}

async fn find_by_name<'e, E: SqliteExecutor<'e>>(
    executor: E,
    name: &str,
) -> Result<Option<Product>> {
    let statement = select()
        .and_where(Expr::cust_with_values(
            r#""name" = ? COLLATE NOCASE"#,
            [name.to_owned()],
        ))
        .limit(1)
        .to_owned();

    fetch_optional(executor, statement).await
}

async fn insert_row(connection: &mut SqliteConnection, item: &Product) -> Result<i64> {
    if find_by_name(&mut *connection, &item.name).await?.is_some() {
        return Err(Error::DuplicateProductName);
    }

    let (sql, values) = Query::insert()
        .into_table(table::Product::Table)
        .columns([table::Product::Name, table::Product::InStock])
        .values_panic([item.name.to_owned().into(), item.in_stock.into()])
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map_err(|err| Error::unique_violation(err, Error::DuplicateProductName))?;

    Ok(result.last_insert_rowid())
}

/// Returns whether a row was written; an unknown id is not an error.
async fn update_row(connection: &mut SqliteConnection, item: &Product) -> Result<bool> {
    let stored = select()
        .and_where(Expr::col(table::Product::Id).eq(item.id))
        .limit(1)
        .to_owned();
    if fetch_optional(&mut *connection, stored).await?.is_none() {
        return Ok(false);
    }

    if let Some(other) = find_by_name(&mut *connection, &item.name).await? {
        if other.id != item.id {
            return Err(Error::DuplicateProductName);
        }
    }

    let (sql, values) = Query::update()
        .table(table::Product::Table)
        .values([
            (table::Product::Name, item.name.to_owned().into()),
            (table::Product::InStock, item.in_stock.into()),
        ])
        .and_where(Expr::col(table::Product::Id).eq(item.id))
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map_err(|err| Error::unique_violation(err, Error::DuplicateProductName))?;

    Ok(result.rows_affected() > 0)
}

#[async_trait::async_trait]
impl Repository<Product> for SqliteProductRepository {
    async fn get(&self, id: i64) -> Result<Option<Product>> {
        let statement = select()
            .and_where(Expr::col(table::Product::Id).eq(id))
            .limit(1)
            .to_owned();

        fetch_optional(&self.pool, statement).await
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(table::Product::Id).is_in(ids.iter().copied()))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_all(&self) -> Result<Vec<Product>> {
        fetch_all(&self.pool, select()).await
    }

    async fn add(&self, item: &Product) -> Result<i64> {
        let mut connection = self.pool.acquire().await?;
        let id = insert_row(&mut connection, item).await?;

        tracing::debug!(id, name = %item.name, "product added");
        self.changes.notify(&[Table::Product]);

        Ok(id)
    }

    async fn add_multiple(&self, items: &[Product]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(insert_row(&mut tx, item).await?);
        }
        tx.commit().await?;

        self.changes.notify(&[Table::Product]);

        Ok(ids)
    }

    async fn update(&self, item: &Product) -> Result<()> {
        let mut connection = self.pool.acquire().await?;
        if update_row(&mut connection, item).await? {
            self.changes.notify(&[Table::Product]);
        }

        Ok(())
    }

    async fn update_multiple(&self, items: &[Product]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let mut changed = false;
        for item in items {
            changed |= update_row(&mut tx, item).await?;
        }
        tx.commit().await?;

        if changed {
            self.changes.notify(&[Table::Product]);
        }

        Ok(())
    }

    async fn remove(&self, item: &Product) -> Result<()> {
        let (sql, values) = Query::delete()
            .from_table(table::Product::Table)
            .and_where(Expr::col(table::Product::Id).eq(item.id))
            .build_sqlx(SqliteQueryBuilder);

        // placements go with the product through the foreign key
        let result = sqlx::query_with(&sql, values).execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            tracing::debug!(id = item.id, "product removed");
            self.changes.notify(&[Table::Product, Table::AisleProduct]);
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<Product>> {
        find_by_name(&self.pool, name).await
    }

    async fn get_by_in_stock(&self, in_stock: bool) -> Result<Vec<Product>> {
        let statement = select()
            .and_where(Expr::col(table::Product::InStock).eq(in_stock))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }
}
