use std::str::FromStr;

use aisleron_aisle::SqliteAisleRepository;
use aisleron_db::table;
use aisleron_shared::{
    AisleRepository, Changes, Error, FilterType, LiveQuery, Location, LocationRepository,
    LocationType, Repository, Result, Table,
};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool, prelude::FromRow};

#[derive(Debug, Default, FromRow)]
pub struct LocationRow {
    pub id: i64,
    #[sqlx(rename = "type")]
    pub location_type: String,
    pub default_filter: String,
    pub name: String,
    pub pinned: bool,
}

impl TryFrom<LocationRow> for Location {
    type Error = Error;

    fn try_from(row: LocationRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            location_type: LocationType::from_str(&row.location_type)?,
            default_filter: FilterType::from_str(&row.default_filter)?,
            name: row.name,
            pinned: row.pinned,
            aisles: vec![],
        })
    }
}

#[derive(Clone)]
pub struct SqliteLocationRepository {
    pool: SqlitePool,
    changes: Changes,
    aisles: SqliteAisleRepository,
}

impl SqliteLocationRepository {
    pub fn new(pool: SqlitePool, changes: Changes) -> Self {
        Self {
            aisles: SqliteAisleRepository::new(pool.clone(), changes.clone()),
            pool,
            changes,
        }
    }

    async fn find_shops(&self, pinned_only: bool) -> Result<Vec<Location>> {
        let mut statement = select()
            .and_where(Expr::col(table::Location::Type).eq(LocationType::Shop.as_ref()))
            .to_owned();

        if pinned_only {
            statement.and_where(Expr::col(table::Location::Pinned).eq(true));
        }

        fetch_all(&self.pool, statement).await
    }

    async fn find_with_products(&self, id: i64) -> Result<Option<Location>> {
        let Some(mut location) = self.get(id).await? else {
            return Ok(None);
        };
        location.aisles = self.aisles.get_for_location_with_products(id).await?;

        Ok(Some(location))
    }
}

fn select() -> SelectStatement {
    Query::select()
        .columns([
            table::Location::Id,
            table::Location::Type,
            table::Location::DefaultFilter,
            table::Location::Name,
            table::Location::Pinned,
        ])
        .from(table::Location::Table)
        .order_by(table::Location::Id, Order::Asc)
        .to_owned()
}

async fn fetch_all<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Vec<Location>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, LocationRow, _>(&sql, values)
        .fetch_all(executor)
        .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

async fn fetch_optional<'e, E: SqliteExecutor<'e>>(
    executor: E,
    statement: SelectStatement,
) -> Result<Option<Location>> {
    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, LocationRow, _>(&sql, values)
        .fetch_optional(executor)
        .await?;

    row.map(TryInto::try_into).transpose()
}

async fn find_by_id<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Location>> {
    let statement = select()
        .and_where(Expr::col(table::Location::Id).eq(id))
        .limit(1)
        .to_owned();

    fetch_optional(executor, statement).await
}

async fn find_by_name<'e, E: SqliteExecutor<'e>>(
    executor: E,
    name: &str,
) -> Result<Option<Location>> {
    let statement = select()
        .and_where(Expr::cust_with_values(
            r#""name" = ? COLLATE NOCASE"#,
            [name.to_owned()],
        ))
        .limit(1)
        .to_owned();

    fetch_optional(executor, statement).await
}

async fn find_home<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<Option<Location>> {
    let statement = select()
        .and_where(Expr::col(table::Location::Type).eq(LocationType::Generic.as_ref()))
        .limit(1)
        .to_owned();

    fetch_optional(executor, statement).await
}

/// Tells the home index apart from the name index.
fn unique_violation(err: sqlx::Error) -> Error {
    let home = err.as_database_error().is_some_and(|db| {
        db.is_unique_violation() && db.message().contains("location.type")
    });

    if home {
        return Error::DuplicateHomeLocation;
    }

    Error::unique_violation(err, Error::DuplicateLocationName)
}

async fn insert_row(connection: &mut SqliteConnection, item: &Location) -> Result<i64> {
    if find_by_name(&mut *connection, &item.name).await?.is_some() {
        return Err(Error::DuplicateLocationName);
    }

    if item.is_home() && find_home(&mut *connection).await?.is_some() {
        return Err(Error::DuplicateHomeLocation);
    }

    let (sql, values) = Query::insert()
        .into_table(table::Location::Table)
        .columns([
            table::Location::Type,
            table::Location::DefaultFilter,
            table::Location::Name,
            table::Location::Pinned,
        ])
        .values_panic([
            item.location_type.to_string().into(),
            item.default_filter.to_string().into(),
            item.name.to_owned().into(),
            item.pinned.into(),
        ])
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map_err(unique_violation)?;

    Ok(result.last_insert_rowid())
}

/// The location type is fixed at creation and never rewritten.
async fn update_row(connection: &mut SqliteConnection, item: &Location) -> Result<bool> {
    if find_by_id(&mut *connection, item.id).await?.is_none() {
        return Ok(false);
    }

    if let Some(other) = find_by_name(&mut *connection, &item.name).await? {
        if other.id != item.id {
            return Err(Error::DuplicateLocationName);
        }
    }

    let (sql, values) = Query::update()
        .table(table::Location::Table)
        .values([
            (
                table::Location::DefaultFilter,
                item.default_filter.to_string().into(),
            ),
            (table::Location::Name, item.name.to_owned().into()),
            (table::Location::Pinned, item.pinned.into()),
        ])
        .and_where(Expr::col(table::Location::Id).eq(item.id))
        .build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_with(&sql, values)
        .execute(&mut *connection)
        .await
        .map_err(unique_violation)?;

    Ok(result.rows_affected() > 0)
}

#[async_trait::async_trait]
impl Repository<Location> for SqliteLocationRepository {
    async fn get(&self, id: i64) -> Result<Option<Location>> {
        find_by_id(&self.pool, id).await
    }

    async fn get_multiple(&self, ids: &[i64]) -> Result<Vec<Location>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = select()
            .and_where(Expr::col(table::Location::Id).is_in(ids.iter().copied()))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_all(&self) -> Result<Vec<Location>> {
        fetch_all(&self.pool, select()).await
    }

    async fn add(&self, item: &Location) -> Result<i64> {
        let mut connection = self.pool.acquire().await?;
        let id = insert_row(&mut connection, item).await?;

        tracing::debug!(id, name = %item.name, location_type = %item.location_type, "location added");
        self.changes.notify(&[Table::Location]);

        Ok(id)
    }

    async fn add_multiple(&self, items: &[Location]) -> Result<Vec<i64>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            ids.push(insert_row(&mut tx, item).await?);
        }
        tx.commit().await?;

        self.changes.notify(&[Table::Location]);

        Ok(ids)
    }

    async fn update(&self, item: &Location) -> Result<()> {
        let mut connection = self.pool.acquire().await?;
        if update_row(&mut connection, item).await? {
            self.changes.notify(&[Table::Location]);
        }

        Ok(())
    }

    async fn update_multiple(&self, items: &[Location]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let mut changed = false;
        for item in items {
            changed |= update_row(&mut tx, item).await?;
        }
        tx.commit().await?;

        if changed {
            self.changes.notify(&[Table::Location]);
        }

        Ok(())
    }

    async fn remove(&self, item: &Location) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let Some(stored) = find_by_id(&mut *tx, item.id).await? else {
            return Ok(());
        };

        if stored.is_home() {
            return Err(Error::DeleteHomeLocation);
        }

        let aisles = Query::select()
            .column(table::Aisle::Id)
            .from(table::Aisle::Table)
            .and_where(Expr::col(table::Aisle::LocationId).eq(stored.id))
            .to_owned();

        let (sql, values) = Query::delete()
            .from_table(table::AisleProduct::Table)
            .and_where(Expr::col(table::AisleProduct::AisleId).in_subquery(aisles))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(table::Aisle::Table)
            .and_where(Expr::col(table::Aisle::LocationId).eq(stored.id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let (sql, values) = Query::delete()
            .from_table(table::Location::Table)
            .and_where(Expr::col(table::Location::Id).eq(stored.id))
            .build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        tracing::debug!(id = stored.id, "location removed");
        self.changes
            .notify(&[Table::Location, Table::Aisle, Table::AisleProduct]);

        Ok(())
    }
}

#[async_trait::async_trait]
impl LocationRepository for SqliteLocationRepository {
    fn get_shops(&self) -> LiveQuery<Vec<Location>> {
        let repository = self.clone();

        self.changes.watch(&[Table::Location], move || {
            let repository = repository.clone();
            async move { repository.find_shops(false).await }
        })
    }

    fn get_pinned_shops(&self) -> LiveQuery<Vec<Location>> {
        let repository = self.clone();

        self.changes.watch(&[Table::Location], move || {
            let repository = repository.clone();
            async move { repository.find_shops(true).await }
        })
    }

    async fn get_home(&self) -> Result<Location> {
        find_home(&self.pool)
            .await?
            .ok_or(Error::HomeLocationMissing)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Location>> {
        find_by_name(&self.pool, name).await
    }

    async fn get_by_type(&self, location_type: LocationType) -> Result<Vec<Location>> {
        let statement = select()
            .and_where(Expr::col(table::Location::Type).eq(location_type.as_ref()))
            .to_owned();

        fetch_all(&self.pool, statement).await
    }

    async fn get_location_with_aisles(&self, id: i64) -> Result<Option<Location>> {
        let Some(mut location) = self.get(id).await? else {
            return Ok(None);
        };
        location.aisles = self.aisles.get_for_location(id).await?;

        Ok(Some(location))
    }

    fn get_location_with_aisles_with_products(&self, id: i64) -> LiveQuery<Option<Location>> {
        let repository = self.clone();

        self.changes.watch(Table::ALL, move || {
            let repository = repository.clone();
            async move { repository.find_with_products(id).await }
        })
    }
}
