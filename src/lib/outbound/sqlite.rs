use std::str::FromStr;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, QueryBuilder, Row, SqlitePool, Transaction};

use crate::domain::device::models::device::{
    CreateDeviceError, DeleteDeviceError, Device, DeviceBrand, DeviceId, DeviceName, DeviceState,
    NewDevice,
};
use crate::domain::device::models::page::PageRequest;
use crate::domain::device::ports::{DeviceRepository, DeviceTransaction};
use crate::domain::device::query::{DeviceClause, DeviceCriteria};

const COLUMNS: &str = "id, name, brand, state, created_on";
const INSERT: &str = "INSERT INTO devices (name, brand, brand_key, state, created_on) \
     VALUES (?, ?, ?, ?, ?) \
     RETURNING id, name, brand, state, created_on";
const SELECT_BY_ID: &str = "SELECT id, name, brand, state, created_on FROM devices WHERE id = ?";
const UPDATE: &str =
    "UPDATE devices SET name = ?, brand = ?, brand_key = ?, state = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str) -> Result<Sqlite, anyhow::Error> {
        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::from_str(path)
                .with_context(|| format!("invalid database path {}", path))?
                .create_if_missing(true),
        )
        .await
        .with_context(|| format!("failed to open database at {}", path))?;

        Self::migrate(pool).await
    }

    /// Opens a private in-memory database on a single, never recycled connection, so the data
    /// lives as long as the returned store.
    pub async fn in_memory() -> Result<Sqlite, anyhow::Error> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
            .await
            .context("failed to open in-memory database")?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Sqlite, anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Ok(Sqlite { pool })
    }
}

/// Wrapper for converting database rows into domain [Device].
struct DeviceRow(Device);

impl<'r> FromRow<'r, SqliteRow> for DeviceRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let brand: String = row.try_get("brand")?;
        let state: String = row.try_get("state")?;
        let created_on: DateTime<Utc> = row.try_get("created_on")?;

        let id = DeviceId::new(id).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let name = DeviceName::new(&name).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let brand = DeviceBrand::new(&brand).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let state = DeviceState::from_str(&state).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self(Device::new(id, name, brand, state, created_on)))
    }
}

fn push_criteria(query_builder: &mut QueryBuilder<'_, sqlx::Sqlite>, criteria: &DeviceCriteria) {
    for (i, clause) in criteria.clauses().iter().enumerate() {
        query_builder.push(if i == 0 { " WHERE " } else { " AND " });
        match clause {
            DeviceClause::BrandEqualsIgnoreCase(brand) => {
                query_builder.push("brand_key = ").push_bind(brand.key());
            }
            DeviceClause::StateEquals(state) => {
                query_builder.push("state = ").push_bind(state.as_str());
            }
        }
    }
}

impl DeviceRepository for Sqlite {
    type Transaction = SqliteTransaction;

    async fn begin(&self) -> Result<SqliteTransaction, anyhow::Error> {
        // Take the write lock up front so the read-then-write in a transaction cannot fail to
        // upgrade with SQLITE_BUSY.
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .context("failed to start SQLite transaction")?;

        Ok(SqliteTransaction { tx })
    }

    async fn create_device(&self, device: &NewDevice) -> Result<Device, CreateDeviceError> {
        let row = sqlx::query_as::<_, DeviceRow>(INSERT)
            .bind(device.name().as_str())
            .bind(device.brand().as_str())
            .bind(device.brand().key())
            .bind(device.state().as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                anyhow!(e).context(format!("failed to save device with name {:?}", device.name()))
            })?;

        Ok(row.0)
    }

    async fn find_device_by_id(&self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        let row = sqlx::query_as::<_, DeviceRow>(SELECT_BY_ID)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to fetch device with id {}", id))?;

        Ok(row.map(|r| r.0))
    }

    async fn find_devices(
        &self,
        criteria: &DeviceCriteria,
        page: &PageRequest,
    ) -> Result<(Vec<Device>, u64), anyhow::Error> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM devices");
        push_criteria(&mut count_query, criteria);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("failed to count devices")?;

        let offset = i64::try_from(page.offset()).context("page offset out of range")?;
        let mut select_query = QueryBuilder::new(format!("SELECT {} FROM devices", COLUMNS));
        push_criteria(&mut select_query, criteria);
        select_query
            .push(" ORDER BY id LIMIT ")
            .push_bind(i64::from(page.size()))
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = select_query
            .build_query_as::<DeviceRow>()
            .fetch_all(&self.pool)
            .await
            .context("failed to list devices")?;

        let total = u64::try_from(total).context("negative device count")?;

        Ok((rows.into_iter().map(|r| r.0).collect(), total))
    }
}

/// An open SQLite transaction. Dropping it without committing rolls back.
pub struct SqliteTransaction {
    tx: Transaction<'static, sqlx::Sqlite>,
}

impl DeviceTransaction for SqliteTransaction {
    async fn find_device_by_id(&mut self, id: &DeviceId) -> Result<Option<Device>, anyhow::Error> {
        let row = sqlx::query_as::<_, DeviceRow>(SELECT_BY_ID)
            .bind(id.into_inner())
            .fetch_optional(&mut *self.tx)
            .await
            .with_context(|| format!("failed to fetch device with id {}", id))?;

        Ok(row.map(|r| r.0))
    }

    async fn save_device(&mut self, device: &Device) -> Result<(), anyhow::Error> {
        let result = sqlx::query(UPDATE)
            .bind(device.name().as_str())
            .bind(device.brand().as_str())
            .bind(device.brand().key())
            .bind(device.state().as_str())
            .bind(device.id().into_inner())
            .execute(&mut *self.tx)
            .await
            .with_context(|| format!("failed to update device with id {}", device.id()))?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("device with id {} does not exist", device.id()));
        }

        Ok(())
    }

    async fn delete_device_by_id(&mut self, id: &DeviceId) -> Result<(), DeleteDeviceError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.into_inner())
            .execute(&mut *self.tx)
            .await
            .with_context(|| format!("failed to delete device with id {}", id))?;

        if result.rows_affected() == 0 {
            return Err(DeleteDeviceError::NotFound { id: *id });
        }

        Ok(())
    }

    async fn commit(self) -> Result<(), anyhow::Error> {
        self.tx
            .commit()
            .await
            .context("failed to commit SQLite transaction")
    }
}
