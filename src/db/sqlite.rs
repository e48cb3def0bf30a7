use crate::config::DatabaseConfig;
use crate::db::models::{Customer, CustomerChanges, NewCustomer};
use crate::db::schema::{
    SQLITE_CREATE_TABLE, SQLITE_DROP_UNIQUE_EMAIL, SQLITE_INDEXES, SQLITE_TABLE_INFO,
    SQLITE_UNIQUE_EMAIL, TableColumn, check_columns,
};
use crate::error::CrmError;
use crate::types::pagination::Page;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

const SELECT_COLUMNS: &str = "id, name, email, phone, company";
const SELECT_PAGE: &str =
    "SELECT id, name, email, phone, company FROM customers ORDER BY id LIMIT ? OFFSET ?";
const COUNT_CUSTOMERS: &str = "SELECT COUNT(*) FROM customers";

/// Repository for the `customers` table. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct CustomerStorage {
    pool: SqlitePool,
    unique_email: bool,
}

impl CustomerStorage {
    pub fn new(pool: SqlitePool, unique_email: bool) -> Self {
        Self { pool, unique_email }
    }

    /// Open a pool for `cfg.url`, creating the database file when missing.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, CrmError> {
        let connect_opts =
            SqliteConnectOptions::from_str(cfg.url.as_str())?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool, cfg.unique_email))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the table and indexes if they do not exist yet. Idempotent.
    /// An existing table whose columns do not match is rejected.
    pub async fn ensure_schema(&self) -> Result<(), CrmError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(SQLITE_CREATE_TABLE).execute(&mut *tx).await?;

        let columns: Vec<TableColumn> = sqlx::query_as(SQLITE_TABLE_INFO)
            .fetch_all(&mut *tx)
            .await?;
        check_columns(&columns).map_err(CrmError::Schema)?;

        // execute multiple statements one by one (sqlx::query runs a single statement)
        for stmt in SQLITE_INDEXES.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&mut *tx).await?;
        }
        let email_index = if self.unique_email {
            SQLITE_UNIQUE_EMAIL
        } else {
            SQLITE_DROP_UNIQUE_EMAIL
        };
        sqlx::query(email_index).execute(&mut *tx).await?;
        tx.commit().await?;

        info!(unique_email = self.unique_email, "customer schema ready");
        Ok(())
    }

    /// Insert a customer; the store assigns the id.
    pub async fn create(&self, customer: NewCustomer) -> Result<Customer, CrmError> {
        let created = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (name, email, phone, company) VALUES (?, ?, ?, ?) \
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.phone)
        .bind(customer.company)
        .fetch_one(&self.pool)
        .await
        .map_err(CrmError::from_write)?;
        debug!(id = created.id, "inserted customer");
        Ok(created)
    }

    /// One page of customers in id order. An offset past the end yields an empty page.
    pub async fn list(&self, page: Page) -> Result<Vec<Customer>, CrmError> {
        let rows = sqlx::query_as::<_, Customer>(SELECT_PAGE)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> Result<i64, CrmError> {
        let rec: (i64,) = sqlx::query_as(COUNT_CUSTOMERS)
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    /// A page plus the total row count, both read from one transaction
    /// so the total matches the rows the page was cut from.
    pub async fn list_with_total(&self, page: Page) -> Result<(Vec<Customer>, i64), CrmError> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query_as::<_, Customer>(SELECT_PAGE)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut *tx)
            .await?;
        let total: (i64,) = sqlx::query_as(COUNT_CUSTOMERS)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((rows, total.0))
    }

    pub async fn get(&self, id: i64) -> Result<Customer, CrmError> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {SELECT_COLUMNS} FROM customers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(CrmError::NotFound(id))
    }

    /// Apply `changes` to customer `id` in a single statement.
    /// Columns without a change keep their value; `id` is never written.
    pub async fn update(&self, id: i64, changes: CustomerChanges) -> Result<Customer, CrmError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let (set_phone, phone) = split_change(changes.phone);
        let (set_company, company) = split_change(changes.company);
        let updated = sqlx::query_as::<_, Customer>(&format!(
            r#"UPDATE customers SET
                name = CASE WHEN ? THEN ? ELSE name END,
                email = CASE WHEN ? THEN ? ELSE email END,
                phone = CASE WHEN ? THEN ? ELSE phone END,
                company = CASE WHEN ? THEN ? ELSE company END
              WHERE id = ?
              RETURNING {SELECT_COLUMNS}"#
        ))
        .bind(changes.name.is_some())
        .bind(changes.name)
        .bind(changes.email.is_some())
        .bind(changes.email)
        .bind(set_phone)
        .bind(phone)
        .bind(set_company)
        .bind(company)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CrmError::from_write)?;

        let updated = updated.ok_or(CrmError::NotFound(id))?;
        debug!(id, "updated customer");
        Ok(updated)
    }

    /// Hard delete; the id is not reused afterwards.
    pub async fn delete(&self, id: i64) -> Result<(), CrmError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(CrmError::NotFound(id));
        }
        debug!(id, "deleted customer");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn split_change<T>(change: Option<Option<T>>) -> (bool, Option<T>) {
    match change {
        Some(value) => (true, value),
        None => (false, None),
    }
}
