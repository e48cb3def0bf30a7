//! SQL DDL for initializing the customer storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite table with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT (ids of deleted rows are never reused)
/// - `name`, `email` required; `phone`, `company` nullable
pub const SQLITE_CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NULL,
    company TEXT NULL
)
"#;

/// Non-unique indexes on `name` and `email` for lookups.
pub const SQLITE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_customers_name ON customers(name);
CREATE INDEX IF NOT EXISTS idx_customers_email ON customers(email);
"#;

/// Applied when `database.unique_email` is enabled.
/// Fails if the table already holds duplicate e-mails.
pub const SQLITE_UNIQUE_EMAIL: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_email_unique ON customers(email)";

/// Applied when `database.unique_email` is disabled.
pub const SQLITE_DROP_UNIQUE_EMAIL: &str = "DROP INDEX IF EXISTS idx_customers_email_unique";

/// Columns of an existing `customers` table as reported by SQLite.
pub const SQLITE_TABLE_INFO: &str =
    r#"SELECT name, type AS sql_type, "notnull" AS not_null, pk
       FROM pragma_table_info('customers')"#;

/// One column the repository reads and writes.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub not_null: bool,
    pub primary_key: bool,
}

/// Shape an existing table must have. Extra nullable columns are tolerated.
pub const CUSTOMER_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec { name: "id", sql_type: "INTEGER", not_null: false, primary_key: true },
    ColumnSpec { name: "name", sql_type: "TEXT", not_null: true, primary_key: false },
    ColumnSpec { name: "email", sql_type: "TEXT", not_null: true, primary_key: false },
    ColumnSpec { name: "phone", sql_type: "TEXT", not_null: false, primary_key: false },
    ColumnSpec { name: "company", sql_type: "TEXT", not_null: false, primary_key: false },
];

/// A column as found in `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TableColumn {
    pub name: String,
    pub sql_type: String,
    pub not_null: i64,
    pub pk: i64,
}

/// Compare the live table against [`CUSTOMER_COLUMNS`].
/// Returns a description of the first mismatch.
pub fn check_columns(found: &[TableColumn]) -> Result<(), String> {
    for spec in CUSTOMER_COLUMNS {
        let Some(col) = found.iter().find(|c| c.name.eq_ignore_ascii_case(spec.name)) else {
            return Err(format!("customers.{} is missing", spec.name));
        };
        if !col.sql_type.eq_ignore_ascii_case(spec.sql_type) {
            return Err(format!(
                "customers.{} has type {}, expected {}",
                spec.name, col.sql_type, spec.sql_type
            ));
        }
        if spec.primary_key && col.pk == 0 {
            return Err(format!("customers.{} is not the primary key", spec.name));
        }
        if !spec.primary_key && (col.not_null != 0) != spec.not_null {
            let expected = if spec.not_null { "NOT NULL" } else { "nullable" };
            return Err(format!("customers.{} must be {expected}", spec.name));
        }
    }
    if let Some(extra) = found.iter().find(|c| {
        c.not_null != 0
            && !CUSTOMER_COLUMNS
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&c.name))
    }) {
        return Err(format!(
            "customers.{} is NOT NULL but unknown to the repository",
            extra.name
        ));
    }
    Ok(())
}
