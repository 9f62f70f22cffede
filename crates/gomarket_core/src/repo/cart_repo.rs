//! Cart snapshot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load the full cart snapshot under one fixed storage key.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - `save_snapshot` validates every product before touching storage.
//! - `load_snapshot` rejects malformed JSON, invalid products and
//!   duplicate ids with `RepoError::InvalidData`.
//! - The stored value is always the JSON array for the *entire* cart;
//!   there are no partial updates.

use crate::db::DbError;
use crate::model::product::{Product, ProductValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage key for the cart snapshot, kept byte-identical to the
/// key used by earlier app releases so existing carts survive upgrades.
pub const STORAGE_KEY: &str = "@GoMarketPlace:products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for cart snapshot persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProductValidationError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted cart data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; \
                 open connections through db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProductValidationError> for RepoError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for cart snapshot persistence.
pub trait CartRepository {
    /// Loads the persisted snapshot, `None` when nothing was ever stored.
    fn load_snapshot(&self) -> RepoResult<Option<Vec<Product>>>;
    /// Replaces the persisted snapshot with the given cart contents.
    fn save_snapshot(&self, products: &[Product]) -> RepoResult<()>;
}

/// SQLite-backed cart repository over the `kv_entries` table.
///
/// Owns its connection: the cart store is the single owner of the
/// storage handle for the process lifetime.
pub struct SqliteCartRepository {
    conn: Connection,
}

impl SqliteCartRepository {
    /// Wraps a connection after verifying it was bootstrapped by
    /// `db::open_db` (migrations applied, required schema present).
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not
    ///   match the latest migration.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not contain what this repository reads and writes.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let expected_version = crate::db::migrations::latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        require_table(&conn, "kv_entries")?;
        for column in ["key", "value", "updated_at"] {
            require_column(&conn, "kv_entries", column)?;
        }

        Ok(Self { conn })
    }
}

impl CartRepository for SqliteCartRepository {
    fn load_snapshot(&self) -> RepoResult<Option<Vec<Product>>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let products: Vec<Product> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("snapshot is not a product array: {err}"))
        })?;

        let mut seen = HashSet::new();
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id.as_str()) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate product id `{}` in snapshot",
                    product.id
                )));
            }
        }

        Ok(Some(products))
    }

    fn save_snapshot(&self, products: &[Product]) -> RepoResult<()> {
        for product in products {
            product.validate()?;
        }

        let raw = serde_json::to_string(products).map_err(|err| {
            RepoError::InvalidData(format!("snapshot serialization failed: {err}"))
        })?;

        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![STORAGE_KEY, raw],
        )?;

        Ok(())
    }
}

fn require_table(conn: &Connection, table: &'static str) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }
    Ok(())
}

fn require_column(
    conn: &Connection,
    table: &'static str,
    column: &'static str,
) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(
                SELECT 1 FROM pragma_table_info('{table}') WHERE name = ?1
            );"
        ),
        [column],
        |row| row.get(0),
    )?;
    if exists == 0 {
        return Err(RepoError::MissingRequiredColumn { table, column });
    }
    Ok(())
}
