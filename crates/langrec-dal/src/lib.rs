pub mod error;
pub mod language;
pub mod memory;
pub mod seed;

use std::{fmt::Display, str::FromStr as _};

pub use error::Error;
pub use language::{Language, LanguageStore, SqlLanguageStore};
pub use memory::MemoryLanguageStore;
pub use sqlx::Error as SqlxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::error::Result;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

pub const DEFAULT_ORDER_FIELD: &str = "id";

pub async fn new_pool(database_url: &str, max_connections: u32) -> Result<Pool, Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    // every connection to :memory: opens its own database
    let pool = if database_url.contains(":memory:") {
        debug!("Using single connection pool for in-memory database");
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?
    };
    Ok(pool)
}

/// Creates schema if it does not exist yet
pub async fn init_db(pool: &Pool) -> Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "{} DESC", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingParams {
    pub offset: i64,
    pub limit: i64,
    pub order: Option<Vec<Order>>,
    /// substring that must be contained in one of searchable fields, case sensitive
    pub filter: Option<String>,
}

impl ListingParams {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            order: None,
            filter: None,
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = if filter.is_empty() {
            None
        } else {
            Some(filter)
        };
        self
    }

    pub fn checked_order(&self, valid_fields: &[&str]) -> Result<Vec<Order>> {
        match self.order.as_ref() {
            Some(order) if !order.is_empty() => order
                .iter()
                .map(|o| {
                    if valid_fields.contains(&o.as_ref()) {
                        Ok(o.clone())
                    } else {
                        Err(Error::InvalidOrderByField(o.as_ref().to_string()))
                    }
                })
                .collect(),
            _ => Ok(vec![Order::Asc(DEFAULT_ORDER_FIELD.to_string())]),
        }
    }

    pub fn ordering(&self, valid_fields: &[&str]) -> Result<String> {
        let ordering = self
            .checked_order(valid_fields)?
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(ordering)
    }
}

#[derive(Debug)]
pub struct Batch<T> {
    pub offset: i64,
    pub limit: i64,
    pub rows: Vec<T>,
    pub total: u64,
}
