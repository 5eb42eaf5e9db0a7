use std::future::Future;

use crate::{Batch, Error, ListingParams, Pool, error::Result};
use garde::Validate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const VALID_ORDER_FIELDS: &[&str] = &["id", "name", "description"];

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateLanguage {
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 5000))]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateLanguage {
    #[garde(skip)]
    pub id: i64,
    #[garde(length(min = 1, max = 255))]
    pub name: String,
    #[garde(length(min = 1, max = 5000))]
    pub description: String,
    /// Expected current version, if missing the stored version is used
    #[garde(range(min = 1))]
    #[serde(default)]
    pub version: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub version: i64,
}

/// Persistence of language records.
///
/// Every write is committed before the returned future resolves.
/// `update` is optimistic - if the record changed (or vanished) since the expected
/// version was read, it fails with [`Error::FailedUpdate`].
pub trait LanguageStore: Clone + Send + Sync + 'static {
    fn count(&self) -> impl Future<Output = Result<u64>> + Send;
    fn list(&self, params: ListingParams) -> impl Future<Output = Result<Batch<Language>>> + Send;
    fn get(&self, id: i64) -> impl Future<Output = Result<Language>> + Send;
    fn exists(&self, id: i64) -> impl Future<Output = Result<bool>> + Send;
    fn create(&self, payload: CreateLanguage) -> impl Future<Output = Result<Language>> + Send;
    /// Inserts all records or none of them
    fn create_many(
        &self,
        payloads: Vec<CreateLanguage>,
    ) -> impl Future<Output = Result<Vec<Language>>> + Send;
    fn update(
        &self,
        id: i64,
        payload: UpdateLanguage,
    ) -> impl Future<Output = Result<Language>> + Send;
    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct SqlLanguageStore {
    pool: Pool,
}

impl SqlLanguageStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

fn where_clause(filter: Option<&str>) -> &'static str {
    match filter {
        Some(_) => "WHERE instr(name, ?) > 0 OR instr(description, ?) > 0",
        None => "",
    }
}

impl LanguageStore for SqlLanguageStore {
    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM programming_language")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn list(&self, params: ListingParams) -> Result<Batch<Language>> {
        let order = params.ordering(VALID_ORDER_FIELDS)?;
        let filter = params.filter.as_deref();
        let condition = where_clause(filter);

        let count_query = format!("SELECT count(*) FROM programming_language {condition}");
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(filter) = filter {
            count = count.bind(filter).bind(filter);
        }
        let total = count.fetch_one(&self.pool).await?;

        let select_query = format!(
            "SELECT id, name, description, version FROM programming_language {condition} ORDER BY {order} LIMIT ? OFFSET ?"
        );
        let mut select = sqlx::query_as::<_, Language>(&select_query);
        if let Some(filter) = filter {
            select = select.bind(filter).bind(filter);
        }
        let rows = select
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(Batch {
            offset: params.offset,
            limit: params.limit,
            rows,
            total: total as u64,
        })
    }

    async fn get(&self, id: i64) -> Result<Language> {
        get(id, &self.pool).await
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT count(*) FROM programming_language WHERE id = ?")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn create(&self, payload: CreateLanguage) -> Result<Language> {
        let result = sqlx::query(
            "INSERT INTO programming_language (name, description, version) VALUES (?, ?, 1)",
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get(id).await
    }

    async fn update(&self, id: i64, payload: UpdateLanguage) -> Result<Language> {
        // UPDATE must be the first statement, SQLite cannot upgrade a held read lock
        let mut transaction = self.pool.begin().await?;
        let result = match payload.version {
            Some(version) => {
                sqlx::query(
                    "UPDATE programming_language SET name = ?, description = ?, version = version + 1 WHERE id = ? and version = ?",
                )
                .bind(&payload.name)
                .bind(&payload.description)
                .bind(id)
                .bind(version)
                .execute(&mut *transaction)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE programming_language SET name = ?, description = ?, version = version + 1 WHERE id = ?",
                )
                .bind(&payload.name)
                .bind(&payload.description)
                .bind(id)
                .execute(&mut *transaction)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return match payload.version {
                Some(version) => {
                    debug!("No row updated for language {id} at version {version}");
                    Err(Error::FailedUpdate { id, version })
                }
                None => Err(Error::RecordNotFound(format!("Language {id}"))),
            };
        }

        let record = get(id, &mut *transaction).await?;
        transaction.commit().await?;
        Ok(record)
    }

    async fn create_many(&self, payloads: Vec<CreateLanguage>) -> Result<Vec<Language>> {
        let mut transaction = self.pool.begin().await?;
        let mut records = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let result = sqlx::query(
                "INSERT INTO programming_language (name, description, version) VALUES (?, ?, 1)",
            )
            .bind(&payload.name)
            .bind(&payload.description)
            .execute(&mut *transaction)
            .await?;
            records.push(Language {
                id: result.last_insert_rowid(),
                name: payload.name,
                description: payload.description,
                version: 1,
            });
        }
        transaction.commit().await?;
        Ok(records)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let res = sqlx::query("DELETE FROM programming_language WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            Err(Error::RecordNotFound(format!("Language {id}")))
        } else {
            Ok(())
        }
    }
}

async fn get<'c, E>(id: i64, executor: E) -> Result<Language>
where
    E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    sqlx::query_as::<_, Language>(
        "SELECT id, name, description, version FROM programming_language WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| Error::RecordNotFound(format!("Language {id}")))
}
