use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    Batch, Error, ListingParams, Order,
    error::Result,
    language::{CreateLanguage, Language, LanguageStore, UpdateLanguage, VALID_ORDER_FIELDS},
};

/// Language store kept in process memory, nothing survives restart.
#[derive(Clone, Default)]
pub struct MemoryLanguageStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    last_id: i64,
    records: BTreeMap<i64, Language>,
}

impl MemoryInner {
    fn insert(&mut self, payload: CreateLanguage) -> Language {
        self.last_id += 1;
        let record = Language {
            id: self.last_id,
            name: payload.name,
            description: payload.description,
            version: 1,
        };
        self.records.insert(record.id, record.clone());
        record
    }
}

impl MemoryLanguageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_filter(record: &Language, filter: Option<&str>) -> bool {
    match filter {
        Some(filter) => record.name.contains(filter) || record.description.contains(filter),
        None => true,
    }
}

fn compare_field(a: &Language, b: &Language, field: &str) -> Ordering {
    match field {
        "name" => a.name.cmp(&b.name),
        "description" => a.description.cmp(&b.description),
        _ => a.id.cmp(&b.id),
    }
}

fn compare(a: &Language, b: &Language, order: &[Order]) -> Ordering {
    order
        .iter()
        .map(|o| match o {
            Order::Asc(field) => compare_field(a, b, field),
            Order::Desc(field) => compare_field(a, b, field).reverse(),
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

impl LanguageStore for MemoryLanguageStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.inner.read().await.records.len() as u64)
    }

    async fn list(&self, params: ListingParams) -> Result<Batch<Language>> {
        let order = params.checked_order(VALID_ORDER_FIELDS)?;
        let filter = params.filter.as_deref();
        let inner = self.inner.read().await;
        let mut selected = inner
            .records
            .values()
            .filter(|r| contains_filter(r, filter))
            .collect::<Vec<_>>();
        selected.sort_by(|a, b| compare(a, b, &order));

        let total = selected.len() as u64;
        let rows = selected
            .into_iter()
            .skip(params.offset.max(0) as usize)
            .take(params.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(Batch {
            offset: params.offset,
            limit: params.limit,
            rows,
            total,
        })
    }

    async fn get(&self, id: i64) -> Result<Language> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::RecordNotFound(format!("Language {id}")))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.inner.read().await.records.contains_key(&id))
    }

    async fn create(&self, payload: CreateLanguage) -> Result<Language> {
        Ok(self.inner.write().await.insert(payload))
    }

    async fn create_many(&self, payloads: Vec<CreateLanguage>) -> Result<Vec<Language>> {
        let mut inner = self.inner.write().await;
        Ok(payloads.into_iter().map(|p| inner.insert(p)).collect())
    }

    async fn update(&self, id: i64, payload: UpdateLanguage) -> Result<Language> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| Error::RecordNotFound(format!("Language {id}")))?;
        let version = payload.version.unwrap_or(record.version);
        if version != record.version {
            debug!(
                "Stale version {version} for language {id}, current is {}",
                record.version
            );
            return Err(Error::FailedUpdate { id, version });
        }
        record.name = payload.name;
        record.description = payload.description;
        record.version = version + 1;
        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.inner.write().await.records.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::RecordNotFound(format!("Language {id}"))),
        }
    }
}
