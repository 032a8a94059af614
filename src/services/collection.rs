//! Tenant-scoped record collections (memorials, appointments, invoices).
//!
//! Each tenant owns one JSON array per resource type under
//! `tenants/<slug>/`. Records also carry their `tenantSlug`, and every read
//! filters on it, so a misplaced record can never leak across tenants.

use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::services::tenant_service::is_valid_slug;
use crate::store::{JsonStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid tenant slug '{0}'")]
    InvalidTenant(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A record type stored in a tenant collection.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Fields accepted when creating a record.
    type Draft: DeserializeOwned + Send;
    /// Fields accepted when updating a record; `None` means "leave as is".
    type Patch: DeserializeOwned + Default + Send;

    const KIND: &'static str;
    const ID_PREFIX: &'static str;
    const FILE_NAME: &'static str;

    fn create(
        id: String,
        tenant_slug: &str,
        draft: Self::Draft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CollectionError>;

    fn id(&self) -> &str;

    fn tenant_slug(&self) -> &str;

    fn apply(&mut self, patch: Self::Patch) -> Result<(), CollectionError>;
}

/// Trim a required text field, failing when it is absent or blank.
pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, CollectionError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CollectionError::MissingRequiredField(field)),
    }
}

pub struct Collection<R> {
    store: JsonStore,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> Collection<R> {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn path(&self, tenant: &str) -> Result<PathBuf, CollectionError> {
        if !is_valid_slug(tenant) {
            return Err(CollectionError::InvalidTenant(tenant.to_string()));
        }
        Ok(self.store.path(format!("tenants/{}/{}", tenant, R::FILE_NAME)))
    }

    /// All records owned by `tenant`, in insertion order.
    pub async fn list(&self, tenant: &str) -> Result<Vec<R>, CollectionError> {
        let path = self.path(tenant)?;
        let records: Vec<R> = self.store.read(&path, Vec::new()).await;
        Ok(records.into_iter().filter(|r| r.tenant_slug() == tenant).collect())
    }

    pub async fn count(&self, tenant: &str) -> Result<usize, CollectionError> {
        Ok(self.list(tenant).await?.len())
    }

    pub async fn get(&self, tenant: &str, id: &str) -> Result<R, CollectionError> {
        self.list(tenant)
            .await?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))
    }

    pub async fn add(&self, tenant: &str, draft: R::Draft) -> Result<R, CollectionError> {
        self.add_at(tenant, draft, Utc::now()).await
    }

    pub async fn add_at(&self, tenant: &str, draft: R::Draft, now: DateTime<Utc>) -> Result<R, CollectionError> {
        let path = self.path(tenant)?;
        let tenant = tenant.to_string();

        let record = self
            .store
            .update(&path, Vec::<R>::new(), move |records| {
                let id = next_id(records, R::ID_PREFIX, now);
                let record = R::create(id, &tenant, draft, now)?;
                records.push(record.clone());
                Ok::<_, CollectionError>(record)
            })
            .await?;

        tracing::info!(kind = R::KIND, tenant = %record.tenant_slug(), id = %record.id(), "record created");
        Ok(record)
    }

    /// Merge the fields present in `patch` into the record.
    pub async fn update(&self, tenant: &str, id: &str, patch: R::Patch) -> Result<R, CollectionError> {
        let path = self.path(tenant)?;
        let tenant = tenant.to_string();
        let id = id.to_string();

        self.store
            .update(&path, Vec::<R>::new(), move |records| {
                let record = records
                    .iter_mut()
                    .find(|r| r.tenant_slug() == tenant && r.id() == id)
                    .ok_or_else(|| not_found::<R>(&id))?;
                record.apply(patch)?;
                Ok::<_, CollectionError>(record.clone())
            })
            .await
    }

    pub async fn delete(&self, tenant: &str, id: &str) -> Result<(), CollectionError> {
        let path = self.path(tenant)?;
        let (owner, target) = (tenant.to_string(), id.to_string());

        self.store
            .update(&path, Vec::<R>::new(), move |records| {
                let before = records.len();
                records.retain(|r| !(r.tenant_slug() == owner && r.id() == target));
                if records.len() == before {
                    return Err(not_found::<R>(&target));
                }
                Ok(())
            })
            .await?;

        tracing::info!(kind = R::KIND, tenant = %tenant, id = %id, "record deleted");
        Ok(())
    }
}

fn not_found<R: Resource>(id: &str) -> CollectionError {
    CollectionError::NotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

fn next_id<R: Resource>(records: &[R], prefix: &str, now: DateTime<Utc>) -> String {
    let base = format!("{}-{}", prefix, now.timestamp_millis());
    let taken = |candidate: &str| records.iter().any(|r| r.id() == candidate);

    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
