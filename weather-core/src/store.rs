use crate::{
    Config,
    model::{NewWeatherRecord, WeatherPatch, WeatherRecord},
    store::supabase::SupabaseStore,
};
use anyhow::Context;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod supabase;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Weather record not found")]
    NotFound,

    #[error("Request to datastore failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// `code` is the PostgREST / Postgres error code when the body carried one.
    #[error("Datastore returned status {status}: {body}")]
    Api {
        status: u16,
        code: Option<String>,
        body: String,
    },

    #[error("Failed to decode datastore response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Datastore returned no rows")]
    EmptyResult,
}

/// CRUD over the weather records table.
///
/// `update_by_id` and `delete_by_id` only touch an existing row and report
/// `NotFound` when nothing matched.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    async fn insert(&self, record: &NewWeatherRecord) -> Result<WeatherRecord, StoreError>;

    /// All records, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<WeatherRecord>, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<WeatherRecord, StoreError>;

    async fn update_by_id(
        &self,
        id: &str,
        patch: &WeatherPatch,
    ) -> Result<WeatherRecord, StoreError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

/// Construct the Supabase-backed store from config.
pub fn store_from_config(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let url = config.store_url()?;
    let key = config.store_service_key()?;

    let store = SupabaseStore::new(url, key.to_owned(), &config.store.table)
        .with_context(|| format!("Invalid datastore URL: {url}"))?;

    Ok(Arc::new(store))
}
