//! Supabase table access over its PostgREST interface (`/rest/v1/<table>`).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::{
    model::{NewWeatherRecord, WeatherPatch, WeatherRecord},
    truncate_body,
};

use super::{RecordStore, StoreError};

#[derive(Debug, Clone)]
pub struct SupabaseStore {
    table_url: Url,
    service_key: String,
    http: Client,
}

impl SupabaseStore {
    pub fn new(base_url: &str, service_key: String, table: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base.join(&format!("rest/v1/{table}"))?;

        Ok(Self {
            table_url,
            service_key,
            http: Client::new(),
        })
    }

    #[cfg(test)]
    fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url.clone())
            .header("apikey", &self.service_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.service_key))
    }

    fn returning(&self, method: Method) -> RequestBuilder {
        self.request(method).header("Prefer", "return=representation")
    }

    async fn rows<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>, StoreError> {
        let res = req.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                code: error_code(&body),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Like `rows`, for requests filtered on `id`.
    ///
    /// An id the column type cannot represent (a non-uuid against a uuid key)
    /// matches no row, so it is reported as `NotFound`.
    async fn rows_by_id<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<Vec<T>, StoreError> {
        match self.rows(req).await {
            Err(StoreError::Api {
                status: 400,
                code: Some(code),
                ..
            }) if code == INVALID_TEXT_REPRESENTATION => Err(StoreError::NotFound),
            other => other,
        }
    }
}

/// Postgres `invalid_text_representation`.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

fn id_filter(id: &str) -> String {
    format!("eq.{id}")
}

/// The `code` field of a PostgREST error body, if there is one.
fn error_code(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed.get("code")?.as_str().map(str::to_owned)
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn insert(&self, record: &NewWeatherRecord) -> Result<WeatherRecord, StoreError> {
        tracing::debug!(location = %record.location, "Inserting weather record");

        let req = self.returning(Method::POST).json(record);
        self.rows::<WeatherRecord>(req)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::EmptyResult)
    }

    async fn list_all(&self) -> Result<Vec<WeatherRecord>, StoreError> {
        let req = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        self.rows(req).await
    }

    async fn get_by_id(&self, id: &str) -> Result<WeatherRecord, StoreError> {
        let req = self
            .request(Method::GET)
            .query(&[("select", "*"), ("id", id_filter(id).as_str())]);
        self.rows_by_id::<WeatherRecord>(req)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(
        &self,
        id: &str,
        patch: &WeatherPatch,
    ) -> Result<WeatherRecord, StoreError> {
        tracing::debug!(id, "Updating weather record");

        let req = self
            .returning(Method::PATCH)
            .query(&[("id", id_filter(id))])
            .json(patch);
        self.rows_by_id::<WeatherRecord>(req)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        tracing::debug!(id, "Deleting weather record");

        let req = self
            .returning(Method::DELETE)
            .query(&[("id", id_filter(id))]);
        let deleted: Vec<Value> = self.rows_by_id(req).await?;

        if deleted.is_empty() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
