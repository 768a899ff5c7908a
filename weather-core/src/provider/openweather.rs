use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::{
    config::{DEFAULT_PROVIDER_BASE_URL, DEFAULT_UNITS},
    model::{CurrentWeather, ForecastWeather},
    truncate_body,
};

use super::{ProviderError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    async fn get_json(&self, endpoint: &str, location: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, location, "Requesting OpenWeather data");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ProviderError::LocationNotFound {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, ProviderError> {
        let payload = self.get_json("weather", location).await?;
        Ok(CurrentWeather::from_payload(payload)?)
    }

    async fn fetch_forecast(&self, location: &str) -> Option<ForecastWeather> {
        match self.get_json("forecast", location).await {
            Ok(payload) => Some(ForecastWeather { payload }),
            Err(e) => {
                tracing::warn!(location, error = %e, "OpenWeather forecast unavailable");
                None
            }
        }
    }
}
