use crate::{
    Config,
    model::{CurrentWeather, ForecastWeather},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status, typically an unknown city.
    #[error("Weather provider returned status {status}: {body}")]
    LocationNotFound { status: u16, body: String },

    #[error("Failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse weather provider JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `location`. Any failure is an error.
    async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, ProviderError>;

    /// 5-day forecast for `location`. Failures are logged and yield `None`.
    async fn fetch_forecast(&self, location: &str) -> Option<ForecastWeather>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.provider_api_key()?;

    let provider = OpenWeatherProvider::new(api_key.to_owned())
        .with_base_url(&config.provider.base_url)
        .with_units(&config.provider.units);

    Ok(Arc::new(provider))
}
