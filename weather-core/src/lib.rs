//! Core library for the weather records service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the weather provider (OpenWeatherMap)
//! - Abstraction over the record store (Supabase / PostgREST)
//! - Shared domain models and request validation
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;
pub mod store;
pub mod validate;

pub use config::Config;
pub use model::{
    CreateWeatherRequest, CurrentWeather, ForecastWeather, NewWeatherRecord, UpdateWeatherRequest,
    WeatherData, WeatherPatch, WeatherRecord,
};
pub use provider::{ProviderError, WeatherProvider};
pub use store::{RecordStore, StoreError};
pub use validate::{DateRange, ValidationError};

/// Cut an upstream error body down to something loggable.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_untouched() {
        assert_eq!(truncate_body("city not found"), "city not found");
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert_eq!(out.len(), 200 + 3);
    }
}
