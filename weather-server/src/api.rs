//! Route handlers and router construction.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use weather_core::{
    CreateWeatherRequest, DateRange, NewWeatherRecord, RecordStore, UpdateWeatherRequest,
    WeatherData, WeatherProvider, WeatherRecord,
    validate::{validate_range, validate_update},
};

use crate::error::ApiError;

/// Dependencies shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn RecordStore>) -> Self {
        Self { provider, store }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse<T> {
    pub message: &'static str,
    pub data: T,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/create-weather/", post(create_weather))
        .route("/weather/", get(list_weather))
        .route(
            "/weather/{id}",
            get(get_weather).put(update_weather).delete(delete_weather),
        )
        .layer(TraceLayer::new_for_http())
        // Any origin, method and header, credentials included.
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Weather API is running",
    })
}

async fn create_weather(
    State(state): State<AppState>,
    body: Result<Json<CreateWeatherRequest>, JsonRejection>,
) -> Result<Json<SavedResponse<WeatherRecord>>, ApiError> {
    let Json(req) = body?;
    let range = validate_range(&req.start_date, &req.end_date)?;

    let current = state.provider.fetch_current(&req.location).await?;
    let forecast = state.provider.fetch_forecast(&req.location).await;

    let record = NewWeatherRecord {
        lat: current.coord.lat.or(req.lat),
        lon: current.coord.lon.or(req.lon),
        location: req.location,
        start_date: range.start,
        end_date: range.end,
        weather_data: WeatherData::new(current, forecast),
    };

    let saved = state.store.insert(&record).await?;
    tracing::info!(id = %saved.id, location = %saved.location, "Weather record created");

    Ok(Json(SavedResponse {
        message: "Weather data saved successfully",
        data: saved,
    }))
}

async fn list_weather(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<WeatherRecord>>>, ApiError> {
    let records = state.store.list_all().await?;
    Ok(Json(DataResponse { data: records }))
}

async fn get_weather(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<WeatherRecord>>, ApiError> {
    let record = state.store.get_by_id(&id).await?;
    Ok(Json(DataResponse { data: record }))
}

async fn update_weather(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateWeatherRequest>, JsonRejection>,
) -> Result<Json<SavedResponse<WeatherRecord>>, ApiError> {
    let Json(update) = body?;
    let existing = state.store.get_by_id(&id).await?;
    let stored = DateRange {
        start: existing.start_date,
        end: existing.end_date,
    };
    let mut patch = validate_update(&update, stored)?;

    // Only current conditions are refreshed; the stored forecast is kept as is.
    if let Some(location) = patch.location.clone() {
        match state.provider.fetch_current(&location).await {
            Ok(current) => {
                if let Some(lat) = current.coord.lat {
                    patch.lat = Some(lat);
                }
                if let Some(lon) = current.coord.lon {
                    patch.lon = Some(lon);
                }
                patch.weather_data = Some(existing.weather_data.with_current(current));
            }
            Err(e) => {
                tracing::warn!(%id, %location, error = %e, "Keeping previous weather data");
            }
        }
    }

    let updated = state.store.update_by_id(&id, &patch).await?;
    tracing::info!(%id, "Weather record updated");

    Ok(Json(SavedResponse {
        message: "Weather record updated successfully",
        data: updated,
    }))
}

async fn delete_weather(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.get_by_id(&id).await?;
    state.store.delete_by_id(&id).await?;
    tracing::info!(%id, "Weather record deleted");

    Ok(Json(MessageResponse {
        message: "Weather record deleted successfully",
    }))
}
