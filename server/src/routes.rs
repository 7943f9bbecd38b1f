use std::sync::Arc;

use atlas::AtlasError;
use atlas::aggregate::{AggLevel, RegionCount, aggregated_data, events_for_region};
use atlas::event::{Event, EventRow, EventType};
use atlas::geometry::load_geometry;
use atlas::region::canonical_province;
use axum::{
    Json,
    extract::{Query, State},
};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::{error::AppError, state::State as AppState};

#[derive(Deserialize)]
pub struct RegionsQuery {
    level: String,
    province: Option<String>,
    event_type: Option<EventType>,
}

pub async fn regions_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionsQuery>,
) -> Result<Json<Vec<RegionCount>>, AppError> {
    let events = filtered(&state, query.event_type).await;

    let counts = match query.level.as_str() {
        "country" => aggregated_data(&events, AggLevel::Country),
        "province" => {
            let province = province_param(query.province.as_deref())?;
            aggregated_data(&events, AggLevel::Province(province))
        }
        other => {
            return Err(AppError::MalformedRequest(format!("unknown level: {other}")));
        }
    };

    Ok(Json(counts))
}

#[derive(Deserialize)]
pub struct RegionEventsQuery {
    region: String,
    province: Option<String>,
    event_type: Option<EventType>,
}

pub async fn region_events_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionEventsQuery>,
) -> Result<Json<Vec<EventRow>>, AppError> {
    let events = filtered(&state, query.event_type).await;

    let level = match query.province.as_deref() {
        Some(raw) => AggLevel::Province(province_param(Some(raw))?),
        None => AggLevel::Country,
    };

    let rows = events_for_region(&events, level, &query.region)
        .into_iter()
        .map(EventRow::from)
        .collect();

    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct GeoQuery {
    code: String,
}

pub async fn geometry_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeoQuery>,
) -> Result<Json<Value>, AppError> {
    let code_format = Regex::new(r"^\d{6}$").unwrap();
    if !code_format.is_match(&query.code) {
        return Err(AppError::MalformedRequest(format!(
            "bad region code: {}",
            query.code
        )));
    }

    let asset = load_geometry(&state.geometry, &state.fetcher, &query.code).await?;

    Ok(Json(asset.raw.clone()))
}

async fn filtered(state: &AppState, event_type: Option<EventType>) -> Vec<Event> {
    let events = state.events.read().await;

    match event_type {
        Some(wanted) => events
            .iter()
            .filter(|event| event.event_type == wanted)
            .cloned()
            .collect(),
        None => events.clone(),
    }
}

fn province_param(raw: Option<&str>) -> Result<&'static str, AppError> {
    let raw = raw.ok_or_else(|| AppError::MalformedRequest("missing province".to_string()))?;

    canonical_province(raw).ok_or_else(|| AtlasError::UnknownRegion(raw.to_string()).into())
}
