//! Prediction Route

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, Timelike, Utc};
use feature_engine::FeatureEngine;
use market_frame::{schema, Frame, Source};
use regressor::feature_columns;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Request body for the predict endpoint
#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    /// Interval to score; the latest available interval when omitted
    pub timestamp_utc: Option<DateTime<Utc>>,
}

/// Response body for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// Interval actually scored
    pub timestamp_utc: DateTime<Utc>,
    /// Model output in $/MWh
    pub predicted_lmp: f64,
    /// Feature columns fed to the model
    pub features_used: Vec<String>,
}

/// Score one interval of the latest processed data
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let features = latest_features(&state)?;
    if features.is_empty() {
        return Err(ApiError::Unavailable(
            "no feature rows available yet".to_string(),
        ));
    }

    let row = select_row(&features, request.timestamp_utc)?;
    let times = features.timestamps(schema::TIMESTAMP)?;
    let timestamp = times[row]
        .ok_or_else(|| ApiError::Internal("selected feature row lacks a timestamp".to_string()))?;

    let features_used = feature_columns(&features);
    let predicted_lmp = state.forecaster.predict_row(&features, row);
    debug!(%timestamp, predicted_lmp, "scored interval");

    Ok(Json(PredictionResponse {
        timestamp_utc: timestamp,
        predicted_lmp,
        features_used,
    }))
}

/// Latest processed file, filtered to real-time prices, with features built
fn latest_features(state: &AppState) -> Result<Frame, ApiError> {
    let path = ingestion::latest_processed(
        &state.config.processed_dir,
        &state.config.processed_prefix,
    )?
    .ok_or_else(|| ApiError::Unavailable("no processed files available yet".to_string()))?;

    let frame = ingestion::read_csv(&path)?;
    let sources = frame.texts(schema::SOURCE)?.to_vec();
    let rt = frame.filter_rows(|row| sources[row].as_deref() == Some(Source::RtLmp.as_str()));

    let engine = FeatureEngine::new(state.feature_config.clone());
    Ok(engine.build_features(&rt)?)
}

/// Pick the feature row to score. The frame is sorted ascending and the
/// caller guarantees it has rows.
///
/// A requested timestamp floors to its 5-minute boundary, then matches
/// exactly, then the nearest row within 10 minutes; anything else (and an
/// absent request) scores the latest row.
fn select_row(features: &Frame, requested: Option<DateTime<Utc>>) -> Result<usize, ApiError> {
    let times = features.timestamps(schema::TIMESTAMP)?;
    let last = features.len() - 1;
    let Some(requested) = requested else {
        return Ok(last);
    };

    let target = floor_to_five_minutes(requested);
    if let Some(row) = times.iter().position(|t| *t == Some(target)) {
        return Ok(row);
    }

    let nearest = times
        .iter()
        .enumerate()
        .filter_map(|(row, t)| t.map(|t| (row, (t - target).abs())))
        .min_by_key(|(_, distance)| *distance);
    if let Some((row, distance)) = nearest {
        if distance <= Duration::minutes(10) {
            return Ok(row);
        }
    }
    Ok(last)
}

fn floor_to_five_minutes(ts: DateTime<Utc>) -> DateTime<Utc> {
    let trimmed = ts
        - Duration::seconds(i64::from(ts.second()))
        - Duration::nanoseconds(i64::from(ts.nanosecond()));
    trimmed - Duration::minutes(i64::from(trimmed.minute() % 5))
}
