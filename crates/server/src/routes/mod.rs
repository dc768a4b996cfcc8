use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Json, Response},
};
use neon_sign_lib::export::build_glb;
use neon_sign_lib::{NeonResult, SceneContext, SignGenerator};
use serde_json::{json, Value};
use shared::{SignRequest, SignSummary};

use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Generate into a fresh scene
fn generate(generator: &SignGenerator, request: &SignRequest) -> NeonResult<(SceneContext, SignSummary)> {
    let mut scene = SceneContext::new();
    let summary = generator.create_text(&mut scene, request)?;
    Ok((scene, summary))
}

/// Sign request -> GLB binary
pub async fn sign_glb(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Result<Response, StatusCode> {
    let generator = state.generator.clone();
    let glb_bytes = tokio::task::spawn_blocking(move || {
        let (scene, _) = generate(&generator, &request)?;
        build_glb(&scene)
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    .map_err(|e| {
        tracing::error!("Sign error: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "model/gltf-binary")
        .header(header::CONTENT_DISPOSITION, "inline; filename=\"sign.glb\"")
        .body(Body::from(glb_bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Sign request -> JSON summary of the generated objects
pub async fn inspect(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignSummary>, StatusCode> {
    let generator = state.generator.clone();
    let summary = tokio::task::spawn_blocking(move || generate(&generator, &request).map(|(_, s)| s))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|e| {
            tracing::error!("Inspect error: {}", e);
            StatusCode::BAD_REQUEST
        })?;

    Ok(Json(summary))
}
