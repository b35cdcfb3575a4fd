use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use catalog::{FilterCriteria, NewStack, Nootropic, ResolvedStack, StackPatch};
use serde::Deserialize;

use crate::{error::AppError, search::SearchParams, state::AppState, utils::Payload};

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub rating: i64,
    #[serde(default)]
    pub review: Option<String>,
}

pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "Nootropic Nexus API is running")
}

pub async fn list_nootropics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Nootropic>>, AppError> {
    let criteria = FilterCriteria::from(params);

    Ok(Json(state.nootropics.search(&criteria).await?))
}

pub async fn get_nootropic_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Nootropic>, AppError> {
    state
        .nootropics
        .get_by_name(&name)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Nootropic"))
}

pub async fn create_nootropic_handler(
    State(state): State<Arc<AppState>>,
    Payload(nootropic): Payload<Nootropic>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.nootropics.create(nootropic).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_stacks_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ResolvedStack>>, AppError> {
    Ok(Json(state.stacks.list_all().await?))
}

pub async fn get_stack_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedStack>, AppError> {
    state
        .stacks
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Stack"))
}

pub async fn create_stack_handler(
    State(state): State<Arc<AppState>>,
    Payload(draft): Payload<NewStack>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.stacks.create(draft).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_stack_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Payload(patch): Payload<StackPatch>,
) -> Result<Json<ResolvedStack>, AppError> {
    state
        .stacks
        .update(&id, patch)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Stack"))
}

pub async fn rate_stack_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Payload(request): Payload<RatingRequest>,
) -> Result<Json<ResolvedStack>, AppError> {
    state
        .stacks
        .rate(&id, request.rating, request.review)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Stack"))
}
