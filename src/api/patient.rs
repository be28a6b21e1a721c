//! Patient API handlers.
//!
//! Plain pass-through to the service layer: validation, authentication,
//! and authorization have all run in the request pipeline already.

use crate::api::MessageResponse;
use crate::domain::{CreatePatientInput, StringUuid, UpdatePatientInput};
use crate::error::Result;
use crate::state::HasServices;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

pub async fn create<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<CreatePatientInput>,
) -> Result<impl IntoResponse> {
    let patient = state.patient_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let patients = state.patient_service().list().await?;
    Ok(Json(patients))
}

pub async fn get<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let patient = state.patient_service().get(StringUuid::from(id)).await?;
    Ok(Json(patient))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePatientInput>,
) -> Result<impl IntoResponse> {
    let patient = state
        .patient_service()
        .update(StringUuid::from(id), input)
        .await?;
    Ok(Json(patient))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.patient_service().delete(StringUuid::from(id)).await?;
    Ok(Json(MessageResponse::new("Patient deleted")))
}
