//! Appointment API handlers

use crate::api::MessageResponse;
use crate::domain::{CreateAppointmentInput, StringUuid, UpdateAppointmentInput};
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
    Json(input): Json<CreateAppointmentInput>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointment_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let appointments = state.appointment_service().list().await?;
    Ok(Json(appointments))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAppointmentInput>,
) -> Result<impl IntoResponse> {
    let appointment = state
        .appointment_service()
        .update(StringUuid::from(id), input)
        .await?;
    Ok(Json(appointment))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state
        .appointment_service()
        .delete(StringUuid::from(id))
        .await?;
    Ok(Json(MessageResponse::new("Appointment deleted")))
}
