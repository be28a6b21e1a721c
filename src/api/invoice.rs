//! Invoice (billing) API handlers

use crate::api::MessageResponse;
use crate::domain::{CreateInvoiceInput, StringUuid, UpdateInvoiceInput};
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
    Json(input): Json<CreateInvoiceInput>,
) -> Result<impl IntoResponse> {
    let invoice = state.invoice_service().create(input).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn list<S: HasServices>(State(state): State<S>) -> Result<impl IntoResponse> {
    let invoices = state.invoice_service().list().await?;
    Ok(Json(invoices))
}

pub async fn update<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateInvoiceInput>,
) -> Result<impl IntoResponse> {
    let invoice = state
        .invoice_service()
        .update(StringUuid::from(id), input)
        .await?;
    Ok(Json(invoice))
}

pub async fn delete<S: HasServices>(
    State(state): State<S>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.invoice_service().delete(StringUuid::from(id)).await?;
    Ok(Json(MessageResponse::new("Invoice deleted")))
}
