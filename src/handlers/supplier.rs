// src/handlers/supplier.rs

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    models::{
        listing::{ListQuery, Page, SupplierFilter},
        supplier::{Supplier, SupplierDetail, SupplierPayload, SupplierSummary},
    },
};

// Id não numérico se comporta como registro inexistente
fn supplier_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

// Nas escritas, id inexistente (numérico ou não) é falha genérica, não 404
fn writable_supplier_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::MissingForWrite(raw.to_string()))
}

// Corpo ilegível vira erro de validação (422), já no envelope padrão
fn validated(
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<SupplierPayload, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    payload.validate()?;
    Ok(payload)
}

// GET /api/suppliers
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    params(ListQuery),
    responses(
        (status = 200, description = "Página de fornecedores", body = ApiResponse<Page<SupplierSummary>>),
        (status = 500, description = "Falha inesperada")
    )
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Page<SupplierSummary>>, AppError> {
    let page = app_state
        .supplier_service
        .list(SupplierFilter::from(query))
        .await?;

    Ok(ApiResponse::ok("Suppliers retrieved successfully", page))
}

// POST /api/suppliers
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = SupplierPayload,
    responses(
        (status = 200, description = "Fornecedor cadastrado", body = ApiResponse<Supplier>),
        (status = 422, description = "Dados inválidos ou e-mail já cadastrado"),
        (status = 500, description = "Falha inesperada")
    )
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<ApiResponse<Supplier>, AppError> {
    let payload = validated(payload)?;

    let supplier = app_state.supplier_service.create(&payload).await?;

    Ok(ApiResponse::ok("Supplier registered successfully", supplier))
}

// GET /api/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = i64, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor com telefones e endereço principal", body = ApiResponse<SupplierDetail>),
        (status = 404, description = "Fornecedor não encontrado ou excluído")
    )
)]
pub async fn show_supplier(
    State(app_state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<SupplierDetail>, AppError> {
    let id = supplier_id(path)?;

    let supplier = app_state.supplier_service.show(id).await?;

    Ok(ApiResponse::ok("Supplier retrieved successfully", supplier))
}

// PUT /api/suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = i64, Path, description = "ID do fornecedor")),
    request_body = SupplierPayload,
    responses(
        (status = 200, description = "Fornecedor atualizado", body = ApiResponse<Supplier>),
        (status = 422, description = "Dados inválidos ou e-mail já cadastrado"),
        (status = 500, description = "Fornecedor inexistente ou falha inesperada")
    )
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<ApiResponse<Supplier>, AppError> {
    let payload = validated(payload)?;
    let id = writable_supplier_id(&raw_id)?;

    let supplier = app_state.supplier_service.update(id, &payload).await?;

    Ok(ApiResponse::ok("Supplier updated successfully", supplier))
}

// DELETE /api/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = i64, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor excluído (lógico)"),
        (status = 500, description = "Fornecedor inexistente ou falha inesperada")
    )
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    let id = writable_supplier_id(&raw_id)?;

    app_state.supplier_service.delete(id).await?;

    Ok(ApiResponse::message("Supplier deleted successfully"))
}
