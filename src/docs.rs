// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Suppliers ---
        handlers::supplier::list_suppliers,
        handlers::supplier::create_supplier,
        handlers::supplier::show_supplier,
        handlers::supplier::update_supplier,
        handlers::supplier::delete_supplier,
    ),
    components(
        schemas(
            // --- Registros ---
            models::supplier::Supplier,
            models::supplier::SupplierPhone,
            models::supplier::SupplierAddress,

            // --- Respostas ---
            models::supplier::SupplierSummary,
            models::supplier::SupplierDetail,

            // --- Payloads ---
            models::supplier::SupplierPayload,
            models::supplier::PhonePayload,
            models::supplier::AddressPayload,
        )
    ),
    tags(
        (name = "Suppliers", description = "Cadastro de Fornecedores, Telefones e Endereços")
    )
)]
pub struct ApiDoc;
