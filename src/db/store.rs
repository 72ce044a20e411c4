// src/db/store.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        listing::{Page, SupplierFilter},
        supplier::{Supplier, SupplierDetail, SupplierPayload, SupplierSummary},
    },
};

/// Porta de persistência dos fornecedores.
///
/// Registros com `deleted_at` preenchido nunca aparecem em `list`/`find`.
#[async_trait]
pub trait SupplierStore: Send + Sync {
    async fn list(&self, filter: &SupplierFilter) -> Result<Page<SupplierSummary>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<SupplierDetail>, AppError>;

    /// Verifica o e-mail em todas as linhas (inclusive excluídas), ignorando `except`.
    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, AppError>;

    /// Grava fornecedor, telefones e o endereço (sempre principal) numa transação.
    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier, AppError>;

    /// Sobrescreve os escalares, recria os telefones e atualiza o endereço principal.
    /// `None` quando o fornecedor não existe.
    async fn update(&self, id: i64, payload: &SupplierPayload) -> Result<Option<Supplier>, AppError>;

    /// Exclusão lógica do fornecedor apenas. `false` quando não existe.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;
}
