// src/services/supplier_service.rs

use std::sync::Arc;

use crate::{
    cache::{keys, SupplierCache},
    common::error::AppError,
    db::SupplierStore,
    models::{
        listing::{Page, SupplierFilter},
        supplier::{Supplier, SupplierDetail, SupplierPayload, SupplierSummary},
    },
};

#[derive(Clone)]
pub struct SupplierService {
    store: Arc<dyn SupplierStore>,
    cache: SupplierCache,
}

impl SupplierService {
    pub fn new(store: Arc<dyn SupplierStore>, cache: SupplierCache) -> Self {
        Self { store, cache }
    }

    // =========================================================================
    //  LEITURAS (com cache)
    // =========================================================================

    pub async fn list(&self, filter: SupplierFilter) -> Result<Page<SupplierSummary>, AppError> {
        let epoch = self.cache.listing_epoch().await;
        let key = keys::listing_key(epoch, &filter);

        self.cache
            .remember(&key, || async { self.store.list(&filter).await })
            .await
    }

    pub async fn show(&self, id: i64) -> Result<SupplierDetail, AppError> {
        let key = keys::detail_key(id);

        self.cache
            .remember(&key, || async {
                self.store.find(id).await?.ok_or(AppError::NotFound)
            })
            .await
    }

    // =========================================================================
    //  ESCRITAS (invalidam o cache)
    // =========================================================================

    // O payload já chega validado pelos handlers; aqui só a unicidade do e-mail,
    // que depende do banco.
    pub async fn create(&self, payload: &SupplierPayload) -> Result<Supplier, AppError> {
        if self.store.email_taken(&payload.email, None).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        let supplier = self.store.create(payload).await?;
        tracing::info!(supplier_id = supplier.id, "Fornecedor cadastrado");

        self.cache.bump_epoch().await;
        Ok(supplier)
    }

    pub async fn update(&self, id: i64, payload: &SupplierPayload) -> Result<Supplier, AppError> {
        if self.store.email_taken(&payload.email, Some(id)).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        let supplier = self
            .store
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::MissingForWrite(id.to_string()))?;
        tracing::info!(supplier_id = id, "Fornecedor atualizado");

        self.cache.forget_detail(id).await;
        self.cache.bump_epoch().await;
        Ok(supplier)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::MissingForWrite(id.to_string()));
        }
        tracing::info!(supplier_id = id, "Fornecedor excluído");

        self.cache.forget_detail(id).await;
        self.cache.bump_epoch().await;
        Ok(())
    }
}
