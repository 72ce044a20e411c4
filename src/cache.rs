//! Camada de cache dos fornecedores.
//!
//! `CacheStore` é a capacidade injetada (get/put/forget + época da listagem),
//! `InMemoryCache` o backend padrão e `SupplierCache` a política em cima dele.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod inmemory;
pub mod keys;
pub mod supplier_cache;

pub use inmemory::InMemoryCache;
pub use supplier_cache::SupplierCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend failure: {0}")]
    Backend(String),

    #[error("corrupt cache entry under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

/// Armazenamento chave/valor com TTL.
///
/// Todos os métodos usam `&self`; implementações cuidam da própria mutabilidade
/// interna. Valores são strings (JSON serializado pelo chamador).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// `ttl = None` guarda sem expiração.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn forget(&self, key: &str) -> Result<(), CacheError>;

    /// Época atual da listagem, se já houver uma gravada.
    async fn epoch(&self) -> Result<Option<i64>, CacheError> {
        match self.get(keys::EPOCH_KEY).await? {
            Some(raw) => raw.parse::<i64>().map(Some).map_err(|e| CacheError::Corrupt {
                key: keys::EPOCH_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(None),
        }
    }

    async fn set_epoch(&self, epoch: i64) -> Result<(), CacheError> {
        self.put(keys::EPOCH_KEY, epoch.to_string(), None).await
    }
}
