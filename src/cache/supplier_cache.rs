// src/cache/supplier_cache.rs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use super::{keys, CacheStore};
use crate::common::error::AppError;

/// TTL padrão de qualquer entrada: 10 minutos.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Política de cache dos fornecedores em cima de um `CacheStore` qualquer.
///
/// O cache é "melhor esforço": falhas do backend viram `warn` e a operação
/// segue direto no banco. Nunca transformam uma leitura em erro.
#[derive(Clone)]
pub struct SupplierCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl SupplierCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Época atual. Sem época gravada, usa o relógio e grava o valor para que
    /// as chaves fiquem estáveis até a próxima escrita.
    pub async fn listing_epoch(&self) -> i64 {
        match self.store.epoch().await {
            Ok(Some(epoch)) => epoch,
            Ok(None) => {
                let epoch = now_millis();
                if let Err(e) = self.store.set_epoch(epoch).await {
                    tracing::warn!("Falha ao gravar a época inicial da listagem: {}", e);
                }
                epoch
            }
            Err(e) => {
                tracing::warn!("Falha ao ler a época da listagem: {}", e);
                now_millis()
            }
        }
    }

    /// Invalida todas as páginas da listagem de uma vez.
    /// A nova época é sempre estritamente maior que a anterior.
    pub async fn bump_epoch(&self) -> i64 {
        let previous = match self.store.epoch().await {
            Ok(epoch) => epoch.unwrap_or(0),
            Err(e) => {
                tracing::warn!("Época ilegível, recomeçando pelo relógio: {}", e);
                0
            }
        };

        let next = now_millis().max(previous.saturating_add(1));
        match self.store.set_epoch(next).await {
            Ok(()) => tracing::debug!(epoch = next, "Época da listagem avançada"),
            Err(e) => tracing::warn!("Falha ao avançar a época da listagem: {}", e),
        }
        next
    }

    pub async fn forget_detail(&self, id: i64) {
        let key = keys::detail_key(id);
        match self.store.forget(&key).await {
            Ok(()) => tracing::debug!(%key, "Detalhe removido do cache"),
            Err(e) => tracing::warn!(%key, "Falha ao remover detalhe do cache: {}", e),
        }
    }

    /// Devolve o valor em cache ou calcula, grava com TTL e devolve.
    /// Erros de `compute` não são guardados.
    pub async fn remember<T, F, Fut>(&self, key: &str, compute: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    tracing::debug!(%key, "Cache HIT");
                    return Ok(value);
                }
                Err(e) => tracing::warn!(%key, "Entrada de cache ilegível, recalculando: {}", e),
            },
            Ok(None) => tracing::debug!(%key, "Cache MISS"),
            Err(e) => tracing::warn!(%key, "Falha ao ler o cache: {}", e),
        }

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(raw) => {
                if let Err(e) = self.store.put(key, raw, Some(self.ttl)).await {
                    tracing::warn!(%key, "Falha ao gravar no cache: {}", e);
                }
            }
            Err(e) => tracing::warn!(%key, "Falha ao serializar para o cache: {}", e),
        }

        Ok(value)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
