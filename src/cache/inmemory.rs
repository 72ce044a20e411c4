// src/cache/inmemory.rs

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CacheError, CacheStore};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// Backend em memória do processo.
///
/// Entradas vencidas somem no acesso e também numa varredura feita pelo `put`
/// assim que o vencimento mais próximo passa. Chaves que nunca mais são lidas
/// (páginas de uma época antiga, buscas avulsas) não ficam acumulando.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    store: Arc<DashMap<String, CacheEntry>>,
    // Menor `expires_at` entre as entradas guardadas
    next_expiry: Arc<Mutex<Option<Instant>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de entradas guardadas, incluindo as vencidas ainda não acessadas.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Remove tudo o que já venceu, se o vencimento mais próximo já passou.
    fn sweep_expired(&self) {
        let mut next_expiry = self.next_expiry.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if !next_expiry.is_some_and(|at| at <= now) {
            return;
        }

        let mut earliest: Option<Instant> = None;
        self.store.retain(|_, entry| match entry.expires_at {
            Some(at) if at <= now => false,
            Some(at) => {
                earliest = Some(earliest.map_or(at, |e| e.min(at)));
                true
            }
            None => true,
        });
        *next_expiry = earliest;
    }

    fn track_expiry(&self, at: Instant) {
        let mut next_expiry = self.next_expiry.lock().unwrap_or_else(|e| e.into_inner());
        *next_expiry = Some(next_expiry.map_or(at, |e| e.min(at)));
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                return Ok(Some(entry.value.clone()));
            }
        }

        // O guard do `get` acima já foi solto aqui, então remover não trava o shard
        self.store.remove_if(key, |_, entry| entry.is_expired());
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.sweep_expired();

        let expires_at = ttl.map(|d| Instant::now() + d);
        self.store.insert(key.to_string(), CacheEntry { value, expires_at });
        if let Some(at) = expires_at {
            self.track_expiry(at);
        }
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key);
        Ok(())
    }
}
