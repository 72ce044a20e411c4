#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use suppliers_backend::{
    cache::{CacheError, CacheStore, InMemoryCache},
    common::error::AppError,
    db::SupplierStore,
    models::{
        listing::{Page, SortDirection, SortField, SupplierFilter, PER_PAGE},
        supplier::{
            Supplier, SupplierAddress, SupplierDetail, SupplierPayload, SupplierPhone,
            SupplierSummary,
        },
    },
    router, AppState,
};

// ============================================================================
// Store em memória com a mesma semântica do repositório Postgres
// ============================================================================

#[derive(Default)]
struct Tables {
    next_id: i64,
    suppliers: Vec<Supplier>,
    phones: Vec<(SupplierPhone, bool)>,
    addresses: Vec<SupplierAddress>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn active_phones(&self, supplier_id: i64) -> impl Iterator<Item = &SupplierPhone> {
        self.phones
            .iter()
            .filter(move |(p, deleted)| p.supplier_id == supplier_id && !deleted)
            .map(|(p, _)| p)
    }

    fn main_address(&self, supplier_id: i64) -> Option<SupplierAddress> {
        self.addresses
            .iter()
            .find(|a| a.supplier_id == supplier_id && a.is_main)
            .cloned()
    }

    fn insert_phones(&mut self, supplier_id: i64, payload: &SupplierPayload) {
        for phone in payload.normalized_phones() {
            let id = self.next_id();
            let now = Utc::now();
            self.phones.push((
                SupplierPhone {
                    id,
                    supplier_id,
                    number: phone.number,
                    is_main: phone.is_main,
                    created_at: now,
                    updated_at: now,
                },
                false,
            ));
        }
    }
}

#[derive(Default)]
pub struct InMemorySupplierStore {
    tables: Mutex<Tables>,
    list_calls: AtomicUsize,
    find_calls: AtomicUsize,
}

impl InMemorySupplierStore {
    pub fn supplier_count(&self) -> usize {
        self.tables.lock().unwrap().suppliers.len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn phone_rows_for(&self, supplier_id: i64) -> usize {
        self.tables
            .lock()
            .unwrap()
            .phones
            .iter()
            .filter(|(p, _)| p.supplier_id == supplier_id)
            .count()
    }
}

#[async_trait]
impl SupplierStore for InMemorySupplierStore {
    async fn list(&self, filter: &SupplierFilter) -> Result<Page<SupplierSummary>, AppError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().unwrap();

        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut rows: Vec<&Supplier> = tables
            .suppliers
            .iter()
            .filter(|s| s.deleted_at.is_none())
            .filter(|s| match &needle {
                Some(n) => [&s.name, &s.email, &s.document]
                    .iter()
                    .any(|field| field.to_lowercase().contains(n)),
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| {
            let ord = match filter.sort_by {
                SortField::Id => a.id.cmp(&b.id),
                SortField::Name => a.name.cmp(&b.name),
                SortField::Email => a.email.cmp(&b.email),
            };
            match filter.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = rows.len() as u64;
        let data = rows
            .into_iter()
            .skip(filter.offset() as usize)
            .take(PER_PAGE as usize)
            .map(|s| SupplierSummary {
                supplier: s.clone(),
                phone: tables
                    .active_phones(s.id)
                    .find(|p| p.is_main)
                    .map(|p| p.number.clone()),
                main_address: tables.main_address(s.id),
            })
            .collect();

        Ok(Page::new(data, total, filter.page, PER_PAGE))
    }

    async fn find(&self, id: i64) -> Result<Option<SupplierDetail>, AppError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().unwrap();

        let Some(supplier) = tables
            .suppliers
            .iter()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .cloned()
        else {
            return Ok(None);
        };

        let mut phones: Vec<SupplierPhone> = tables.active_phones(id).cloned().collect();
        phones.sort_by(|a, b| b.is_main.cmp(&a.is_main).then(a.id.cmp(&b.id)));

        Ok(Some(SupplierDetail {
            address: tables.main_address(id),
            supplier,
            phones,
        }))
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .suppliers
            .iter()
            .any(|s| s.email == email && Some(s.id) != except))
    }

    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let supplier = Supplier {
            id: tables.next_id(),
            name: payload.name.clone(),
            document: payload.document.clone(),
            document_type: payload.document_type.clone(),
            email: payload.email.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.suppliers.push(supplier.clone());
        tables.insert_phones(supplier.id, payload);

        let address_id = tables.next_id();
        let address = &payload.address;
        tables.addresses.push(SupplierAddress {
            id: address_id,
            supplier_id: supplier.id,
            is_main: true,
            cep: address.cep.clone(),
            street: address.street.clone(),
            number: address.number.clone(),
            complement: address.complement.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            neighborhood: address.neighborhood.clone(),
            reference: address.reference.clone(),
            created_at: now,
            updated_at: now,
        });

        Ok(supplier)
    }

    async fn update(&self, id: i64, payload: &SupplierPayload) -> Result<Option<Supplier>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(supplier) = tables
            .suppliers
            .iter_mut()
            .find(|s| s.id == id && s.deleted_at.is_none())
        else {
            return Ok(None);
        };

        supplier.name = payload.name.clone();
        supplier.document = payload.document.clone();
        supplier.document_type = payload.document_type.clone();
        supplier.email = payload.email.clone();
        supplier.updated_at = Utc::now();
        let updated = supplier.clone();

        for (phone, deleted) in tables.phones.iter_mut() {
            if phone.supplier_id == id {
                *deleted = true;
            }
        }
        tables.insert_phones(id, payload);

        if let Some(address) = tables
            .addresses
            .iter_mut()
            .find(|a| a.supplier_id == id && a.is_main)
        {
            let new = &payload.address;
            address.street = new.street.clone();
            address.number = new.number.clone();
            address.complement = new.complement.clone();
            address.neighborhood = new.neighborhood.clone();
            address.city = new.city.clone();
            address.state = new.state.clone();
            address.cep = new.cep.clone();
            address.reference = new.reference.clone();
        }

        Ok(Some(updated))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        match tables
            .suppliers
            .iter_mut()
            .find(|s| s.id == id && s.deleted_at.is_none())
        {
            Some(supplier) => {
                supplier.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ============================================================================
// Dublês de cache
// ============================================================================

/// Cache em memória que registra as chaves removidas explicitamente.
#[derive(Default)]
pub struct RecordingCache {
    inner: InMemoryCache,
    forgotten: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn forgotten(&self) -> Vec<String> {
        self.forgotten.lock().unwrap().clone()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.get(key).await.unwrap().is_some()
    }
}

#[async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.inner.put(key, value, ttl).await
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        self.forgotten.lock().unwrap().push(key.to_string());
        self.inner.forget(key).await
    }
}

/// Backend sempre fora do ar.
pub struct BrokenCache;

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn put(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn forget(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }
}

// ============================================================================
// Setup e helpers HTTP
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemorySupplierStore>,
    pub cache: Arc<RecordingCache>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemorySupplierStore::default());
    let cache = Arc::new(RecordingCache::default());
    let state = AppState::from_parts(store.clone(), cache.clone(), Duration::from_secs(600));

    TestApp {
        router: router(state),
        store,
        cache,
    }
}

pub fn app_with_cache(cache: Arc<dyn CacheStore>) -> (Router, Arc<InMemorySupplierStore>) {
    let store = Arc::new(InMemorySupplierStore::default());
    let state = AppState::from_parts(store.clone(), cache, Duration::from_secs(600));
    (router(state), store)
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(router, request).await
}

/// Envia um corpo cru (por exemplo JSON quebrado) como `application/json`.
pub async fn send_raw(router: &Router, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(raw.to_string()))
        .unwrap();
    dispatch(router, request).await
}

async fn dispatch(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

pub fn supplier_json(name: &str, email: &str) -> Value {
    serde_json::json!({
        "name": name,
        "document": "123",
        "document_type": "J",
        "email": email,
        "phones": [{ "number": "1111", "is_main": true }],
        "address": {
            "street": "Main St",
            "number": "1",
            "neighborhood": "Centro",
            "city": "SP",
            "state": "SP",
            "cep": "00000-000"
        }
    })
}

pub async fn create(router: &Router, name: &str, email: &str) -> i64 {
    let (status, body) = send(router, Method::POST, "/api/suppliers", Some(supplier_json(name, email))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().expect("id gerado")
}
