// src/db/supplier_repo.rs
//
// Consultas em tempo de execução (`query_as` + `FromRow`) em vez de `query_as!`:
// o build não depende de um banco acessível nem de cache `.sqlx`, e a listagem
// monta ORDER BY/WHERE dinâmicos com `QueryBuilder`, que as macros não cobrem.
// As listas de colunas abaixo precisam acompanhar as migrações.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    common::error::AppError,
    db::SupplierStore,
    models::{
        listing::{Page, SortField, SupplierFilter, PER_PAGE},
        supplier::{
            AddressPayload, NewPhone, Supplier, SupplierAddress, SupplierDetail,
            SupplierPayload, SupplierPhone, SupplierSummary,
        },
    },
};

const SUPPLIER_COLUMNS: &str =
    "s.id, s.name, s.document, s.document_type, s.email, s.created_at, s.updated_at, s.deleted_at";

const PHONE_COLUMNS: &str = "id, supplier_id, number, is_main, created_at, updated_at";

const ADDRESS_COLUMNS: &str = "id, supplier_id, is_main, cep, street, number, complement, \
     city, state, neighborhood, reference, created_at, updated_at";

// O repositório de fornecedores: tabelas suppliers, supplier_phones e supplier_addresses
#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_phones(
        tx: &mut Transaction<'_, Postgres>,
        supplier_id: i64,
        phones: &[NewPhone],
    ) -> Result<(), AppError> {
        for phone in phones {
            sqlx::query(
                "INSERT INTO supplier_phones (supplier_id, number, is_main) VALUES ($1, $2, $3)",
            )
            .bind(supplier_id)
            .bind(&phone.number)
            .bind(phone.is_main)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

// ---
// Construtor de predicados da listagem
// ---

/// Escapa os curingas do LIKE e envolve o termo em `%...%` (busca por substring literal).
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// WHERE da listagem: só ativos e, se houver busca, nome OU e-mail OU documento.
pub fn push_filter_predicate(qb: &mut QueryBuilder<'static, Postgres>, filter: &SupplierFilter) {
    qb.push(" WHERE s.deleted_at IS NULL");

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        qb.push(" AND (s.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR s.document ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub fn build_list_query(filter: &SupplierFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SUPPLIER_COLUMNS} FROM suppliers s"));
    push_filter_predicate(&mut qb, filter);

    // Coluna e direção vêm de enums fechados, nunca da entrada crua
    qb.push(format_args!(
        " ORDER BY s.{} {}",
        filter.sort_by.column(),
        filter.direction.as_sql()
    ));
    if filter.sort_by != SortField::Id {
        qb.push(", s.id ASC");
    }

    qb.push(" LIMIT ")
        .push_bind(i64::from(PER_PAGE))
        .push(" OFFSET ")
        .push_bind(filter.offset());
    qb
}

pub fn build_count_query(filter: &SupplierFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM suppliers s");
    push_filter_predicate(&mut qb, filter);
    qb
}

#[async_trait]
impl SupplierStore for SupplierRepository {
    async fn list(&self, filter: &SupplierFilter) -> Result<Page<SupplierSummary>, AppError> {
        let total: i64 = build_count_query(filter)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let suppliers: Vec<Supplier> = build_list_query(filter)
            .build_query_as::<Supplier>()
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i64> = suppliers.iter().map(|s| s.id).collect();

        let main_phones: Vec<SupplierPhone> = sqlx::query_as(&format!(
            "SELECT {PHONE_COLUMNS} FROM supplier_phones \
             WHERE supplier_id = ANY($1) AND is_main AND deleted_at IS NULL \
             ORDER BY id ASC"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let main_addresses: Vec<SupplierAddress> = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM supplier_addresses \
             WHERE supplier_id = ANY($1) AND is_main AND deleted_at IS NULL \
             ORDER BY id ASC"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        // Primeiro principal de cada fornecedor
        let mut phone_by_supplier: HashMap<i64, String> = HashMap::new();
        for phone in main_phones {
            phone_by_supplier.entry(phone.supplier_id).or_insert(phone.number);
        }
        let mut address_by_supplier: HashMap<i64, SupplierAddress> = HashMap::new();
        for address in main_addresses {
            address_by_supplier.entry(address.supplier_id).or_insert(address);
        }

        let data = suppliers
            .into_iter()
            .map(|supplier| SupplierSummary {
                phone: phone_by_supplier.remove(&supplier.id),
                main_address: address_by_supplier.remove(&supplier.id),
                supplier,
            })
            .collect();

        Ok(Page::new(data, total.max(0) as u64, filter.page, PER_PAGE))
    }

    async fn find(&self, id: i64) -> Result<Option<SupplierDetail>, AppError> {
        let supplier: Option<Supplier> = sqlx::query_as(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers s WHERE s.id = $1 AND s.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(supplier) = supplier else {
            return Ok(None);
        };

        let phones: Vec<SupplierPhone> = sqlx::query_as(&format!(
            "SELECT {PHONE_COLUMNS} FROM supplier_phones \
             WHERE supplier_id = $1 AND deleted_at IS NULL \
             ORDER BY is_main DESC, id ASC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let address: Option<SupplierAddress> = sqlx::query_as(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM supplier_addresses \
             WHERE supplier_id = $1 AND is_main AND deleted_at IS NULL \
             ORDER BY id ASC LIMIT 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(SupplierDetail {
            supplier,
            phones,
            address,
        }))
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM suppliers WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn create(&self, payload: &SupplierPayload) -> Result<Supplier, AppError> {
        let mut tx = self.pool.begin().await?;

        let supplier: Supplier = sqlx::query_as(
            "INSERT INTO suppliers (name, document, document_type, email) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, document, document_type, email, created_at, updated_at, deleted_at",
        )
        .bind(&payload.name)
        .bind(&payload.document)
        .bind(&payload.document_type)
        .bind(&payload.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_email)?;

        Self::insert_phones(&mut tx, supplier.id, &payload.normalized_phones()).await?;
        insert_main_address(&mut tx, supplier.id, &payload.address).await?;

        tx.commit().await?;
        Ok(supplier)
    }

    async fn update(&self, id: i64, payload: &SupplierPayload) -> Result<Option<Supplier>, AppError> {
        let mut tx = self.pool.begin().await?;

        let supplier: Option<Supplier> = sqlx::query_as(
            "UPDATE suppliers SET name = $2, document = $3, document_type = $4, email = $5, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING id, name, document, document_type, email, created_at, updated_at, deleted_at",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.document)
        .bind(&payload.document_type)
        .bind(&payload.email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_unique_email)?;

        // Sem fornecedor: o drop da transação faz o rollback
        let Some(supplier) = supplier else {
            return Ok(None);
        };

        // Telefones: apaga todos (lógico) e recria, sem diff
        sqlx::query(
            "UPDATE supplier_phones SET deleted_at = NOW(), updated_at = NOW() \
             WHERE supplier_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        Self::insert_phones(&mut tx, id, &payload.normalized_phones()).await?;

        // Endereço: só o principal, no lugar. Sem principal, nada muda.
        let address = &payload.address;
        sqlx::query(
            "UPDATE supplier_addresses SET street = $2, number = $3, complement = $4, \
             neighborhood = $5, city = $6, state = $7, cep = $8, reference = $9, updated_at = NOW() \
             WHERE supplier_id = $1 AND is_main AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(&address.street)
        .bind(&address.number)
        .bind(&address.complement)
        .bind(&address.neighborhood)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.cep)
        .bind(&address.reference)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(supplier))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        // Telefones e endereços ficam como estão (sem cascata)
        let result = sqlx::query(
            "UPDATE suppliers SET deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn insert_main_address(
    tx: &mut Transaction<'_, Postgres>,
    supplier_id: i64,
    address: &AddressPayload,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO supplier_addresses \
         (supplier_id, is_main, street, number, complement, neighborhood, city, state, cep, reference) \
         VALUES ($1, TRUE, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(supplier_id)
    .bind(&address.street)
    .bind(&address.number)
    .bind(&address.complement)
    .bind(&address.neighborhood)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.cep)
    .bind(&address.reference)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// Corrida contra a checagem prévia: a constraint UNIQUE vira o mesmo erro de validação
fn map_unique_email(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::EmailAlreadyExists;
        }
    }
    e.into()
}
