// src/models/supplier.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// --- REGISTROS (tabelas) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Supplier {
    pub id: i64,
    #[schema(example = "Acme Ltd")]
    pub name: String,
    #[schema(example = "12345678000199")]
    pub document: String,
    // 'J' (jurídica) ou 'F' (física)
    #[schema(example = "J")]
    pub document_type: String,
    #[schema(example = "contato@acme.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupplierPhone {
    pub id: i64,
    pub supplier_id: i64,
    #[schema(example = "(11) 99999-0000")]
    pub number: String,
    pub is_main: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupplierAddress {
    pub id: i64,
    pub supplier_id: i64,
    pub is_main: bool,
    #[schema(example = "01001-000")]
    pub cep: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub city: String,
    #[schema(example = "SP")]
    pub state: String,
    pub neighborhood: String,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- VISÕES (respostas) ---

/// Item da listagem: só o telefone principal e o endereço principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierSummary {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub phone: Option<String>,
    pub main_address: Option<SupplierAddress>,
}

/// Detalhe: todos os telefones (principal primeiro) e o endereço principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub phones: Vec<SupplierPhone>,
    pub address: Option<SupplierAddress>,
}

// --- PAYLOADS (entrada) ---
//
// Campos ausentes caem no default e são barrados pelo `validate()`, para que
// cada um apareça com a própria mensagem em `errors`.

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SupplierPayload {
    #[validate(length(min = 1, max = 255, message = "The name field is required and may not be greater than 255 characters."))]
    #[schema(example = "Acme Ltd")]
    pub name: String,

    #[validate(length(min = 1, message = "The document field is required."))]
    #[schema(example = "123")]
    pub document: String,

    #[validate(length(equal = 1, message = "The document type field must be a single character."))]
    #[schema(example = "J")]
    pub document_type: String,

    #[validate(
        length(min = 1, message = "The email field is required."),
        email(message = "The email field must be a valid email address.")
    )]
    #[schema(example = "a@acme.com")]
    pub email: String,

    #[validate(length(min = 1, message = "The phones field is required."), nested)]
    pub phones: Vec<PhonePayload>,

    #[validate(nested)]
    pub address: AddressPayload,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct PhonePayload {
    #[validate(length(min = 1, message = "The phone number field is required."))]
    #[schema(example = "1111")]
    pub number: String,
    #[validate(required(message = "The phone is_main field is required."))]
    pub is_main: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AddressPayload {
    #[validate(length(min = 1, message = "The address.street field is required."))]
    pub street: String,
    #[validate(length(min = 1, message = "The address.number field is required."))]
    pub number: String,
    pub complement: Option<String>,
    #[validate(length(min = 1, message = "The address.neighborhood field is required."))]
    pub neighborhood: String,
    #[validate(length(min = 1, message = "The address.city field is required."))]
    pub city: String,
    #[validate(length(equal = 2, message = "The address.state field must be 2 characters."))]
    pub state: String,
    #[validate(length(min = 1, message = "The address.cep field is required."))]
    pub cep: String,
    pub reference: Option<String>,
}

/// Telefone pronto para gravar.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPhone {
    pub number: String,
    pub is_main: bool,
}

impl SupplierPayload {
    /// Telefones prontos para gravar: no máximo um `is_main`.
    /// O primeiro marcado como principal vence, os demais perdem a flag.
    pub fn normalized_phones(&self) -> Vec<NewPhone> {
        let mut main_taken = false;
        self.phones
            .iter()
            .map(|phone| {
                let is_main = phone.is_main.unwrap_or(false) && !main_taken;
                main_taken |= is_main;
                NewPhone {
                    number: phone.number.clone(),
                    is_main,
                }
            })
            .collect()
    }
}
