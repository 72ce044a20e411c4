// src/common/error.rs

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("The given data was invalid.")]
    ValidationError(#[from] ValidationErrors),

    #[error("The email has already been taken.")]
    EmailAlreadyExists,

    // JSON malformado ou campos obrigatórios ausentes no corpo
    #[error("{0}")]
    InvalidBody(String),

    #[error("Supplier not found")]
    NotFound,

    // Escrita sobre id inexistente/excluído: falha genérica (500), com o motivo cru
    #[error("No query results for supplier {0}")]
    MissingForWrite(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error(transparent)]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::EmailAlreadyExists
            | AppError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagens por campo, no formato `address.state` / `phones.0.number`.
    fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let mut details = BTreeMap::new();
        match self {
            AppError::ValidationError(errors) => flatten_errors("", errors, &mut details),
            AppError::EmailAlreadyExists => {
                details.insert("email".to_string(), vec![self.to_string()]);
            }
            AppError::InvalidBody(message) => {
                details.insert("body".to_string(), vec![message.clone()]);
            }
            _ => return None,
        }
        Some(details)
    }
}

fn flatten_errors(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("The {path} field is invalid ({}).", e.code))
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(&format!("{path}.{index}"), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let body = match self.field_errors() {
            Some(details) => json!({
                "success": false,
                "message": self.to_string(),
                "data": null,
                "errors": details,
            }),
            None => json!({
                "success": false,
                "message": self.to_string(),
                "data": null,
            }),
        };

        (status, Json(body)).into_response()
    }
}
