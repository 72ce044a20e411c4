// src/models/listing.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Tamanho fixo da página na listagem.
pub const PER_PAGE: u32 = 10;

// Parâmetros crus da query string. Tudo é opcional e nada aqui falha:
// valores fora da lista permitida caem nos padrões (id, asc, página 1).
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// name | id | email
    pub sort_by: Option<String>,
    /// asc | desc (sem diferenciar maiúsculas)
    pub sort_direction: Option<String>,
    /// Busca parcial em nome, e-mail e documento
    pub search: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Email,
}

impl SortField {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("name") => SortField::Name,
            Some("email") => SortField::Email,
            _ => SortField::Id,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Filtro tipado da listagem, já normalizado.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SupplierFilter {
    pub search: Option<String>,
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub page: u32,
}

impl SupplierFilter {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(PER_PAGE)
    }
}

impl From<ListQuery> for SupplierFilter {
    fn from(query: ListQuery) -> Self {
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let page = query
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        Self {
            search,
            sort_by: SortField::from_param(query.sort_by.as_deref()),
            direction: SortDirection::from_param(query.sort_direction.as_deref()),
            page,
        }
    }
}

/// Resultado paginado, no formato do paginador clássico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub current_page: u32,
    pub data: Vec<T>,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub per_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, current_page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(u64::from(per_page)).max(1) as u32;
        let offset = u64::from(current_page.saturating_sub(1)) * u64::from(per_page);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + data.len() as u64))
        };

        Self {
            current_page,
            data,
            from,
            to,
            per_page,
            last_page,
            total,
        }
    }
}
