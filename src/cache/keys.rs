// src/cache/keys.rs

use crate::models::listing::SupplierFilter;

/// Chave bem conhecida onde fica a época da listagem.
pub const EPOCH_KEY: &str = "suppliers_cache_timestamp";

/// Chave de uma página da listagem.
///
/// Composta por época, ordenação, direção, busca e página. Trocar a época torna
/// todas as chaves antigas inalcançáveis; elas só somem pelo TTL.
/// A busca vem antes da página, que é sempre numérica, então a composição não
/// colide mesmo com `_` dentro do texto buscado.
pub fn listing_key(epoch: i64, filter: &SupplierFilter) -> String {
    format!(
        "suppliers_{}_{}_{}_{}_{}",
        epoch,
        filter.sort_by.column(),
        filter.direction.as_str(),
        filter.search.as_deref().unwrap_or(""),
        filter.page,
    )
}

pub fn detail_key(id: i64) -> String {
    format!("supplier_{id}")
}
