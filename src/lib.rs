//! Backend REST de fornecedores: cadastro com telefones e endereços,
//! listagem paginada com busca e ordenação, e cache com invalidação por época.

pub mod cache;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppState, Config};
pub use routes::router;
