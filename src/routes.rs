// src/routes.rs

use axum::{
    routing::get,
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/suppliers",
            get(handlers::supplier::list_suppliers).post(handlers::supplier::create_supplier),
        )
        .route(
            "/api/suppliers/{id}",
            get(handlers::supplier::show_supplier)
                .put(handlers::supplier::update_supplier)
                .patch(handlers::supplier::update_supplier)
                .delete(handlers::supplier::delete_supplier),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
