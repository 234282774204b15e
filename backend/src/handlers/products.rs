use actix_web::{web, HttpResponse, Result};
use shared::ApiError;

use crate::handlers::customers::SearchQuery;
use crate::models::AppState;
use crate::services::products as product_service;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/products").route("/search", web::get().to(search_products)));
}

async fn search_products(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    match product_service::search_products(&state.db, &query.q, state.config.search_limit).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => {
            log::error!("Error searching products: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(ApiError::new(
                "internal_error",
                "Failed to search products",
            )))
        }
    }
}
