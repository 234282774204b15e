use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use shared::{ApiError, ApiSuccess, CreateCustomerRequest, ResolveAddressRequest, UpdateCustomerRequest};
use uuid::Uuid;

use crate::models::AppState;
use crate::services::customers::{self as customer_service, CustomerError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::post().to(create_customer))
            .route("/search", web::get().to(search_customers))
            .route("/addresses/resolve", web::post().to(resolve_address))
            .route("/{customer_id}", web::get().to(get_customer))
            .route("/{customer_id}", web::put().to(update_customer)),
    )
    .route(
        "/customer/{customer_id}/addresses",
        web::get().to(get_customer_addresses),
    );
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

fn invalid_id() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiError::new("invalid_id", "Invalid customer ID format"))
}

fn error_response(e: CustomerError, context: &str) -> HttpResponse {
    match e {
        CustomerError::NotFound => {
            HttpResponse::NotFound().json(ApiError::new("not_found", "Customer not found"))
        }
        CustomerError::DuplicateAccount => HttpResponse::BadRequest().json(ApiError::new(
            "duplicate_account",
            "Account number already exists",
        )),
        CustomerError::Validation(_) | CustomerError::Address(_) => {
            HttpResponse::BadRequest().json(ApiError::new("validation_error", e.to_string()))
        }
        CustomerError::DatabaseError(_) => {
            log::error!("Error {}: {:?}", context, e);
            HttpResponse::InternalServerError().json(ApiError::new(
                "internal_error",
                format!("Failed {}", context),
            ))
        }
    }
}

async fn search_customers(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    match customer_service::search_customers(&state.db, &query.q, state.config.search_limit).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => Ok(error_response(e, "searching customers")),
    }
}

async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let customer_id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(invalid_id()),
    };

    match customer_service::get_customer(&state.db, &customer_id).await {
        Ok(customer) => Ok(HttpResponse::Ok().json(ApiSuccess::new(customer))),
        Err(e) => Ok(error_response(e, "fetching customer")),
    }
}

async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<CreateCustomerRequest>,
) -> Result<HttpResponse> {
    match customer_service::create_customer(&state.db, &body.into_inner()).await {
        Ok(customer) => Ok(HttpResponse::Created().json(ApiSuccess::new(customer))),
        Err(e) => Ok(error_response(e, "creating customer")),
    }
}

async fn update_customer(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateCustomerRequest>,
) -> Result<HttpResponse> {
    let customer_id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(invalid_id()),
    };

    match customer_service::update_customer(&state.db, &customer_id, &body.into_inner()).await {
        Ok(customer) => Ok(HttpResponse::Ok().json(ApiSuccess::new(customer))),
        Err(e) => Ok(error_response(e, "updating customer")),
    }
}

/// Bare list of addresses, consumed directly by the address selector.
async fn get_customer_addresses(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let customer_id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(invalid_id()),
    };

    match customer_service::get_customer_addresses(&state.db, &customer_id).await {
        Ok(addresses) => Ok(HttpResponse::Ok().json(addresses)),
        Err(e) => Ok(error_response(e, "fetching addresses")),
    }
}

/// The account number travels in the body, so any characters are allowed.
async fn resolve_address(
    state: web::Data<AppState>,
    body: web::Json<ResolveAddressRequest>,
) -> Result<HttpResponse> {
    match customer_service::resolve_address(&state.db, &body.into_inner()).await {
        Ok(resolved) => Ok(HttpResponse::Ok().json(ApiSuccess::new(resolved))),
        Err(e) => Ok(error_response(e, "resolving address")),
    }
}
