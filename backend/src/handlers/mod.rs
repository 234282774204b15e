use actix_web::web;

pub mod customers;
pub mod products;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(customers::configure)
            .configure(products::configure)
    );
}
