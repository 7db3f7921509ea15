pub mod pokemons;


use {
    crate::error::ApiError,
    actix_web::{get, web, Responder},
};

#[get("/")]
pub async fn index() -> impl Responder {
    "Hello, World!"
}

/// Routes plus the extractor settings that keep rejections in the JSON error shape.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .service(index)
    .service(pokemons::service());
}
