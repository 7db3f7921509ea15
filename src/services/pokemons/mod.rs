mod by_id;
mod collection;
mod search;

use {
    crate::model::StoredPokemon,
    actix_web::{dev::HttpServiceFactory, web},
    serde::Serialize,
};

pub const CREATED: &str = "Pokemon created successfully";
pub const UPDATED: &str = "Pokemon updated successfully";
pub const DELETED: &str = "Pokemon deleted successfully";

/// Body of every successful mutation.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub message: &'static str,
    pub pokemon: StoredPokemon,
}

pub fn service() -> impl HttpServiceFactory + 'static {
    // `/search` has to be registered ahead of `/{id}`, which would swallow it.
    web::scope("/pokemons")
        .service(collection::list)
        .service(collection::create)
        .service(search::find_by_name)
        .service(search::update_by_name)
        .service(search::delete_by_name)
        .service(by_id::find_by_id)
        .service(by_id::update_by_id)
        .service(by_id::delete_by_id)
}
