use {
    super::{Outcome, DELETED, UPDATED},
    crate::{
        error::ApiError,
        model::Patch,
        query::{parse_int, Filter},
        store::PokemonStore,
    },
    actix_web::{delete, get, put, web, HttpResponse},
    serde_json::Value,
};

/// A segment with no leading digits can never match, so it is a 404 like any other miss.
fn id_filter(raw: &str) -> Result<Filter, ApiError> {
    parse_int(raw).map(Filter::Id).ok_or(ApiError::NotFound)
}

#[get("/{id}")]
pub async fn find_by_id(
    store: web::Data<dyn PokemonStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = id_filter(&id)?;
    let stored = store.find_one(&filter).await?.ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(stored))
}

#[put("/{id}")]
pub async fn update_by_id(
    store: web::Data<dyn PokemonStore>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let filter = id_filter(&id)?;
    let patch = Patch::from_body(body.into_inner())?;

    let stored = store
        .find_one_and_update(&filter, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id = stored.pokemon.id, internal_id = %stored.internal_id, "pokemon updated");

    Ok(HttpResponse::Ok().json(Outcome {
        message: UPDATED,
        pokemon: stored,
    }))
}

#[delete("/{id}")]
pub async fn delete_by_id(
    store: web::Data<dyn PokemonStore>,
    id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let filter = id_filter(&id)?;

    let stored = store
        .find_one_and_delete(&filter)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id = stored.pokemon.id, internal_id = %stored.internal_id, "pokemon deleted");

    Ok(HttpResponse::Ok().json(Outcome {
        message: DELETED,
        pokemon: stored,
    }))
}
