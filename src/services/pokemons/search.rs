use {
    super::{Outcome, DELETED, UPDATED},
    crate::{
        error::ApiError,
        model::Patch,
        query::{Filter, NameParams, NameQuery},
        store::PokemonStore,
    },
    actix_web::{delete, get, put, web, HttpResponse},
    serde_json::Value,
};

fn name_filter(params: &NameParams) -> Result<Filter, ApiError> {
    NameQuery::from_params(params)
        .map(Filter::Name)
        .ok_or(ApiError::MissingName)
}

#[get("/search")]
pub async fn find_by_name(
    store: web::Data<dyn PokemonStore>,
    params: web::Query<NameParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = name_filter(&params)?;
    let stored = store.find_one(&filter).await?.ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(stored))
}

#[put("/search")]
pub async fn update_by_name(
    store: web::Data<dyn PokemonStore>,
    params: web::Query<NameParams>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let filter = name_filter(&params)?;
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

#[delete("/search")]
pub async fn delete_by_name(
    store: web::Data<dyn PokemonStore>,
    params: web::Query<NameParams>,
) -> Result<HttpResponse, ApiError> {
    let filter = name_filter(&params)?;

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
