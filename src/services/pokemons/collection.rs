use {
    super::{Outcome, CREATED},
    crate::{
        error::ApiError,
        model::Pokemon,
        query::{Page, PageParams, Pagination},
        store::PokemonStore,
    },
    actix_web::{get, post, web, HttpResponse},
    serde_json::Value,
};

#[get("")]
pub async fn list(
    store: web::Data<dyn PokemonStore>,
    params: web::Query<PageParams>,
) -> Result<HttpResponse, ApiError> {
    let pagination = Pagination::from_params(&params);

    // Not snapshot consistent: a write landing between the two may skew the count.
    let (results, total_count) = futures::try_join!(
        store.find_page(pagination.offset(), pagination.limit),
        store.count(),
    )?;

    Ok(HttpResponse::Ok().json(Page {
        results,
        total_count,
        page: pagination.page,
        total_pages: pagination.total_pages(total_count),
    }))
}

#[post("")]
pub async fn create(
    store: web::Data<dyn PokemonStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let pokemon = Pokemon::from_document(body.into_inner())?;
    let stored = store
        .insert(pokemon)
        .await
        .map_err(ApiError::create_failed)?;

    tracing::info!(
        id = stored.pokemon.id,
        internal_id = %stored.internal_id,
        "pokemon created"
    );

    Ok(HttpResponse::Created().json(Outcome {
        message: CREATED,
        pokemon: stored,
    }))
}
