//! Document store boundary. Handlers only ever see [`PokemonStore`].

mod memory;
mod postgres;

pub use {memory::MemoryStore, postgres::PgStore};

use {
    crate::{
        config::{Config, StorageKind},
        model::{Patch, Pokemon, StoredPokemon, ValidationError},
        query::Filter,
    },
    async_trait::async_trait,
    std::sync::Arc,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Operations over the `pokemons` collection.
///
/// Single-document mutations are atomic; nothing spans more than one document.
/// "First" always means first in insertion order.
#[async_trait]
pub trait PokemonStore: Send + Sync {
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<StoredPokemon>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Assigns the internal id. The external `id` is not required to be unique.
    async fn insert(&self, pokemon: Pokemon) -> Result<StoredPokemon, StoreError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError>;

    /// Returns the document as it is after the patch was applied.
    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<Option<StoredPokemon>, StoreError>;

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError>;
}

/// Builds the configured backend. Called once at startup.
pub async fn connect(config: &Config) -> Result<Arc<dyn PokemonStore>, StoreError> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("using the in-memory store, documents will not outlive the process");

            Ok(Arc::new(MemoryStore::default()))
        }
        StorageKind::Postgres => {
            let store = PgStore::connect(
                &config.database_url,
                config.max_connections,
                config.acquire_timeout(),
            )
            .await?;

            Ok(Arc::new(store))
        }
    }
}
