use {
    super::{PokemonStore, StoreError},
    crate::{
        model::{Patch, Pokemon, StoredPokemon},
        query::Filter,
    },
    async_trait::async_trait,
    parking_lot::RwLock,
    uuid::Uuid,
};

/// Keeps the collection in insertion order inside the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<StoredPokemon>>,
}

#[async_trait]
impl PokemonStore for MemoryStore {
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<StoredPokemon>, StoreError> {
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .documents
            .read()
            .iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.documents.read().len() as u64)
    }

    async fn insert(&self, pokemon: Pokemon) -> Result<StoredPokemon, StoreError> {
        let stored = StoredPokemon {
            internal_id: Uuid::new_v4(),
            pokemon,
        };

        self.documents.write().push(stored.clone());

        Ok(stored)
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError> {
        Ok(self
            .documents
            .read()
            .iter()
            .find(|stored| filter.matches(&stored.pokemon))
            .cloned())
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<Option<StoredPokemon>, StoreError> {
        let mut documents = self.documents.write();

        let stored = match documents
            .iter_mut()
            .find(|stored| filter.matches(&stored.pokemon))
        {
            Some(stored) => stored,
            None => return Ok(None),
        };

        stored.pokemon = patch.apply(&stored.pokemon)?;

        Ok(Some(stored.clone()))
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError> {
        let mut documents = self.documents.write();
        let position = documents
            .iter()
            .position(|stored| filter.matches(&stored.pokemon));

        Ok(position.map(|index| documents.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::query::{NameParams, NameQuery},
        serde_json::json,
    };

    fn pokemon(id: i64, english: &str) -> Pokemon {
        Pokemon::from_document(json!({ "id": id, "name": { "english": english } })).unwrap()
    }

    fn by_name(name: &str) -> Filter {
        Filter::Name(
            NameQuery::from_params(&NameParams {
                name: Some(name.to_owned()),
            })
            .unwrap(),
        )
    }

    #[actix_web::test]
    async fn pages_follow_insertion_order() {
        let store = MemoryStore::default();

        for (id, name) in [(1, "Bulbasaur"), (4, "Charmander"), (7, "Squirtle")] {
            store.insert(pokemon(id, name)).await.unwrap();
        }

        let page = store.find_page(1, 5).await.unwrap();

        assert_eq!(
            page.iter().map(|stored| stored.pokemon.id).collect::<Vec<_>>(),
            vec![4, 7]
        );
        assert_eq!(store.count().await.unwrap(), 3);
        assert!(store.find_page(10, 5).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn duplicate_ids_are_both_kept() {
        let store = MemoryStore::default();

        let first = store.insert(pokemon(25, "Pikachu")).await.unwrap();
        let second = store.insert(pokemon(25, "Pikachu")).await.unwrap();

        assert_ne!(first.internal_id, second.internal_id);
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(
            store.find_one(&Filter::Id(25)).await.unwrap(),
            Some(first)
        );
    }

    #[actix_web::test]
    async fn delete_takes_only_the_first_match() {
        let store = MemoryStore::default();

        store.insert(pokemon(1, "Bulbasaur")).await.unwrap();
        store.insert(pokemon(2, "Ivysaur")).await.unwrap();

        let deleted = store.find_one_and_delete(&by_name("SAUR")).await.unwrap().unwrap();

        assert_eq!(deleted.pokemon.id, 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_one_and_delete(&Filter::Id(1)).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn failed_update_leaves_the_document_alone() {
        let store = MemoryStore::default();
        let original = store.insert(pokemon(1, "Bulbasaur")).await.unwrap();

        let patch = Patch::from_body(json!({ "id": "one" })).unwrap();
        let err = store.find_one_and_update(&Filter::Id(1), &patch).await.unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.find_one(&Filter::Id(1)).await.unwrap(), Some(original));
    }
}
