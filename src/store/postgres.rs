use {
    super::{PokemonStore, StoreError},
    crate::{
        model::{Patch, Pokemon, StoredPokemon},
        query::Filter,
    },
    async_trait::async_trait,
    sqlx::{
        postgres::{PgArguments, PgPool, PgPoolOptions},
        query::QueryAs,
        types::Json,
        FromRow, Postgres,
    },
    std::time::Duration,
    uuid::Uuid,
};

const BY_ID: &str = "doc @> jsonb_build_object('id', $1::bigint)";

const BY_NAME: &str = "(doc->'name'->>'english' ILIKE $1 \
    OR doc->'name'->>'french' ILIKE $1 \
    OR doc->'name'->>'japanese' ILIKE $1 \
    OR doc->'name'->>'chinese' ILIKE $1)";

/// How often a locking statement is reissued after it came back empty while
/// another match was still visible.
///
/// `LIMIT 1 ... FOR UPDATE` picks its row before waiting on the lock. If the
/// holder deletes the row, or edits it so it stops matching, the waiter gets
/// nothing back rather than the next match.
const LOCK_ATTEMPTS: usize = 3;

/// `pokemons` as a table of JSONB documents.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct PokemonRow {
    internal_id: Uuid,
    doc: Json<Pokemon>,
}

impl From<PokemonRow> for StoredPokemon {
    fn from(row: PokemonRow) -> Self {
        StoredPokemon {
            internal_id: row.internal_id,
            pokemon: row.doc.0,
        }
    }
}

impl PgStore {
    /// Opens the pool and brings the schema up to date.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(max_connections, "connected to postgres");

        Ok(Self { pool })
    }

    /// Plain read of the latest committed state, no locks taken.
    async fn any_match(&self, filter: &Filter) -> Result<bool, StoreError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM pokemons WHERE {})", clause(filter));

        let exists = match filter {
            Filter::Id(id) => sqlx::query_scalar::<_, bool>(&sql).bind(*id),
            Filter::Name(name) => sqlx::query_scalar::<_, bool>(&sql).bind(name.like_pattern()),
        }
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

fn clause(filter: &Filter) -> &'static str {
    match filter {
        Filter::Id(_) => BY_ID,
        Filter::Name(_) => BY_NAME,
    }
}

fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &Filter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match filter {
        Filter::Id(id) => query.bind(*id),
        Filter::Name(name) => query.bind(name.like_pattern()),
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl PokemonStore for PgStore {
    async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<StoredPokemon>, StoreError> {
        let rows = sqlx::query_as::<_, PokemonRow>(
            "SELECT internal_id, doc FROM pokemons ORDER BY seq OFFSET $1 LIMIT $2",
        )
        .bind(to_i64(skip))
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredPokemon::from).collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pokemons")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn insert(&self, pokemon: Pokemon) -> Result<StoredPokemon, StoreError> {
        let internal_id = Uuid::new_v4();

        sqlx::query("INSERT INTO pokemons (internal_id, doc) VALUES ($1, $2)")
            .bind(internal_id)
            .bind(Json(&pokemon))
            .execute(&self.pool)
            .await?;

        Ok(StoredPokemon {
            internal_id,
            pokemon,
        })
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError> {
        let sql = format!(
            "SELECT internal_id, doc FROM pokemons WHERE {} ORDER BY seq LIMIT 1",
            clause(filter)
        );

        let row = bind_filter(sqlx::query_as::<_, PokemonRow>(&sql), filter)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StoredPokemon::from))
    }

    async fn find_one_and_update(
        &self,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<Option<StoredPokemon>, StoreError> {
        let sql = format!(
            "SELECT internal_id, doc FROM pokemons WHERE {} ORDER BY seq LIMIT 1 FOR UPDATE",
            clause(filter)
        );

        for _ in 0..LOCK_ATTEMPTS {
            let mut tx = self.pool.begin().await?;

            let row = bind_filter(sqlx::query_as::<_, PokemonRow>(&sql), filter)
                .fetch_optional(&mut *tx)
                .await?;

            let row = match row {
                Some(row) => row,
                None => {
                    tx.rollback().await?;

                    if self.any_match(filter).await? {
                        continue;
                    }

                    return Ok(None);
                }
            };

            // Dropping `tx` on a validation error rolls back and releases the lock.
            let updated = patch.apply(&row.doc.0)?;

            sqlx::query("UPDATE pokemons SET doc = $2 WHERE internal_id = $1")
                .bind(row.internal_id)
                .bind(Json(&updated))
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            return Ok(Some(StoredPokemon {
                internal_id: row.internal_id,
                pokemon: updated,
            }));
        }

        Ok(None)
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<StoredPokemon>, StoreError> {
        let sql = format!(
            "DELETE FROM pokemons WHERE internal_id = (\
                SELECT internal_id FROM pokemons WHERE {} ORDER BY seq LIMIT 1 FOR UPDATE\
            ) RETURNING internal_id, doc",
            clause(filter)
        );

        for _ in 0..LOCK_ATTEMPTS {
            let row = bind_filter(sqlx::query_as::<_, PokemonRow>(&sql), filter)
                .fetch_optional(&self.pool)
                .await?;

            if let Some(row) = row {
                return Ok(Some(row.into()));
            }

            if !self.any_match(filter).await? {
                return Ok(None);
            }
        }

        Ok(None)
    }
}
