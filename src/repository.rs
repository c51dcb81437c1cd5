use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::RepositoryError, models::Person};

/// Repository Trait
///
/// The unit of work over the People entity set. Handlers only see this contract,
/// so the Postgres store and the in-memory store are interchangeable.
///
/// **Send + Sync + async_trait** make the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Every person, in storage order.
    async fn list_people(&self) -> Result<Vec<Person>, RepositoryError>;

    async fn find_person(&self, id: Uuid) -> Result<Option<Person>, RepositoryError>;

    async fn person_exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.find_person(id).await?.is_some())
    }

    /// Inserts `person` as-is. The id must already be assigned.
    async fn insert_person(&self, person: Person) -> Result<Person, RepositoryError>;

    /// Full-record replacement keyed on `person.id`.
    /// Returns `RepositoryError::Concurrency` when no row was affected.
    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError>;

    /// Returns true if a row was removed.
    async fn delete_person(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// Postgres SQLSTATE codes the repository reacts to.
const UNIQUE_VIOLATION: &str = "23505";
const UNDEFINED_TABLE: &str = "42P01";

/// Sorts a raw sqlx failure into the repository taxonomy.
fn classify(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!("people store unreachable: {:?}", err);
            RepositoryError::Unavailable
        }
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNDEFINED_TABLE) => {
            tracing::error!("people table missing: {}", db.message());
            RepositoryError::Unavailable
        }
        _ => RepositoryError::Database(err),
    }
}

/// PostgresRepository
///
/// `Repository` backed by the `people` table.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// No ORDER BY: callers get physical storage order.
    async fn list_people(&self) -> Result<Vec<Person>, RepositoryError> {
        sqlx::query_as::<_, Person>("SELECT id, name, email, phone, birth_date FROM people")
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_person(&self, id: Uuid) -> Result<Option<Person>, RepositoryError> {
        sqlx::query_as::<_, Person>(
            "SELECT id, name, email, phone, birth_date FROM people WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)
    }

    async fn person_exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM people WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn insert_person(&self, person: Person) -> Result<Person, RepositoryError> {
        sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO people (id, name, email, phone, birth_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, phone, birth_date
            "#,
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(person.birth_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                RepositoryError::Duplicate(person.id)
            }
            _ => classify(e),
        })
    }

    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE people
            SET name = $2, email = $3, phone = $4, birth_date = $5
            WHERE id = $1
            "#,
        )
        .bind(person.id)
        .bind(&person.name)
        .bind(&person.email)
        .bind(&person.phone)
        .bind(person.birth_date)
        .execute(&self.pool)
        .await
        .map_err(classify)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Concurrency(person.id));
        }
        Ok(())
    }

    async fn delete_person(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}

/// InMemoryRepository
///
/// Process-local store used for `DATA_STORE=memory` and tests. Rows are kept in
/// insertion order, which is what `list_people` returns.
pub struct InMemoryRepository {
    // None models an entity set that does not exist.
    people: Option<RwLock<Vec<Person>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            people: Some(RwLock::new(Vec::new())),
        }
    }

    pub fn with_people(people: Vec<Person>) -> Self {
        Self {
            people: Some(RwLock::new(people)),
        }
    }

    /// A store whose entity set is missing: every call fails with `Unavailable`.
    pub fn unavailable() -> Self {
        Self { people: None }
    }

    fn entity_set(&self) -> Result<&RwLock<Vec<Person>>, RepositoryError> {
        self.people.as_ref().ok_or(RepositoryError::Unavailable)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_people(&self) -> Result<Vec<Person>, RepositoryError> {
        Ok(self.entity_set()?.read().await.clone())
    }

    async fn find_person(&self, id: Uuid) -> Result<Option<Person>, RepositoryError> {
        let people = self.entity_set()?.read().await;
        Ok(people.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_person(&self, person: Person) -> Result<Person, RepositoryError> {
        let mut people = self.entity_set()?.write().await;
        if people.iter().any(|p| p.id == person.id) {
            return Err(RepositoryError::Duplicate(person.id));
        }
        people.push(person.clone());
        Ok(person)
    }

    async fn update_person(&self, person: &Person) -> Result<(), RepositoryError> {
        let mut people = self.entity_set()?.write().await;
        match people.iter_mut().find(|p| p.id == person.id) {
            Some(row) => {
                *row = person.clone();
                Ok(())
            }
            None => Err(RepositoryError::Concurrency(person.id)),
        }
    }

    async fn delete_person(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut people = self.entity_set()?.write().await;
        let before = people.len();
        people.retain(|p| p.id != id);
        Ok(people.len() < before)
    }
}
