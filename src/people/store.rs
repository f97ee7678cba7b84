//! Shared in-memory record store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;

use super::types::{seed_people, Person};

/// Ordered collection of people shared between handlers.
///
/// Cloning is cheap: clones share the same underlying list. Lookups are
/// linear scans returning the first match.
#[derive(Debug, Clone, Default)]
pub struct PeopleStore {
    people: Arc<RwLock<Vec<Person>>>,
}

impl PeopleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records.
    pub fn with_people(people: Vec<Person>) -> Self {
        Self {
            people: Arc::new(RwLock::new(people)),
        }
    }

    /// Create a store holding the seed records.
    pub fn seeded() -> Self {
        Self::with_people(seed_people())
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<Person> {
        self.people.read().await.clone()
    }

    /// First record with the given ID.
    pub async fn get(&self, id: &str) -> Option<Person> {
        self.people
            .read()
            .await
            .iter()
            .find(|person| person.id == id)
            .cloned()
    }

    /// Store `person` under `id` and return the updated list.
    ///
    /// Any ID carried by `person` is replaced by `id`.
    pub async fn create(&self, id: &str, mut person: Person) -> Result<Vec<Person>, StoreError> {
        let mut people = self.people.write().await;

        if people.iter().any(|existing| existing.id == id) {
            return Err(StoreError::DuplicateId { id: id.to_string() });
        }

        person.id = id.to_string();
        people.push(person);
        debug!(id, total = people.len(), "Person created");

        Ok(people.clone())
    }

    /// Remove the first record with `id` and return the updated list.
    ///
    /// Unknown IDs leave the list untouched.
    pub async fn delete(&self, id: &str) -> (Option<Person>, Vec<Person>) {
        let mut people = self.people.write().await;

        let index = people.iter().position(|person| person.id == id);
        let removed = index.map(|index| people.remove(index));

        debug!(id, removed = removed.is_some(), total = people.len(), "Person delete");

        (removed, people.clone())
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.people.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.people.read().await.is_empty()
    }
}
