//! People module for the in-memory record collection.
//!
//! This module handles:
//! - Person and address types with their JSON shape
//! - The shared, lock-guarded record store
//! - The seed records loaded at startup

pub mod store;
pub mod types;

pub use store::PeopleStore;
pub use types::{seed_people, Address, Person};
