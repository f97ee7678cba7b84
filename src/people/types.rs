//! Person record types.

use serde::{Deserialize, Deserializer, Serialize};

/// A person record.
///
/// Empty strings and a missing address are left out of the JSON, so
/// `Person::default()` serializes as `{}`. On input, `null` reads as an
/// empty value and the capitalized key spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    /// Caller-supplied identifier.
    #[serde(
        alias = "ID",
        alias = "Id",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    /// First name.
    #[serde(
        rename = "firstname",
        alias = "firstName",
        alias = "FirstName",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub first_name: String,
    /// Last name.
    #[serde(
        rename = "lastname",
        alias = "lastName",
        alias = "LastName",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub last_name: String,
    /// Postal address, if known.
    #[serde(alias = "Address", skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// City and state of a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// City name.
    #[serde(
        alias = "City",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub city: String,
    /// State name.
    #[serde(
        alias = "State",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub state: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Person {
    /// Create a person without an address.
    pub fn new(id: impl Into<String>, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: None,
        }
    }

    /// Attach an address.
    pub fn with_address(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.address = Some(Address {
            city: city.into(),
            state: state.into(),
        });
        self
    }
}

/// Records loaded at startup, in insertion order.
pub fn seed_people() -> Vec<Person> {
    vec![
        Person::new("1", "John", "Doe").with_address("Austin", "Texas"),
        Person::new("2", "Jane", "Doe").with_address("Houston", "Texas"),
        Person::new("3", "Francesca", "Rhodes"),
    ]
}
