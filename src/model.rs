//! The creature document and the shape rules every write is checked against.

use {
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    uuid::Uuid,
};

/// Key the store uses for its own identity. Never accepted from clients.
pub const INTERNAL_ID: &str = "_id";

#[derive(Debug, thiserror::Error)]
#[error("Pokemon validation failed: {0}")]
pub struct ValidationError(String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub french: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub japanese: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Name {
    /// The four searchable locales, skipping the ones that are unset.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.english.as_str()).chain(
            [&self.french, &self.japanese, &self.chinese]
                .into_iter()
                .filter_map(|locale| locale.as_deref()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: i64,
    pub name: Name,
    /// Types, stats and anything else; carried untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Pokemon {
    /// Checks a client supplied document against the creature shape.
    pub fn from_document(document: Value) -> Result<Self, ValidationError> {
        let mut fields = match document {
            Value::Object(fields) => fields,
            other => {
                return Err(ValidationError(format!(
                    "expected a JSON object, found {}",
                    kind(&other)
                )))
            }
        };

        fields.remove(INTERNAL_ID);

        let pokemon: Pokemon = serde_json::from_value(Value::Object(fields))
            .map_err(|err| ValidationError(err.to_string()))?;

        if pokemon.name.english.trim().is_empty() {
            return Err(ValidationError("name.english must not be blank".into()));
        }

        Ok(pokemon)
    }

    fn to_document(&self) -> Result<Value, ValidationError> {
        serde_json::to_value(self).map_err(|err| ValidationError(err.to_string()))
    }
}

/// A document as the store holds it: the creature plus its internal identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredPokemon {
    #[serde(rename = "_id")]
    pub internal_id: Uuid,
    #[serde(flatten)]
    pub pokemon: Pokemon,
}

/// Partial update, applied as a JSON merge patch.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn from_body(body: Value) -> Result<Self, ValidationError> {
        match body {
            Value::Object(mut fields) => {
                fields.remove(INTERNAL_ID);
                Ok(Patch(fields))
            }
            other => Err(ValidationError(format!(
                "expected a JSON object, found {}",
                kind(&other)
            ))),
        }
    }

    /// Merges the patch into `current` and validates the result.
    pub fn apply(&self, current: &Pokemon) -> Result<Pokemon, ValidationError> {
        let mut document = current.to_document()?;

        for (key, value) in &self.0 {
            merge_field(&mut document, key, value);
        }

        Pokemon::from_document(document)
    }
}

fn merge_field(target: &mut Value, key: &str, patch: &Value) {
    let fields = match target {
        Value::Object(fields) => fields,
        _ => return,
    };

    match patch {
        Value::Null => {
            fields.remove(key);
        }
        Value::Object(nested) => {
            let slot = fields
                .entry(key.to_owned())
                .or_insert_with(|| Value::Object(Map::new()));

            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }

            for (nested_key, nested_value) in nested {
                merge_field(slot, nested_key, nested_value);
            }
        }
        value => {
            fields.insert(key.to_owned(), value.clone());
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
