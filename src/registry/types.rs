//! bio.agents record shapes.
//!
//! Only the fields the converter needs are typed; everything else is kept
//! in `extra` so raw dumps stay faithful.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One agent as returned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "bioagentsID")]
    pub bioagents_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub function: Vec<RawFunction>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One function (operation mode) of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFunction {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub operation: Vec<RawTerm>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: Vec<RawParameter>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub output: Vec<RawParameter>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An input or output group: data-type and format terms.
///
/// The registry sends `data` as a single object and `format` as a list;
/// both shapes are accepted for either field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    #[serde(default, deserialize_with = "one_or_many")]
    pub data: Vec<RawTerm>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub format: Vec<RawTerm>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An EDAM term reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTerm {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawTerm {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            term: None,
            extra: Map::new(),
        }
    }
}

/// One page of the paginated listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    pub list: Vec<RawRecord>,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(item)) => vec![item],
        Some(OneOrMany::Many(items)) => items,
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
