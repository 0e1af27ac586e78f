//! Volume model
//!
//! A block-storage volume as reported by the provider. Read-only from the
//! point of view of this crate.

use serde::{Deserialize, Serialize};

/// A block-storage volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    /// Provider-assigned identifier
    pub id: String,

    /// Human-readable name, unique within the account
    pub name: String,

    /// Size of the volume
    #[serde(default)]
    pub size_gigabytes: u64,

    /// Region the volume lives in
    #[serde(default, deserialize_with = "region_slug")]
    pub region: Option<String>,
}

impl Volume {
    /// Create a volume with just an identifier and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_gigabytes: 0,
            region: None,
        }
    }
}

/// The API nests the region as an object; only its slug is kept.
fn region_slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Region {
        Slug(String),
        Object { slug: String },
    }

    Ok(Option::<Region>::deserialize(deserializer)?.map(|region| match region {
        Region::Slug(slug) | Region::Object { slug } => slug,
    }))
}
