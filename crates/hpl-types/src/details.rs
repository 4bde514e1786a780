use serde::{Deserialize, Serialize};

use crate::content::ContentRef;
use crate::error::TypeError;

/// Free-form labeled attribute attached to a batch's metadata document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailAttribute {
    pub label: String,
    pub value: String,
}

/// Descriptive metadata document for a batch.
///
/// Lives in the content-addressed store, referenced by the batch's
/// `metadata_ref`. Everything here is presentation data; nothing in it
/// participates in authorization or state decisions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDetails {
    pub description: String,
    /// Content hash of a product image, if one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<DetailAttribute>,
}

impl BatchDetails {
    /// Encode for upload into the metadata store.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TypeError> {
        serde_json::to_vec(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Decode bytes fetched from the metadata store.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        serde_json::from_slice(bytes).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}
