//! Request forms and response envelopes of the authority contract.
//!
//! Every authority response is a `{success, potholes, summary, message}`
//! envelope. Mutation responses carry `potholes` as a JSON array; load and
//! import responses carry it as a JSON *string* holding the array.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pothole::StoredPothole;
use crate::summary::Summary;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Authority route paths.
pub mod routes {
    pub const ADD: &str = "/add_pothole";
    pub const UPDATE: &str = "/update_pothole";
    pub const REMOVE: &str = "/remove_pothole";
    pub const RESET: &str = "/reset";
    pub const SAVE: &str = "/save_potholes";
    pub const LOAD: &str = "/load_potholes";
    pub const EXPORT: &str = "/export_potholes";
    pub const IMPORT: &str = "/import_potholes";
    pub const STORE_IMAGE: &str = "/save_road_image";
    pub const REPORT: &str = "/generate_pdf";
}

/// Multipart field name carrying an imported file.
pub const IMPORT_FIELD: &str = "file";

// ---------------------------------------------------------------------------
// Request forms
// ---------------------------------------------------------------------------

/// `POST /add_pothole`; `index` present means insert-at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddForm {
    pub width: String,
    pub length: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// `POST /update_pothole`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateForm {
    pub index: String,
    pub width: String,
    pub length: String,
}

/// `POST /remove_pothole`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveForm {
    pub index: String,
}

/// `POST /save_potholes` and `POST /export_potholes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionForm {
    pub filename: String,
    /// JSON array of [`StoredPothole`].
    pub potholes: String,
}

/// `POST /load_potholes` and `POST /generate_pdf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameForm {
    pub filename: String,
}

/// `POST /save_road_image`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageForm {
    /// `data:image/png;base64,...`
    pub image_data: String,
}

/// Parse a 0-based record index sent as text.
pub fn parse_index(raw: &str) -> Result<usize, CoreError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| CoreError::Validation(format!("index must be a non-negative integer, got '{raw}'")))
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

fn default_success() -> bool {
    true
}

/// Standard authority response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<P> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potholes: Option<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Envelope of mutation responses (`potholes` as a JSON array).
pub type MutationEnvelope = Envelope<Vec<StoredPothole>>;

/// Envelope of load/import responses (`potholes` as a JSON string).
pub type TransferEnvelope = Envelope<String>;

/// Envelope with no payload (`{success: true}` or a failure).
pub type AckEnvelope = Envelope<()>;

impl<P> Envelope<P> {
    /// Successful envelope carrying a collection and its summary.
    pub fn collection(potholes: P, summary: Summary) -> Self {
        Self {
            success: true,
            potholes: Some(potholes),
            summary: Some(summary),
            message: None,
            code: None,
        }
    }

    /// Successful envelope with no payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            potholes: None,
            summary: None,
            message: None,
            code: None,
        }
    }

    /// Failure envelope with a user-facing message and a machine code.
    pub fn failure(message: impl Into<String>, code: &str) -> Self {
        Self {
            success: false,
            potholes: None,
            summary: None,
            message: Some(message.into()),
            code: Some(code.to_string()),
        }
    }

    /// Turn a `success: false` envelope into its message.
    pub fn into_accepted(self) -> Result<Self, EnvelopeError> {
        if self.success {
            Ok(self)
        } else {
            Err(EnvelopeError::Rejected(
                self.message
                    .unwrap_or_else(|| "the authority rejected the request".to_string()),
            ))
        }
    }
}

/// Why an envelope could not be turned into a snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvelopeError {
    /// The authority answered `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The envelope is missing fields or carries unparsable data.
    #[error("malformed authority response: {0}")]
    Malformed(String),
}

/// Full collection plus summary as echoed by the authority.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionSnapshot {
    pub potholes: Vec<StoredPothole>,
    pub summary: Summary,
}

impl MutationEnvelope {
    pub fn into_snapshot(self) -> Result<CollectionSnapshot, EnvelopeError> {
        let accepted = self.into_accepted()?;
        let potholes = accepted
            .potholes
            .ok_or_else(|| EnvelopeError::Malformed("missing 'potholes'".into()))?;
        let summary = accepted
            .summary
            .ok_or_else(|| EnvelopeError::Malformed("missing 'summary'".into()))?;
        Ok(CollectionSnapshot { potholes, summary })
    }
}

impl TransferEnvelope {
    /// Build a transfer envelope, encoding the records as a JSON string.
    pub fn transfer(potholes: &[StoredPothole], summary: Summary) -> Result<Self, CoreError> {
        Ok(Self::collection(encode_potholes(potholes)?, summary))
    }

    pub fn into_snapshot(self) -> Result<CollectionSnapshot, EnvelopeError> {
        let accepted = self.into_accepted()?;
        let raw = accepted
            .potholes
            .ok_or_else(|| EnvelopeError::Malformed("missing 'potholes'".into()))?;
        let potholes = decode_potholes(&raw)
            .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
        let summary = accepted
            .summary
            .ok_or_else(|| EnvelopeError::Malformed("missing 'summary'".into()))?;
        Ok(CollectionSnapshot { potholes, summary })
    }
}

/// Encode records as the JSON text carried in forms and transfer envelopes.
pub fn encode_potholes(potholes: &[StoredPothole]) -> Result<String, CoreError> {
    serde_json::to_string(potholes)
        .map_err(|e| CoreError::Internal(format!("failed to encode potholes: {e}")))
}

/// Decode the JSON text of a record array.
pub fn decode_potholes(raw: &str) -> Result<Vec<StoredPothole>, CoreError> {
    serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("invalid potholes JSON: {e}")))
}

// ---------------------------------------------------------------------------
// PNG data URLs
// ---------------------------------------------------------------------------

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode PNG bytes as a `data:image/png;base64,` URL.
pub fn png_data_url(png: &[u8]) -> String {
    let mut url = String::from(PNG_DATA_URL_PREFIX);
    base64::engine::general_purpose::STANDARD.encode_string(png, &mut url);
    url
}

/// Decode the payload of a base64 data URL (anything after the first comma).
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, CoreError> {
    let (_, payload) = url
        .split_once(',')
        .ok_or_else(|| CoreError::Validation("image_data is not a data URL".into()))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| CoreError::Validation(format!("image_data is not valid base64: {e}")))
}
