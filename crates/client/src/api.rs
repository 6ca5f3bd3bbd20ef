//! REST client for the pothole authority.
//!
//! Wraps the authority's form-encoded routes using [`reqwest`] and decodes
//! the `{success, potholes, summary, message}` envelopes.

use std::time::Duration;

use async_trait::async_trait;
use pothole_core::pothole::{Dimensions, StoredPothole};
use pothole_core::wire::{
    encode_potholes, routes, AckEnvelope, AddForm, CollectionForm, CollectionSnapshot,
    EnvelopeError, FilenameForm, ImageForm, MutationEnvelope, RemoveForm, TransferEnvelope,
    UpdateForm, IMPORT_FIELD,
};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

use crate::authority::{Authority, Download, Upload};

/// HTTP client for one authority instance.
#[derive(Debug, Clone)]
pub struct AuthorityApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the authority REST layer.
#[derive(Debug, thiserror::Error)]
pub enum AuthorityError {
    /// The HTTP request itself failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The authority answered with a failure envelope.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the envelope, shown verbatim.
        message: String,
    },

    /// A non-2xx status without a readable envelope.
    #[error("Authority API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body does not match the contract.
    #[error("Malformed authority response: {0}")]
    Malformed(String),

    /// The request could not be built from local data.
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl From<EnvelopeError> for AuthorityError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected(message) => AuthorityError::Rejected {
                status: 200,
                message,
            },
            EnvelopeError::Malformed(detail) => AuthorityError::Malformed(detail),
        }
    }
}

impl AuthorityApi {
    /// Create a client for the authority at `base_url`, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthorityError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn post_form<F: serde::Serialize + ?Sized>(
        &self,
        route: &str,
        form: &F,
    ) -> Result<reqwest::Response, AuthorityError> {
        Ok(self.client.post(self.url(route)).form(form).send().await?)
    }

    async fn mutate<F: serde::Serialize + ?Sized>(
        &self,
        route: &str,
        form: &F,
    ) -> Result<CollectionSnapshot, AuthorityError> {
        let response = self.post_form(route, form).await?;
        let envelope: MutationEnvelope = Self::parse_response(response).await?;
        Ok(envelope.into_snapshot()?)
    }

    async fn transfer(response: reqwest::Response) -> Result<CollectionSnapshot, AuthorityError> {
        let envelope: TransferEnvelope = Self::parse_response(response).await?;
        Ok(envelope.into_snapshot()?)
    }

    async fn acknowledge(response: reqwest::Response) -> Result<(), AuthorityError> {
        let envelope: AckEnvelope = Self::parse_response(response).await?;
        envelope.into_accepted()?;
        Ok(())
    }

    async fn download(response: reqwest::Response, fallback_name: String) -> Result<Download, AuthorityError> {
        let response = Self::ensure_success(response).await?;
        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or(fallback_name);

        // Some failures come back as a 200 envelope instead of a file.
        if content_type.starts_with("application/json") {
            let envelope: AckEnvelope = response.json().await?;
            envelope.into_accepted()?;
            return Err(AuthorityError::Malformed(
                "expected a file download, got JSON".into(),
            ));
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            filename,
            content_type,
            bytes,
        })
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Failure envelopes
    /// become [`AuthorityError::Rejected`]; anything else becomes
    /// [`AuthorityError::ApiError`] with the raw body.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AuthorityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if let Ok(AckEnvelope {
                message: Some(message),
                ..
            }) = serde_json::from_str::<AckEnvelope>(&body)
            {
                return Err(AuthorityError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            return Err(AuthorityError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthorityError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthorityError::Malformed(e.to_string()))
    }
}

/// Extract `filename` from a `Content-Disposition: attachment` header value.
pub fn attachment_filename(disposition: &str) -> Option<String> {
    disposition.split(';').map(str::trim).find_map(|part| {
        let value = part.strip_prefix("filename=")?;
        let value = value.trim_matches('"');
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn encode(records: &[StoredPothole]) -> Result<String, AuthorityError> {
    encode_potholes(records).map_err(|e| AuthorityError::Encode(e.to_string()))
}

#[async_trait]
impl Authority for AuthorityApi {
    async fn add(&self, dimensions: Dimensions, index: Option<usize>) -> Result<CollectionSnapshot, AuthorityError> {
        let form = AddForm {
            width: dimensions.width.to_string(),
            length: dimensions.length.to_string(),
            index: index.map(|i| i.to_string()),
        };
        self.mutate(routes::ADD, &form).await
    }

    async fn update(&self, index: usize, dimensions: Dimensions) -> Result<CollectionSnapshot, AuthorityError> {
        let form = UpdateForm {
            index: index.to_string(),
            width: dimensions.width.to_string(),
            length: dimensions.length.to_string(),
        };
        self.mutate(routes::UPDATE, &form).await
    }

    async fn remove(&self, index: usize) -> Result<CollectionSnapshot, AuthorityError> {
        let form = RemoveForm {
            index: index.to_string(),
        };
        self.mutate(routes::REMOVE, &form).await
    }

    async fn reset(&self) -> Result<CollectionSnapshot, AuthorityError> {
        let response = self.client.post(self.url(routes::RESET)).send().await?;
        let envelope: MutationEnvelope = Self::parse_response(response).await?;
        Ok(envelope.into_snapshot()?)
    }

    async fn save(&self, name: &str, records: &[StoredPothole]) -> Result<(), AuthorityError> {
        let form = CollectionForm {
            filename: name.to_string(),
            potholes: encode(records)?,
        };
        let response = self.post_form(routes::SAVE, &form).await?;
        Self::acknowledge(response).await
    }

    async fn load(&self, name: &str) -> Result<CollectionSnapshot, AuthorityError> {
        let form = FilenameForm {
            filename: name.to_string(),
        };
        let response = self.post_form(routes::LOAD, &form).await?;
        Self::transfer(response).await
    }

    async fn export(&self, name: &str, records: &[StoredPothole]) -> Result<Download, AuthorityError> {
        let form = CollectionForm {
            filename: name.to_string(),
            potholes: encode(records)?,
        };
        let response = self.post_form(routes::EXPORT, &form).await?;
        Self::download(response, format!("{name}.xlsx")).await
    }

    async fn import(&self, upload: Upload) -> Result<CollectionSnapshot, AuthorityError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes).file_name(upload.filename);
        let form = reqwest::multipart::Form::new().part(IMPORT_FIELD, part);
        let response = self
            .client
            .post(self.url(routes::IMPORT))
            .multipart(form)
            .send()
            .await?;
        Self::transfer(response).await
    }

    async fn store_image(&self, data_url: String) -> Result<(), AuthorityError> {
        let form = ImageForm {
            image_data: data_url,
        };
        let response = self.post_form(routes::STORE_IMAGE, &form).await?;
        Self::acknowledge(response).await
    }

    async fn report(&self, name: &str) -> Result<Download, AuthorityError> {
        let form = FilenameForm {
            filename: name.to_string(),
        };
        let response = self.post_form(routes::REPORT, &form).await?;
        Self::download(response, format!("{name}.pdf")).await
    }
}
