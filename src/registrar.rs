//! Upload-metadata registration.
//!
//! Before any bytes move, the service wants each image declared: its role,
//! its size and a file name. The answer names a one-time upload URL and the
//! urn the image will be known by.
//!
//! ```text
//! POST {metadata_url}?action=upload
//! {"mediaUploadType":"PROFILE_ORIGINAL_PHOTO","fileSize":48211,"filename":"pic.jpeg"}
//!
//! 200 {"data":{"value":{"singleUploadUrl":"https://...?...","urn":"urn:li:digitalmediaAsset:..."}}}
//! ```

use crate::check::{CheckError, send_checked};
use crate::context::RequestContext;
use crate::http::{HttpRequest, Method, Transport};
use crate::types::{ImageRole, UploadDescriptor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error(transparent)]
    Request(#[from] CheckError),
    #[error("Missing urn or upload URL after {action}")]
    MissingField { action: String },
    #[error("Unreadable response body after {action}: {reason}")]
    InvalidBody { action: String, reason: String },
    #[error("Failed to encode metadata payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Request body declaring one image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPayload<'a> {
    pub media_upload_type: &'a str,
    pub file_size: usize,
    pub filename: &'a str,
}

impl<'a> MetadataPayload<'a> {
    pub fn for_image(role: ImageRole, image: &[u8]) -> Self {
        Self {
            media_upload_type: role.upload_type(),
            file_size: image.len(),
            filename: role.filename(),
        }
    }
}

/// `{"data":{"value":{...}}}`, every level optional.
#[derive(Debug, Default, Deserialize)]
struct RegistrationResponse {
    #[serde(default)]
    data: Option<RegistrationData>,
}

#[derive(Debug, Default, Deserialize)]
struct RegistrationData {
    #[serde(default)]
    value: Option<RegistrationValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationValue {
    #[serde(default)]
    single_upload_url: Option<String>,
    #[serde(default)]
    urn: Option<String>,
}

impl RegistrationResponse {
    /// Upload URL and urn, if both are present and non-empty.
    fn into_parts(self) -> Option<(String, String)> {
        let value = self.data?.value?;
        let url = value.single_upload_url.filter(|s| !s.is_empty())?;
        let urn = value.urn.filter(|s| !s.is_empty())?;
        Some((url, urn))
    }
}

/// Register `image` under `role` and return where to upload it.
///
/// One call, one validation, one parse. No retry.
pub fn register_metadata(
    transport: &dyn Transport,
    ctx: &RequestContext,
    image: &[u8],
    role: ImageRole,
) -> Result<UploadDescriptor, RegistrationError> {
    let action = role.registration_action();
    let payload = serde_json::to_vec(&MetadataPayload::for_image(role, image))?;

    let request = HttpRequest::new(Method::Post, &ctx.metadata_url)
        .query("action", "upload")
        .headers(ctx.request_headers())
        .body(payload);
    let response = send_checked(transport, &request, &action)?;

    let parsed: RegistrationResponse =
        serde_json::from_slice(&response.body).map_err(|e| RegistrationError::InvalidBody {
            action: action.clone(),
            reason: e.to_string(),
        })?;
    let (upload_url, urn) = parsed
        .into_parts()
        .ok_or(RegistrationError::MissingField { action })?;

    debug!(%role, %urn, "registered upload metadata");
    Ok(UploadDescriptor {
        role,
        upload_url,
        urn,
    })
}
