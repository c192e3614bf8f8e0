//! Profile picture publishing workflow.
//!
//! A linear state machine. Every transition is gated by a check; the first
//! failure ends the run in the failed state with nothing rolled back.
//!
//! ```text
//! LoadSecrets → BuildContext → FetchSourceImage → RegisterPrimary → RegisterDisplay
//!   → SplitUploadUrls → UploadPrimary → UploadDisplay → CommitProfilePatch → Done
//!                                 (any step) ─────────────────────────────→ Failed
//! ```
//!
//! Outbound calls on the happy path, in order:
//!
//! | # | Call | Action label |
//! |---|------|--------------|
//! | 1 | `GET image_url` | `GAN image download` |
//! | 2 | `POST metadata_url?action=upload` | `original image metadata registration` |
//! | 3 | `POST metadata_url?action=upload` | `display image metadata registration` |
//! | 4 | `PUT <original upload url>` | `upload original picture` |
//! | 5 | `PUT <display upload url>` | `upload display picture` |
//! | 6 | `POST profile_url?versionTag=...` | `set profile picture` |
//!
//! A failure after step 4 leaves already-uploaded assets orphaned on the
//! remote side and the profile unchanged.

use crate::check::{CheckError, send_checked};
use crate::config::AppConfig;
use crate::context::{ContextError, RequestContext};
use crate::http::{HttpRequest, Method, Transport};
use crate::imaging::{BackendError, ImageBackend, process_image};
use crate::registrar::{RegistrationError, register_metadata};
use crate::secrets::{SecretError, SecretStore, Secrets};
use crate::types::{ImageRole, SplitUrl, UploadDescriptor};
use crate::url_split::{UrlSplitError, split_url};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Action label of the source image download.
pub const IMAGE_DOWNLOAD_ACTION: &str = "GAN image download";
/// Action label of the final profile patch.
pub const PROFILE_PATCH_ACTION: &str = "set profile picture";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Secret(#[from] SecretError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Request(#[from] CheckError),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    UrlSplit(#[from] UrlSplitError),
    #[error("Image processing failed: {0}")]
    Transform(#[from] BackendError),
    #[error("Failed to encode profile patch: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Coarse error category, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A secret or a value derived from one is missing or malformed.
    Configuration,
    /// A call got no response or a non-2xx status.
    RemoteCall,
    /// A 2xx response did not have the expected shape.
    Protocol,
    /// The image could not be decoded, composited or encoded.
    Transform,
}

impl PublishError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PublishError::Secret(_) | PublishError::Context(_) => ErrorKind::Configuration,
            PublishError::Request(_) | PublishError::Registration(RegistrationError::Request(_)) => {
                ErrorKind::RemoteCall
            }
            PublishError::Registration(_) | PublishError::UrlSplit(_) | PublishError::Payload(_) => {
                ErrorKind::Protocol
            }
            PublishError::Transform(_) => ErrorKind::Transform,
        }
    }
}

/// States of the workflow. `Failed` is reported through [`PublishFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PublishState {
    LoadSecrets,
    BuildContext,
    FetchSourceImage,
    RegisterPrimary,
    RegisterDisplay,
    SplitUploadUrls,
    UploadPrimary,
    UploadDisplay,
    CommitProfilePatch,
    Done,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A run that reached [`PublishState::Done`].
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Every state entered, in order.
    pub states: Vec<PublishState>,
    pub original: UploadDescriptor,
    pub display: UploadDescriptor,
    /// Size of the processed JPEG uploaded under both roles.
    pub image_bytes: usize,
}

/// A run that stopped early.
#[derive(Error, Debug)]
#[error("workflow failed in state {state}: {error}")]
pub struct PublishFailure {
    /// The state that was executing when the error occurred.
    pub state: PublishState,
    /// Every state entered before halting, `state` included.
    pub states: Vec<PublishState>,
    #[source]
    pub error: PublishError,
}

#[derive(Serialize)]
struct ProfilePicturePatch<'a> {
    patch: PatchBody<'a>,
}

#[derive(Serialize)]
struct PatchBody<'a> {
    #[serde(rename = "profilePicture")]
    profile_picture: SetOperation<'a>,
}

#[derive(Serialize)]
struct SetOperation<'a> {
    #[serde(rename = "$set")]
    set: PictureUrns<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PictureUrns<'a> {
    original_image_urn: &'a str,
    display_image_urn: &'a str,
}

/// JSON body of the profile patch referencing both uploaded urns.
pub fn profile_patch_body(original_urn: &str, display_urn: &str) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&ProfilePicturePatch {
        patch: PatchBody {
            profile_picture: SetOperation {
                set: PictureUrns {
                    original_image_urn: original_urn,
                    display_image_urn: display_urn,
                },
            },
        },
    })
}

#[derive(Default)]
struct StateTrace {
    states: Vec<PublishState>,
}

impl StateTrace {
    fn enter(&mut self, state: PublishState) {
        debug!(%state, "entering state");
        self.states.push(state);
    }

    fn current(&self) -> PublishState {
        self.states
            .last()
            .copied()
            .unwrap_or(PublishState::LoadSecrets)
    }
}

/// Runs the workflow against a transport and an image backend.
pub struct Publisher<'a, B: ImageBackend> {
    config: &'a AppConfig,
    transport: &'a dyn Transport,
    backend: &'a B,
}

impl<'a, B: ImageBackend> Publisher<'a, B> {
    pub fn new(config: &'a AppConfig, transport: &'a dyn Transport, backend: &'a B) -> Self {
        Self {
            config,
            transport,
            backend,
        }
    }

    /// Run every state once, in order, stopping at the first failure.
    pub fn run(&self, store: &dyn SecretStore) -> Result<PublishReport, PublishFailure> {
        let mut trace = StateTrace::default();
        match self.drive(store, &mut trace) {
            Ok(report) => Ok(report),
            Err(error) => Err(PublishFailure {
                state: trace.current(),
                states: trace.states,
                error,
            }),
        }
    }

    fn drive(
        &self,
        store: &dyn SecretStore,
        trace: &mut StateTrace,
    ) -> Result<PublishReport, PublishError> {
        trace.enter(PublishState::LoadSecrets);
        let secrets = Secrets::load(store, &self.config.secrets)?;

        trace.enter(PublishState::BuildContext);
        let ctx = RequestContext::build(&secrets, self.config)?;

        trace.enter(PublishState::FetchSourceImage);
        let image = self.fetch_source_image()?;

        trace.enter(PublishState::RegisterPrimary);
        let original = register_metadata(self.transport, &ctx, &image, ImageRole::Original)?;

        trace.enter(PublishState::RegisterDisplay);
        let display = register_metadata(self.transport, &ctx, &image, ImageRole::Display)?;

        trace.enter(PublishState::SplitUploadUrls);
        let original_target = split_url(&original.upload_url)?;
        let display_target = split_url(&display.upload_url)?;

        trace.enter(PublishState::UploadPrimary);
        self.upload(&ctx, &original_target, &image, ImageRole::Original)?;

        trace.enter(PublishState::UploadDisplay);
        self.upload(&ctx, &display_target, &image, ImageRole::Display)?;

        trace.enter(PublishState::CommitProfilePatch);
        self.commit(&ctx, &original, &display)?;

        trace.enter(PublishState::Done);
        Ok(PublishReport {
            states: trace.states.clone(),
            original,
            display,
            image_bytes: image.len(),
        })
    }

    /// Download a face and brand it. The generator needs no auth headers.
    fn fetch_source_image(&self) -> Result<Vec<u8>, PublishError> {
        let request = HttpRequest::new(Method::Get, &self.config.endpoints.image_url);
        let response = send_checked(self.transport, &request, IMAGE_DOWNLOAD_ACTION)?;
        Ok(process_image(
            self.backend,
            &response.body,
            &self.config.image,
        )?)
    }

    fn upload(
        &self,
        ctx: &RequestContext,
        target: &SplitUrl,
        image: &[u8],
        role: ImageRole,
    ) -> Result<(), PublishError> {
        let request = HttpRequest::new(Method::Put, &target.base)
            .queries(target.params.iter().cloned())
            .headers(ctx.request_headers())
            .header("Content-Length", image.len().to_string())
            .header("Content-Type", "image/jpeg")
            .body(image.to_vec());
        send_checked(self.transport, &request, &role.upload_action())?;
        Ok(())
    }

    fn commit(
        &self,
        ctx: &RequestContext,
        original: &UploadDescriptor,
        display: &UploadDescriptor,
    ) -> Result<(), PublishError> {
        let body = profile_patch_body(&original.urn, &display.urn)?;
        let request = HttpRequest::new(Method::Post, &ctx.profile_url)
            .query("versionTag", &self.config.endpoints.version_tag)
            .headers(ctx.request_headers())
            .body(body);
        send_checked(self.transport, &request, PROFILE_PATCH_ACTION)?;
        Ok(())
    }
}
