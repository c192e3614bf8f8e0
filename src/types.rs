//! Shared types passed between workflow steps.

use serde::Serialize;
use std::fmt;

/// Which profile-picture slot an upload fills.
///
/// Both roles carry the same processed bytes; the service still wants them
/// registered and uploaded separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// Full-resolution picture.
    Original,
    /// Thumbnail shown in compact contexts.
    Display,
}

impl ImageRole {
    /// `mediaUploadType` value declared at registration.
    pub fn upload_type(self) -> &'static str {
        match self {
            ImageRole::Original => "PROFILE_ORIGINAL_PHOTO",
            ImageRole::Display => "PROFILE_DISPLAY_PHOTO",
        }
    }

    /// File name declared at registration.
    pub fn filename(self) -> &'static str {
        match self {
            ImageRole::Original => "pic.jpeg",
            ImageRole::Display => "pic-display.jpeg",
        }
    }

    /// Action label for the registration call.
    pub fn registration_action(self) -> String {
        format!("{self} image metadata registration")
    }

    /// Action label for the binary upload.
    pub fn upload_action(self) -> String {
        format!("upload {self} picture")
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageRole::Original => "original",
            ImageRole::Display => "display",
        })
    }
}

/// Where to upload one image and the urn the service assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadDescriptor {
    pub role: ImageRole,
    /// One-time upload destination, query parameters included.
    pub upload_url: String,
    /// Opaque resource identifier referenced by the profile patch.
    pub urn: String,
}

/// An upload URL taken apart for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    /// `scheme://authority/path`.
    pub base: String,
    /// Query parameters, first occurrence of each key only.
    pub params: Vec<(String, String)>,
}

impl SplitUrl {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
