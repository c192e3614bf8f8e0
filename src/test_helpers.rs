//! Shared test utilities.
//!
//! Provides a recording [`MockTransport`], an in-memory secret store, the
//! standard secret fixture, and small image builders.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let transport = MockTransport::new(vec![Ok(HttpResponse::new(200, "{}"))]);
//! // ... run code against &transport ...
//! assert_eq!(transport.requests()[0].method, Method::Get);
//! ```

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::secrets::{SecretError, SecretStore, Secrets};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io::Cursor;
use std::path::{Path, PathBuf};

// =========================================================================
// Transport
// =========================================================================

/// Transport that records every request and replays canned outcomes in order.
///
/// `Err(reason)` entries simulate "no response". Running out of canned
/// outcomes is also "no response".
pub struct MockTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(outcomes: Vec<Result<HttpResponse, String>>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        let outcome = self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no canned response left".to_string()));
        outcome.map_err(|reason| TransportError::Request {
            method: request.method,
            url: request.url.clone(),
            reason,
        })
    }
}

/// A registration response body carrying `upload_url` and `urn`.
pub fn registration_body(upload_url: &str, urn: &str) -> String {
    serde_json::json!({
        "data": {"value": {"singleUploadUrl": upload_url, "urn": urn}}
    })
    .to_string()
}

// =========================================================================
// Secrets
// =========================================================================

/// In-memory [`SecretStore`].
#[derive(Default)]
pub struct MapSecretStore {
    values: BTreeMap<String, String>,
}

impl MapSecretStore {
    /// The three default-named secrets with valid values.
    pub fn standard() -> Self {
        let mut store = Self::default();
        store.insert(
            "linkedGAN_linkedin_profile_page",
            "https://www.linkedin.com/in/someone/",
        );
        store.insert(
            "linkedGAN_encoded_profile_urn",
            "urn%3Ali%3Afsd_profile%3AABC123",
        );
        store.insert(
            "linkedGAN_cookies",
            r#"{"JSESSIONID": "\"ajax:0123456789\"", "li_at": "token"}"#,
        );
        store
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }
}

impl SecretStore for MapSecretStore {
    fn get(&self, name: &str) -> Result<String, SecretError> {
        self.values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| SecretError::Missing(name.to_string()))
    }
}

/// [`Secrets`] as loaded from [`MapSecretStore::standard`].
pub fn sample_secrets() -> Secrets {
    Secrets {
        profile_page: "https://www.linkedin.com/in/someone/".to_string(),
        profile_urn: "urn%3Ali%3Afsd_profile%3AABC123".to_string(),
        cookies: BTreeMap::from([
            ("JSESSIONID".to_string(), "\"ajax:0123456789\"".to_string()),
            ("li_at".to_string(), "token".to_string()),
        ]),
    }
}

// =========================================================================
// Images
// =========================================================================

pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
}

/// Encode an RGB image as PNG bytes.
pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Write a `size`×`size` overlay to `dir`: opaque red for rows `< band`,
/// fully transparent below. Returns its path.
pub fn write_overlay(dir: &Path, size: u32, band: u32) -> PathBuf {
    let overlay = RgbaImage::from_fn(size, size, |_, y| {
        if y < band {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let path = dir.join("overlay.png");
    overlay.save(&path).unwrap();
    path
}
