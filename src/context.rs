//! Request context shared by every authenticated call.
//!
//! Built once from the loaded [`Secrets`] and the `[http]` / `[endpoints]`
//! config sections, then only ever borrowed.

use crate::config::AppConfig;
use crate::secrets::Secrets;
use std::collections::BTreeMap;
use thiserror::Error;

/// Cookie whose unquoted value doubles as the CSRF token.
pub const SESSION_COOKIE: &str = "JSESSIONID";

const ACCEPT: &str = "application/vnd.linkedin.normalized+json+2.1";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("cookie JSESSIONID is missing")]
    MissingSessionCookie,
    #[error("cookie JSESSIONID must be a non-empty double-quoted value")]
    MalformedSessionCookie,
}

/// Fixed headers, cookies and endpoint URLs for one workflow run.
#[derive(Clone)]
pub struct RequestContext {
    headers: Vec<(String, String)>,
    cookies: BTreeMap<String, String>,
    /// Upload-metadata registration endpoint.
    pub metadata_url: String,
    /// Profile record endpoint, with the encoded profile urn appended.
    pub profile_url: String,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("header_names", &self.header_names())
            .field("cookie_names", &self.cookies.keys().collect::<Vec<_>>())
            .field("metadata_url", &self.metadata_url)
            .field("profile_url", &self.profile_url)
            .finish()
    }
}

impl RequestContext {
    pub fn build(secrets: &Secrets, config: &AppConfig) -> Result<Self, ContextError> {
        let raw = secrets
            .cookies
            .get(SESSION_COOKIE)
            .ok_or(ContextError::MissingSessionCookie)?;
        let csrf = csrf_token(raw)?;
        let http = &config.http;

        let headers = vec![
            ("User-Agent".to_string(), http.user_agent.clone()),
            ("accept".to_string(), ACCEPT.to_string()),
            ("csrf-token".to_string(), csrf.to_string()),
            ("Sec-Fetch-Site".to_string(), "same-origin".to_string()),
            ("Sec-Fetch-Mode".to_string(), "cors".to_string()),
            ("Sec-Fetch-Dest".to_string(), "empty".to_string()),
            ("Referer".to_string(), secrets.profile_page.clone()),
            ("Accept-Language".to_string(), http.accept_language.clone()),
            ("Host".to_string(), http.host.clone()),
            (
                "X-Restli-Protocol-Version".to_string(),
                http.restli_protocol_version.clone(),
            ),
        ];

        Ok(Self {
            headers,
            cookies: secrets.cookies.clone(),
            metadata_url: config.endpoints.metadata_url.clone(),
            profile_url: format!(
                "{}/{}",
                config.endpoints.profile_url.trim_end_matches('/'),
                secrets.profile_urn
            ),
        })
    }

    pub fn header_names(&self) -> Vec<&str> {
        self.headers.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn cookie_names(&self) -> Vec<&str> {
        self.cookies.keys().map(String::as_str).collect()
    }

    /// Context headers followed by a single `Cookie` header, ready to send.
    pub fn request_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if !self.cookies.is_empty() {
            headers.push(("Cookie".to_string(), self.cookie_header()));
        }
        headers
    }

    /// `name=value; name2=value2`, in name order.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Strip the surrounding double quotes from the session cookie value.
///
/// The service stores `JSESSIONID` as `"ajax:..."`; the CSRF header wants the
/// bare interior.
pub fn csrf_token(cookie_value: &str) -> Result<&str, ContextError> {
    cookie_value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .filter(|inner| !inner.is_empty())
        .ok_or(ContextError::MalformedSessionCookie)
}
