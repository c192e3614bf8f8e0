//! Uniform response validation.
//!
//! Every remote call in the workflow is validated by [`send_checked`], which
//! applies the same rule as [`check_response`] to the owned response. A call
//! passes only if a response arrived and its status is 2xx; anything else
//! halts the run with an error naming the action. 4xx and 5xx are not told
//! apart.

use crate::http::{HttpRequest, HttpResponse, Transport};
use std::borrow::Borrow;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CheckError {
    #[error("Request action '{action}' failed: {}", describe(.status))]
    Failed { action: String, status: Option<u16> },
}

fn describe(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "no response".to_string(),
    }
}

impl CheckError {
    pub fn action(&self) -> &str {
        match self {
            CheckError::Failed { action, .. } => action,
        }
    }
}

/// Whether `status` is in the 2xx range.
pub fn is_success(status: u16) -> bool {
    status / 100 == 2
}

/// Validate the outcome of a remote call labelled `action`.
///
/// `None` stands for "no response at all" (transport failure).
pub fn check_response(response: Option<&HttpResponse>, action: &str) -> Result<(), CheckError> {
    validate(response, action).map(|_| ())
}

/// Send `request` and validate the outcome as `action`.
///
/// A transport failure counts as "no response"; its cause is logged, not
/// propagated.
pub fn send_checked(
    transport: &dyn Transport,
    request: &HttpRequest,
    action: &str,
) -> Result<HttpResponse, CheckError> {
    let response = match transport.send(request) {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("Request action '{}' got no response: {}", action, e);
            None
        }
    };
    validate(response, action)
}

/// Pass a 2xx response through, owned or borrowed.
fn validate<R: Borrow<HttpResponse>>(response: Option<R>, action: &str) -> Result<R, CheckError> {
    match response {
        Some(r) if is_success(r.borrow().status) => {
            info!("Request action '{}' result: {}", action, r.borrow().status);
            Ok(r)
        }
        other => Err(CheckError::Failed {
            action: action.to_string(),
            status: other.map(|r| r.borrow().status),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::test_helpers::MockTransport;

    #[test]
    fn two_hundreds_pass() {
        for status in [200, 201, 204, 299] {
            let response = HttpResponse::new(status, Vec::new());
            assert!(
                check_response(Some(&response), "status check").is_ok(),
                "{status} should pass"
            );
        }
    }

    #[test]
    fn everything_else_fails_with_action() {
        for status in [100, 199, 300, 302, 404, 500, 503] {
            let response = HttpResponse::new(status, Vec::new());
            let err = check_response(Some(&response), "upload original picture").unwrap_err();
            assert_eq!(err.action(), "upload original picture");
            assert_eq!(
                err,
                CheckError::Failed {
                    action: "upload original picture".into(),
                    status: Some(status)
                }
            );
        }
    }

    #[test]
    fn missing_response_fails() {
        let err = check_response(None, "GAN image download").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Request action 'GAN image download' failed: no response"
        );
    }

    #[test]
    fn message_includes_status() {
        let response = HttpResponse::new(403, "forbidden");
        let err = check_response(Some(&response), "set profile picture").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Request action 'set profile picture' failed: status 403"
        );
    }

    #[test]
    fn send_checked_returns_response_on_success() {
        let transport = MockTransport::new(vec![Ok(HttpResponse::new(201, "created"))]);
        let request = HttpRequest::new(Method::Get, "https://example.test/");
        let response = send_checked(&transport, &request, "status check").unwrap();
        assert_eq!(response.text(), "created");
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn send_checked_maps_transport_failure_to_no_response() {
        let transport = MockTransport::new(vec![Err("connection refused".to_string())]);
        let request = HttpRequest::new(Method::Get, "https://example.test/");
        let err = send_checked(&transport, &request, "GAN image download").unwrap_err();
        assert_eq!(
            err,
            CheckError::Failed {
                action: "GAN image download".into(),
                status: None
            }
        );
    }

    #[test]
    fn send_checked_rejects_error_status() {
        let transport = MockTransport::new(vec![Ok(HttpResponse::new(500, "boom"))]);
        let request = HttpRequest::new(Method::Put, "https://example.test/up");
        let err = send_checked(&transport, &request, "upload display picture").unwrap_err();
        assert!(err.to_string().contains("status 500"));
    }

    #[test]
    fn send_checked_agrees_with_check_response() {
        for status in [200, 204, 299, 301, 404, 503] {
            let response = HttpResponse::new(status, "body");
            let transport = MockTransport::new(vec![Ok(response.clone())]);
            let request = HttpRequest::new(Method::Post, "https://example.test/");

            let sent = send_checked(&transport, &request, "status check");
            let checked = check_response(Some(&response), "status check");

            assert_eq!(sent.is_ok(), checked.is_ok(), "status {status}");
            match sent {
                Ok(r) => assert_eq!(r, response),
                Err(e) => assert_eq!(Err(e), checked),
            }
        }
    }
}
