//! The "error reported" acknowledgement responder.
//!
//! After a user submits an error report, the reporting tool bounces the
//! browser to `/portal/error-reported`. This handler claims that URL,
//! forwards the exchange to the portal's default view, and renders a fixed
//! thank-you page. Any other URL is passed down the chain.

use axum::{
  http::header,
  response::{IntoResponse, Response},
};

use crate::chain::{HandlerError, Outcome, PortalHandler, PortalRequest};

/// The marker segment this handler claims.
pub const ERROR_DONE_FRAGMENT: &str = "error-reported";

/// The fixed acknowledgement page.
const ACK_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head><title>Error reported</title></head>\n<body>\n<h1>Thank you</h1>\n<p>Your error report has been submitted to the site administrators.</p>\n</body>\n</html>\n";

// ─── Forwarding collaborator ─────────────────────────────────────────────────

/// Forwards an HTTP exchange to the portal's default view, with no extra
/// parameters. The portal framework owns what "forwarding" means; this
/// fragment only needs the hook.
pub trait ViewForwarder: Send + Sync {
  fn forward_default(
    &self,
    request: &PortalRequest<'_>,
  ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Forwarder for deployments where the default view needs no setup.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullForwarder;

impl ViewForwarder for NullForwarder {
  fn forward_default(
    &self,
    _: &PortalRequest<'_>,
  ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    Ok(())
  }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// Chain handler for the acknowledgement URL. GET and POST are identical.
pub struct ErrorDoneHandler<F> {
  forwarder: F,
}

impl<F> ErrorDoneHandler<F> {
  pub fn new(forwarder: F) -> Self {
    Self { forwarder }
  }
}

impl<F: ViewForwarder> PortalHandler for ErrorDoneHandler<F> {
  fn handle(&self, request: &PortalRequest<'_>) -> Result<Outcome, HandlerError> {
    if request.parts.len() < 2 || request.parts[1] != ERROR_DONE_FRAGMENT {
      return Ok(Outcome::Next);
    }
    self
      .forwarder
      .forward_default(request)
      .map_err(HandlerError::new)?;
    Ok(Outcome::Handled(ack_response()))
  }
}

fn ack_response() -> Response {
  (
    [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
    ACK_PAGE,
  )
    .into_response()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::http::{Method, StatusCode};

  use super::*;

  #[derive(Debug, thiserror::Error)]
  #[error("forward blew up")]
  struct ForwardFailure;

  struct FailingForwarder;

  impl ViewForwarder for FailingForwarder {
    fn forward_default(
      &self,
      _: &PortalRequest<'_>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
      Err(Box::new(ForwardFailure))
    }
  }

  #[test]
  fn matching_marker_is_handled_for_get_and_post() {
    let handler = ErrorDoneHandler::new(NullForwarder);
    for method in [Method::GET, Method::POST] {
      let request = PortalRequest::new(&method, "/error-reported");
      match handler.handle(&request).unwrap() {
        Outcome::Handled(response) => {
          assert_eq!(response.status(), StatusCode::OK)
        }
        Outcome::Next => panic!("marker URL must terminate the chain"),
      }
    }
  }

  #[test]
  fn trailing_segments_still_match() {
    let handler = ErrorDoneHandler::new(NullForwarder);
    let method = Method::GET;
    let request = PortalRequest::new(&method, "/error-reported/site/123");
    assert!(matches!(handler.handle(&request).unwrap(), Outcome::Handled(_)));
  }

  #[test]
  fn other_markers_continue_the_chain() {
    let handler = ErrorDoneHandler::new(NullForwarder);
    let method = Method::GET;
    for path in ["/site/home", "/"] {
      let request = PortalRequest::new(&method, path);
      assert!(matches!(handler.handle(&request).unwrap(), Outcome::Next));
    }
  }

  #[test]
  fn forward_failures_are_wrapped_with_the_cause() {
    let handler = ErrorDoneHandler::new(FailingForwarder);
    let method = Method::GET;
    let request = PortalRequest::new(&method, "/error-reported");
    let err = handler.handle(&request).unwrap_err();
    let source = std::error::Error::source(&err).expect("cause preserved");
    assert!(source.downcast_ref::<ForwardFailure>().is_some());
  }
}
