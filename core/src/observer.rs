//! Request/response instrumentation hook.

use crate::http::{HttpRequest, HttpResponse};

/// Notified around every exchange the client performs.
///
/// `on_request` runs right before the transport is called; `on_response`
/// runs once a response arrives, before it is interpreted. Neither can
/// alter the exchange. Both default to no-ops.
pub trait RequestObserver {
    fn on_request(&self, _request: &HttpRequest) {}

    fn on_response(&self, _request: &HttpRequest, _response: &HttpResponse) {}
}
