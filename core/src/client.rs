//! Request builder, response interpreter and dispatcher for the Akismet API.
//!
//! # Design
//! `AkismetClient` holds only immutable configuration plus the transport,
//! and carries no mutable state between calls. Each operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the operation itself (`verify_key`,
//! `check_comment`, ...) runs the pair around one `HttpTransport::send`.
//! Callers with their own I/O (async runtimes, foreign hosts) can use the
//! pairs directly and skip the transport entirely.
//!
//! Every response goes through `check_response` before its body is
//! interpreted; service-side failures never reach the `parse_*` logic.

use std::fmt;
use std::sync::Arc;

use url::{Host, Url};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::model::{keys, Blog, Comment, WireMap};
use crate::observer::RequestObserver;
use crate::types::CheckResult;

/// Body returned by the submit endpoints on success.
pub const SUCCESS_ACK: &str = "Thanks for making the web a better place.";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

pub const ALERT_CODE_HEADER: &str = "X-akismet-alert-code";
pub const ALERT_MSG_HEADER: &str = "X-akismet-alert-msg";
pub const DEBUG_HELP_HEADER: &str = "X-akismet-debug-help";
pub const PRO_TIP_HEADER: &str = "X-akismet-pro-tip";

/// API operations, named by their path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    VerifyKey,
    CommentCheck,
    SubmitHam,
    SubmitSpam,
}

impl Operation {
    pub fn path(self) -> &'static str {
        match self {
            Operation::VerifyKey => "verify-key",
            Operation::CommentCheck => "comment-check",
            Operation::SubmitHam => "submit-ham",
            Operation::SubmitSpam => "submit-spam",
        }
    }
}

/// Pieces of the base URL the per-key endpoint is assembled from.
#[derive(Debug, Clone)]
struct Endpoint {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl Endpoint {
    fn parse(base_url: &str) -> ClientResult<Self> {
        let invalid = |message: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            message,
        };
        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        let host = match url.host() {
            Some(Host::Ipv6(_)) => return Err(invalid("IPv6 hosts cannot carry the API key label".to_string())),
            Some(host) => host.to_string(),
            None => return Err(invalid("missing host".to_string())),
        };
        let mut path = url.path().to_string();
        if !path.ends_with('/') {
            path.push('/');
        }
        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
            path,
        })
    }

    /// `{scheme}://{api_key}.{host}[:port]{path}{operation}`
    fn url_for(&self, api_key: &str, operation: Operation) -> String {
        let port = self.port.map(|port| format!(":{port}")).unwrap_or_default();
        format!(
            "{}://{}.{}{}{}{}",
            self.scheme,
            api_key,
            self.host,
            port,
            self.path,
            operation.path()
        )
    }
}

/// Client for the Akismet comment-spam API.
///
/// `T` is the transport; the `build_*` / `parse_*` methods work for any `T`,
/// the network operations need `T: HttpTransport`.
pub struct AkismetClient<T> {
    transport: T,
    api_key: String,
    blog: Blog,
    test_mode: bool,
    user_agent: String,
    endpoint: Endpoint,
    observer: Option<Arc<dyn RequestObserver + Send + Sync>>,
}

impl<T> AkismetClient<T> {
    /// Fails only when the configured base URL cannot be parsed. The API key
    /// is checked by the service, not here.
    pub fn new(config: ClientConfig, transport: T) -> ClientResult<Self> {
        let endpoint = Endpoint::parse(&config.base_url)?;
        Ok(Self {
            transport,
            api_key: config.api_key,
            blog: config.blog,
            test_mode: config.test_mode,
            user_agent: config.user_agent,
            endpoint,
            observer: config.observer,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL for an operation, with the API key as the leading host label.
    pub fn endpoint_url(&self, operation: Operation) -> String {
        self.endpoint.url_for(&self.api_key, operation)
    }

    pub fn build_verify_key(&self) -> HttpRequest {
        let mut fields = WireMap::new();
        fields.insert(keys::API_KEY.to_string(), self.api_key.clone());
        self.build_request(Operation::VerifyKey, fields)
    }

    pub fn build_comment_check(&self, comment: &Comment) -> HttpRequest {
        self.build_request(Operation::CommentCheck, comment.to_wire())
    }

    pub fn build_submit_ham(&self, comment: &Comment) -> HttpRequest {
        self.build_request(Operation::SubmitHam, comment.to_wire())
    }

    pub fn build_submit_spam(&self, comment: &Comment) -> HttpRequest {
        self.build_request(Operation::SubmitSpam, comment.to_wire())
    }

    /// Blog fields, overlaid with the operation's fields, plus the test
    /// marker when enabled.
    pub fn form_fields(&self, fields: WireMap) -> WireMap {
        let mut merged = self.blog.to_wire();
        merged.extend(fields);
        if self.test_mode {
            merged.insert(keys::IS_TEST.to_string(), "1".to_string());
        }
        merged
    }

    fn build_request(&self, operation: Operation, fields: WireMap) -> HttpRequest {
        let fields = self.form_fields(fields);
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields.iter())
            .finish();
        HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint_url(operation),
            headers: vec![
                ("User-Agent".to_string(), self.user_agent.clone()),
                ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body,
        }
    }

    /// `true` only for the exact body `valid`.
    pub fn parse_verify_key(&self, response: HttpResponse) -> ClientResult<bool> {
        let response = check_response(response, &self.endpoint_url(Operation::VerifyKey))?;
        Ok(response.body == "valid")
    }

    pub fn parse_comment_check(&self, response: HttpResponse) -> ClientResult<CheckResult> {
        let response = check_response(response, &self.endpoint_url(Operation::CommentCheck))?;
        if response.body == "false" {
            return Ok(CheckResult::Ham);
        }
        if response.header(PRO_TIP_HEADER) == Some("discard") {
            return Ok(CheckResult::PervasiveSpam);
        }
        Ok(CheckResult::Spam)
    }

    pub fn parse_submit_ham(&self, response: HttpResponse) -> ClientResult<()> {
        parse_submission(response, &self.endpoint_url(Operation::SubmitHam))
    }

    pub fn parse_submit_spam(&self, response: HttpResponse) -> ClientResult<()> {
        parse_submission(response, &self.endpoint_url(Operation::SubmitSpam))
    }
}

impl<T: HttpTransport> AkismetClient<T> {
    /// Check the API key against the service. An unknown key yields
    /// `Ok(false)`; only transport and protocol failures are errors.
    pub fn verify_key(&self) -> ClientResult<bool> {
        let response = self.execute(Operation::VerifyKey, &self.build_verify_key())?;
        self.parse_verify_key(response)
    }

    pub fn check_comment(&self, comment: &Comment) -> ClientResult<CheckResult> {
        let response = self.execute(Operation::CommentCheck, &self.build_comment_check(comment))?;
        self.parse_comment_check(response)
    }

    /// Report a false positive.
    pub fn submit_ham(&self, comment: &Comment) -> ClientResult<()> {
        let response = self.execute(Operation::SubmitHam, &self.build_submit_ham(comment))?;
        self.parse_submit_ham(response)
    }

    /// Report spam the service missed.
    pub fn submit_spam(&self, comment: &Comment) -> ClientResult<()> {
        let response = self.execute(Operation::SubmitSpam, &self.build_submit_spam(comment))?;
        self.parse_submit_spam(response)
    }

    fn execute(&self, operation: Operation, request: &HttpRequest) -> ClientResult<HttpResponse> {
        if let Some(observer) = &self.observer {
            observer.on_request(request);
        }
        tracing::debug!(
            operation = operation.path(),
            host = %self.endpoint.host,
            test_mode = self.test_mode,
            "sending request"
        );

        let response = self.transport.send(request).map_err(|e| {
            tracing::debug!(operation = operation.path(), error = %e, "transport failure");
            ClientError::Transport {
                message: e.message,
                url: request.url.clone(),
            }
        })?;

        tracing::debug!(operation = operation.path(), status = response.status, "response received");
        if let Some(observer) = &self.observer {
            observer.on_response(request, &response);
        }
        Ok(response)
    }
}

impl<T> fmt::Debug for AkismetClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AkismetClient")
            .field("blog", &self.blog)
            .field("test_mode", &self.test_mode)
            .field("user_agent", &self.user_agent)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Turn status and service headers into errors; pass anything else through.
///
/// Alert headers are checked before the status code.
fn check_response(response: HttpResponse, url: &str) -> ClientResult<HttpResponse> {
    if let Some(code) = response.header(ALERT_CODE_HEADER) {
        let code = code.trim().parse::<i64>().unwrap_or_default();
        let message = response.header(ALERT_MSG_HEADER).unwrap_or_default().to_string();
        tracing::warn!(code, message = %message, "service alert");
        return Err(ClientError::Alert {
            code,
            message,
            url: url.to_string(),
        });
    }
    if !response.is_success() {
        return Err(ClientError::Status {
            status: response.status,
            reason: reason_phrase(&response),
            url: url.to_string(),
        });
    }
    if let Some(help) = response.header(DEBUG_HELP_HEADER) {
        tracing::warn!(help, "service rejected request");
        return Err(ClientError::DebugHelp {
            message: help.to_string(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

fn parse_submission(response: HttpResponse, url: &str) -> ClientResult<()> {
    let response = check_response(response, url)?;
    if response.body != SUCCESS_ACK {
        return Err(ClientError::InvalidResponse { url: url.to_string() });
    }
    Ok(())
}

fn reason_phrase(response: &HttpResponse) -> String {
    if response.reason.is_empty() {
        format!("HTTP {}", response.status)
    } else {
        response.reason.clone()
    }
}
