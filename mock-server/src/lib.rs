use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Form, Router,
};
use tokio::net::TcpListener;

pub const DEFAULT_KEY: &str = "mock-key";
pub const SUCCESS_ACK: &str = "Thanks for making the web a better place.";

/// Author name that is always classified as spam.
pub const SPAM_TEST_AUTHOR: &str = "viagra-test-123";
/// Author email that is always classified as spam safe to discard.
pub const DISCARD_TEST_EMAIL: &str = "akismet-guaranteed-spam@example.com";

pub const SUSPENDED_ALERT_CODE: &str = "10003";
pub const SUSPENDED_ALERT_MSG: &str = "Your API key has been suspended.";

const ALERT_CODE: &str = "x-akismet-alert-code";
const ALERT_MSG: &str = "x-akismet-alert-msg";
const DEBUG_HELP: &str = "x-akismet-debug-help";
const PRO_TIP: &str = "x-akismet-pro-tip";

type Fields = HashMap<String, String>;

/// API keys the server knows about.
#[derive(Debug, Clone, Default)]
pub struct Accounts {
    valid: HashSet<String>,
    suspended: HashSet<String>,
}

impl Accounts {
    pub fn new<I, S>(valid: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid: valid.into_iter().map(Into::into).collect(),
            suspended: HashSet::new(),
        }
    }

    /// Suspended keys still verify but every other call answers with an alert.
    pub fn with_suspended(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.valid.insert(key.clone());
        self.suspended.insert(key);
        self
    }

    fn is_valid(&self, key: &str) -> bool {
        self.valid.contains(key)
    }

    fn is_suspended(&self, key: &str) -> bool {
        self.suspended.contains(key)
    }
}

type Db = Arc<Accounts>;

pub fn app() -> Router {
    app_with(Accounts::new([DEFAULT_KEY]))
}

pub fn app_with(accounts: Accounts) -> Router {
    Router::new()
        .route("/1.1/verify-key", post(verify_key))
        .route("/1.1/comment-check", post(comment_check))
        .route("/1.1/submit-ham", post(submit))
        .route("/1.1/submit-spam", post(submit))
        .with_state(Arc::new(accounts))
}

pub async fn run_with(listener: TcpListener, accounts: Accounts) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(accounts)).await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Ham,
    Spam,
    Discard,
}

fn classify(fields: &Fields) -> Verdict {
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();
    if field("user_role") == "administrator" {
        return Verdict::Ham;
    }
    if field("comment_author_email") == DISCARD_TEST_EMAIL {
        return Verdict::Discard;
    }
    if field("comment_author") == SPAM_TEST_AUTHOR {
        return Verdict::Spam;
    }
    Verdict::Ham
}

/// The API key is the first label of the requested host. A fronting proxy
/// may pass the original host in `X-Forwarded-Host`.
fn key_from_host(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())
        .and_then(|host| host.split_once('.'))
        .map(|(label, _)| label.to_string())
}

fn reply(body: &'static str, headers: &[(&'static str, &str)]) -> Response {
    let mut response = body.into_response();
    for (name, value) in headers {
        if let Ok(value) = HeaderValue::from_str(value) {
            response.headers_mut().insert(*name, value);
        }
    }
    response
}

fn authorize(accounts: &Accounts, key: Option<&str>) -> Result<(), Response> {
    let key = key.unwrap_or_default();
    if !accounts.is_valid(key) {
        return Err(reply("invalid", &[(DEBUG_HELP, "Invalid API key.")]));
    }
    if accounts.is_suspended(key) {
        return Err(reply(
            "",
            &[(ALERT_CODE, SUSPENDED_ALERT_CODE), (ALERT_MSG, SUSPENDED_ALERT_MSG)],
        ));
    }
    Ok(())
}

fn require(fields: &Fields, names: &[&str]) -> Result<(), Response> {
    for name in names {
        if fields.get(*name).map_or(true, String::is_empty) {
            let help = format!("Empty \"{name}\" value");
            return Err(reply("invalid", &[(DEBUG_HELP, help.as_str())]));
        }
    }
    Ok(())
}

async fn verify_key(State(db): State<Db>, Form(fields): Form<Fields>) -> Response {
    if let Err(response) = require(&fields, &["key", "blog"]) {
        return response;
    }
    let key = fields["key"].as_str();
    let valid = db.is_valid(key);
    tracing::info!(valid, "verify-key");
    reply(if valid { "valid" } else { "invalid" }, &[])
}

async fn comment_check(State(db): State<Db>, headers: HeaderMap, Form(fields): Form<Fields>) -> Response {
    let checked = authorize(&db, key_from_host(&headers).as_deref())
        .and_then(|()| require(&fields, &["blog", "user_ip"]));
    if let Err(response) = checked {
        return response;
    }
    let verdict = classify(&fields);
    tracing::info!(?verdict, is_test = fields.contains_key("is_test"), "comment-check");
    match verdict {
        Verdict::Ham => reply("false", &[]),
        Verdict::Spam => reply("true", &[]),
        Verdict::Discard => reply("true", &[(PRO_TIP, "discard")]),
    }
}

async fn submit(State(db): State<Db>, headers: HeaderMap, Form(fields): Form<Fields>) -> Response {
    let checked = authorize(&db, key_from_host(&headers).as_deref())
        .and_then(|()| require(&fields, &["blog", "user_ip"]));
    if let Err(response) = checked {
        return response;
    }
    tracing::info!(is_test = fields.contains_key("is_test"), "submission");
    reply(SUCCESS_ACK, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn administrators_are_ham() {
        let f = fields(&[("user_role", "administrator"), ("comment_author", SPAM_TEST_AUTHOR)]);
        assert_eq!(classify(&f), Verdict::Ham);
    }

    #[test]
    fn sentinel_author_is_spam() {
        assert_eq!(classify(&fields(&[("comment_author", SPAM_TEST_AUTHOR)])), Verdict::Spam);
    }

    #[test]
    fn sentinel_email_is_discardable() {
        let f = fields(&[("comment_author_email", DISCARD_TEST_EMAIL)]);
        assert_eq!(classify(&f), Verdict::Discard);
    }

    #[test]
    fn ordinary_comment_is_ham() {
        assert_eq!(classify(&fields(&[("comment_author", "Alice")])), Verdict::Ham);
    }

    #[test]
    fn key_comes_from_first_host_label() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("abc.rest.akismet.com"));
        assert_eq!(key_from_host(&headers).as_deref(), Some("abc"));

        headers.insert("x-forwarded-host", HeaderValue::from_static("xyz.127.0.0.1:3000"));
        assert_eq!(key_from_host(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn suspended_keys_are_still_valid() {
        let accounts = Accounts::new(["a"]).with_suspended("b");
        assert!(accounts.is_valid("b"));
        assert!(accounts.is_suspended("b"));
        assert!(!accounts.is_suspended("a"));
    }
}
