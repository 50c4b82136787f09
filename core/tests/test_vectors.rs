//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes a client configuration, an input comment, the
//! expected request, a simulated response and the expected result or error.
//! Request bodies are decoded back into field maps before comparison so the
//! check does not depend on field order.

use akismet_core::{
    AkismetClient, Blog, CheckResult, ClientConfig, ClientError, Comment, HttpMethod, HttpRequest, HttpResponse,
    WireMap,
};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn client(config: &Value) -> AkismetClient<()> {
    let mut built = ClientConfig::new(config["api_key"].as_str().unwrap(), Blog::from_json(&config["blog"]))
        .test_mode(config["test_mode"].as_bool().unwrap_or(false))
        .user_agent("TestVectors/1.0");
    if let Some(base_url) = config["base_url"].as_str() {
        built = built.base_url(base_url);
    }
    AkismetClient::new(built, ()).unwrap()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn verify_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
    assert_eq!(req.header("User-Agent"), Some("TestVectors/1.0"), "{name}: user agent");
    assert_eq!(
        req.header("Content-Type"),
        Some("application/x-www-form-urlencoded; charset=utf-8"),
        "{name}: content type"
    );

    let fields: WireMap = url::form_urlencoded::parse(req.body.as_bytes()).into_owned().collect();
    let expected_fields: WireMap = serde_json::from_value(expected["fields"].clone()).unwrap();
    assert_eq!(fields, expected_fields, "{name}: fields");
}

fn simulated(sim: &Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        reason: sim["reason"].as_str().unwrap_or_default().to_string(),
        headers: sim["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let pair = h.as_array().unwrap();
                (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
            })
            .collect(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn verify_error(name: &str, err: &ClientError, expected: &Value) {
    let kind = match err {
        ClientError::Transport { .. } => "Transport",
        ClientError::Status { .. } => "Status",
        ClientError::Alert { .. } => "Alert",
        ClientError::DebugHelp { .. } => "DebugHelp",
        ClientError::InvalidResponse { .. } => "InvalidResponse",
        ClientError::InvalidBaseUrl { .. } => "InvalidBaseUrl",
    };
    assert_eq!(kind, expected["kind"].as_str().unwrap(), "{name}: error kind");
    assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: error message");
    assert_eq!(err.code(), expected["code"].as_i64(), "{name}: error code");
}

// ---------------------------------------------------------------------------
// Verify key
// ---------------------------------------------------------------------------

#[test]
fn verify_key_test_vectors() {
    let raw = include_str!("../../test-vectors/verify_key.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(&case["config"]);

        let req = c.build_verify_key();
        verify_request(name, &req, &case["expected_request"]);

        let result = c.parse_verify_key(simulated(&case["simulated_response"]));
        if let Some(expected_error) = case.get("expected_error") {
            verify_error(name, &result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_bool().unwrap(), "{name}: result");
        }
    }
}

// ---------------------------------------------------------------------------
// Comment check
// ---------------------------------------------------------------------------

#[test]
fn comment_check_test_vectors() {
    let raw = include_str!("../../test-vectors/comment_check.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(&case["config"]);
        let comment = Comment::from_json(&case["comment"]);

        let req = c.build_comment_check(&comment);
        verify_request(name, &req, &case["expected_request"]);

        let result = c.parse_comment_check(simulated(&case["simulated_response"]));
        if let Some(expected_error) = case.get("expected_error") {
            verify_error(name, &result.unwrap_err(), expected_error);
        } else {
            let expected: CheckResult = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: result");
        }
    }
}

// ---------------------------------------------------------------------------
// Submit ham / spam
// ---------------------------------------------------------------------------

#[test]
fn submit_test_vectors() {
    let raw = include_str!("../../test-vectors/submit.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let c = client(&case["config"]);
        let comment = Comment::from_json(&case["comment"]);
        let response = simulated(&case["simulated_response"]);

        let (req, result) = match case["operation"].as_str().unwrap() {
            "submit-ham" => (c.build_submit_ham(&comment), c.parse_submit_ham(response)),
            "submit-spam" => (c.build_submit_spam(&comment), c.parse_submit_spam(response)),
            other => panic!("{name}: unknown operation: {other}"),
        };
        verify_request(name, &req, &case["expected_request"]);

        if let Some(expected_error) = case.get("expected_error") {
            verify_error(name, &result.unwrap_err(), expected_error);
        } else {
            assert!(result.is_ok(), "{name}: expected success, got {result:?}");
        }
    }
}
