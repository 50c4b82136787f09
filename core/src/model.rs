//! Domain entities and their wire-map representation.
//!
//! # Design
//! `Author`, `Blog` and `Comment` are value objects with typed fields. Each
//! converts to a `WireMap` holding only the fields that are set, keyed by the
//! service's field names. The reverse conversion accepts untrusted input:
//! missing, empty or unparseable values become `None` / empty rather than
//! errors, so `from_wire` and `from_json` never fail.
//!
//! Timestamps go over the wire as RFC 3339 at second precision with an
//! explicit offset. List fields are comma-joined.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use url::Url;

use crate::types::{AuthorRole, CommentType};

/// Flat field map posted as the form-encoded request body.
pub type WireMap = BTreeMap<String, String>;

pub mod keys {
    pub const USER_IP: &str = "user_ip";
    pub const AUTHOR_EMAIL: &str = "comment_author_email";
    pub const AUTHOR_NAME: &str = "comment_author";
    pub const USER_ROLE: &str = "user_role";
    pub const AUTHOR_URL: &str = "comment_author_url";
    pub const USER_AGENT: &str = "user_agent";

    pub const BLOG: &str = "blog";
    pub const BLOG_CHARSET: &str = "blog_charset";
    pub const BLOG_LANG: &str = "blog_lang";

    pub const CONTENT: &str = "comment_content";
    pub const DATE: &str = "comment_date_gmt";
    pub const COMMENT_TYPE: &str = "comment_type";
    pub const PERMALINK: &str = "permalink";
    pub const POST_MODIFIED: &str = "comment_post_modified_gmt";
    pub const RECHECK_REASON: &str = "recheck_reason";
    pub const REFERRER: &str = "referrer";
    pub const CONTEXT: &str = "comment_context";

    pub const API_KEY: &str = "key";
    pub const IS_TEST: &str = "is_test";

    pub(crate) const AUTHOR_KEYS: [&str; 6] =
        [USER_IP, AUTHOR_EMAIL, AUTHOR_NAME, USER_ROLE, AUTHOR_URL, USER_AGENT];
}

/// Format a timestamp the way the service expects it.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Person who posted a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Always sent, even when empty.
    pub ip: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<AuthorRole>,
    pub url: Option<Url>,
    pub user_agent: Option<String>,
}

impl Author {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<AuthorRole>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fill the IP address and user agent from the incoming request the
    /// comment arrived on, leaving values the caller already set untouched.
    pub fn with_fallbacks(mut self, remote_ip: Option<&str>, user_agent: Option<&str>) -> Self {
        if self.ip.is_empty() {
            if let Some(ip) = remote_ip {
                self.ip = ip.to_string();
            }
        }
        if is_blank(self.user_agent.as_deref()) {
            if let Some(agent) = user_agent.filter(|agent| !agent.is_empty()) {
                self.user_agent = Some(agent.to_string());
            }
        }
        self
    }

    pub fn to_wire(&self) -> WireMap {
        let mut map = WireMap::new();
        map.insert(keys::USER_IP.to_string(), self.ip.clone());
        put(&mut map, keys::AUTHOR_EMAIL, self.email.as_deref());
        put(&mut map, keys::AUTHOR_NAME, self.name.as_deref());
        put(&mut map, keys::USER_ROLE, self.role.as_ref().map(AuthorRole::as_str));
        put(&mut map, keys::AUTHOR_URL, self.url.as_ref().map(Url::as_str));
        put(&mut map, keys::USER_AGENT, self.user_agent.as_deref());
        map
    }

    pub fn from_wire(map: &WireMap) -> Self {
        Self {
            ip: map.get(keys::USER_IP).cloned().unwrap_or_default(),
            email: text(map, keys::AUTHOR_EMAIL),
            name: text(map, keys::AUTHOR_NAME),
            role: text(map, keys::USER_ROLE).map(AuthorRole::from),
            url: uri(map, keys::AUTHOR_URL),
            user_agent: text(map, keys::USER_AGENT),
        }
    }

    pub fn to_json(&self) -> Value {
        wire_to_json(self.to_wire())
    }

    pub fn from_json(value: &Value) -> Self {
        Self::from_wire(&json_to_wire(value))
    }
}

/// Site on whose behalf requests are made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blog {
    /// `None` only for blogs rebuilt from input lacking a usable URL.
    pub url: Option<Url>,
    pub charset: Option<String>,
    /// ISO 639-1 codes in insertion order, without duplicates.
    pub languages: Vec<String>,
}

impl Blog {
    pub fn new(url: Url) -> Self {
        Self {
            url: Some(url),
            ..Self::default()
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Trimmed; a comma-separated value adds each code in turn.
    pub fn with_language(mut self, code: impl Into<String>) -> Self {
        for code in list_items(&code.into()) {
            push_unique(&mut self.languages, code);
        }
        self
    }

    pub fn with_languages<I, S>(self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        codes.into_iter().fold(self, |blog, code| blog.with_language(code))
    }

    pub fn to_wire(&self) -> WireMap {
        let mut map = WireMap::new();
        let url = self.url.as_ref().map(Url::as_str).unwrap_or_default();
        map.insert(keys::BLOG.to_string(), url.to_string());
        put(&mut map, keys::BLOG_CHARSET, self.charset.as_deref());
        if !self.languages.is_empty() {
            map.insert(keys::BLOG_LANG.to_string(), self.languages.join(","));
        }
        map
    }

    pub fn from_wire(map: &WireMap) -> Self {
        let mut languages = Vec::new();
        for code in list(map, keys::BLOG_LANG) {
            push_unique(&mut languages, code);
        }
        Self {
            url: uri(map, keys::BLOG),
            charset: text(map, keys::BLOG_CHARSET),
            languages,
        }
    }

    pub fn to_json(&self) -> Value {
        wire_to_json(self.to_wire())
    }

    pub fn from_json(value: &Value) -> Self {
        Self::from_wire(&json_to_wire(value))
    }
}

/// Content submitted for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub author: Option<Author>,
    pub content: Option<String>,
    pub comment_type: Option<CommentType>,
    pub date: Option<DateTime<Utc>>,
    pub permalink: Option<Url>,
    pub referrer: Option<Url>,
    pub post_modified: Option<DateTime<Utc>>,
    pub recheck_reason: Option<String>,
    pub context: Vec<String>,
}

impl Comment {
    pub fn new(author: Author) -> Self {
        Self {
            author: Some(author),
            ..Self::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_type(mut self, kind: impl Into<CommentType>) -> Self {
        self.comment_type = Some(kind.into());
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_permalink(mut self, permalink: Url) -> Self {
        self.permalink = Some(permalink);
        self
    }

    pub fn with_referrer(mut self, referrer: Url) -> Self {
        self.referrer = Some(referrer);
        self
    }

    pub fn with_post_modified(mut self, post_modified: DateTime<Utc>) -> Self {
        self.post_modified = Some(post_modified);
        self
    }

    pub fn with_recheck_reason(mut self, reason: impl Into<String>) -> Self {
        self.recheck_reason = Some(reason.into());
        self
    }

    /// Items are trimmed and split on commas, as they are on the wire.
    pub fn with_context<I, S>(mut self, context: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for item in context {
            self.context.extend(list_items(&item.into()));
        }
        self
    }

    pub fn to_wire(&self) -> WireMap {
        let mut map = self.author.as_ref().map(Author::to_wire).unwrap_or_default();
        put(&mut map, keys::CONTENT, self.content.as_deref());
        put(&mut map, keys::COMMENT_TYPE, self.comment_type.as_ref().map(CommentType::as_str));
        put(&mut map, keys::DATE, self.date.as_ref().map(format_timestamp).as_deref());
        put(&mut map, keys::PERMALINK, self.permalink.as_ref().map(Url::as_str));
        put(
            &mut map,
            keys::POST_MODIFIED,
            self.post_modified.as_ref().map(format_timestamp).as_deref(),
        );
        put(&mut map, keys::RECHECK_REASON, self.recheck_reason.as_deref());
        put(&mut map, keys::REFERRER, self.referrer.as_ref().map(Url::as_str));
        let context: Vec<&str> = self
            .context
            .iter()
            .map(String::as_str)
            .filter(|item| !item.is_empty())
            .collect();
        if !context.is_empty() {
            map.insert(keys::CONTEXT.to_string(), context.join(","));
        }
        map
    }

    /// The author is rebuilt only when at least one author field is present.
    pub fn from_wire(map: &WireMap) -> Self {
        let has_author = keys::AUTHOR_KEYS.iter().any(|key| map.contains_key(*key));
        Self {
            author: has_author.then(|| Author::from_wire(map)),
            content: text(map, keys::CONTENT),
            comment_type: text(map, keys::COMMENT_TYPE).map(CommentType::from),
            date: timestamp(map, keys::DATE),
            permalink: uri(map, keys::PERMALINK),
            referrer: uri(map, keys::REFERRER),
            post_modified: timestamp(map, keys::POST_MODIFIED),
            recheck_reason: text(map, keys::RECHECK_REASON),
            context: list(map, keys::CONTEXT),
        }
    }

    pub fn to_json(&self) -> Value {
        wire_to_json(self.to_wire())
    }

    pub fn from_json(value: &Value) -> Self {
        Self::from_wire(&json_to_wire(value))
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn put(map: &mut WireMap, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        map.insert(key.to_string(), value.to_string());
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !item.is_empty() && !list.contains(&item) {
        list.push(item);
    }
}

fn text(map: &WireMap, key: &str) -> Option<String> {
    map.get(key).filter(|value| !value.is_empty()).cloned()
}

fn uri(map: &WireMap, key: &str) -> Option<Url> {
    map.get(key).and_then(|value| Url::parse(value).ok())
}

fn timestamp(map: &WireMap, key: &str) -> Option<DateTime<Utc>> {
    map.get(key)
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|value| value.with_timezone(&Utc))
}

/// Comma-separated items, trimmed, empties dropped. Builders normalize list
/// input with the same rule so wire maps read back unchanged.
fn list_items(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn list(map: &WireMap, key: &str) -> Vec<String> {
    map.get(key)
        .map(|value| list_items(value).collect())
        .unwrap_or_default()
}

/// Keep the string-valued members of a JSON object; anything else is dropped.
fn json_to_wire(value: &Value) -> WireMap {
    let Value::Object(object) = value else {
        return WireMap::new();
    };
    object
        .iter()
        .filter_map(|(key, value)| value.as_str().map(|text| (key.clone(), text.to_string())))
        .collect()
}

fn wire_to_json(map: WireMap) -> Value {
    Value::Object(
        map.into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<Map<String, Value>>(),
    )
}
