//! Symbolic vocabulary shared by requests and results.
//!
//! # Design
//! `CheckResult` is closed: the service only ever yields one of three
//! verdicts. `AuthorRole` and `CommentType` list the tags the service
//! documents but keep an `Other` variant, since the service accepts any
//! well-formed string there. Both round-trip through their wire string.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Outcome of a comment check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckResult {
    /// Not spam.
    Ham,
    /// Spam that should be held for review.
    Spam,
    /// Spam the service considers safe to discard without review.
    PervasiveSpam,
}

impl CheckResult {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckResult::Ham => "ham",
            CheckResult::Spam => "spam",
            CheckResult::PervasiveSpam => "pervasiveSpam",
        }
    }

    /// True for both spam verdicts.
    pub fn is_spam(self) -> bool {
        !matches!(self, CheckResult::Ham)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a comment author, sent as `user_role`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthorRole {
    /// Administrators are never classified as spam.
    Administrator,
    Other(String),
}

impl AuthorRole {
    pub fn as_str(&self) -> &str {
        match self {
            AuthorRole::Administrator => "administrator",
            AuthorRole::Other(role) => role,
        }
    }
}

impl From<&str> for AuthorRole {
    fn from(value: &str) -> Self {
        match value {
            "administrator" => AuthorRole::Administrator,
            other => AuthorRole::Other(other.to_string()),
        }
    }
}

impl From<String> for AuthorRole {
    fn from(value: String) -> Self {
        AuthorRole::from(value.as_str())
    }
}

impl From<AuthorRole> for String {
    fn from(role: AuthorRole) -> Self {
        role.as_str().to_string()
    }
}

impl FromStr for AuthorRole {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(AuthorRole::from(s))
    }
}

impl fmt::Display for AuthorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content being checked, sent as `comment_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommentType {
    /// A blog comment.
    Comment,
    /// A top-level forum post.
    ForumPost,
    /// A reply to a top-level forum post.
    Reply,
    /// A blog post.
    BlogPost,
    /// A contact form or feedback form submission.
    ContactForm,
    /// A new user account.
    Signup,
    /// A message sent between just a few users.
    Message,
    Pingback,
    Trackback,
    Other(String),
}

impl CommentType {
    pub fn as_str(&self) -> &str {
        match self {
            CommentType::Comment => "comment",
            CommentType::ForumPost => "forum-post",
            CommentType::Reply => "reply",
            CommentType::BlogPost => "blog-post",
            CommentType::ContactForm => "contact-form",
            CommentType::Signup => "signup",
            CommentType::Message => "message",
            CommentType::Pingback => "pingback",
            CommentType::Trackback => "trackback",
            CommentType::Other(kind) => kind,
        }
    }
}

impl From<&str> for CommentType {
    fn from(value: &str) -> Self {
        match value {
            "comment" => CommentType::Comment,
            "forum-post" => CommentType::ForumPost,
            "reply" => CommentType::Reply,
            "blog-post" => CommentType::BlogPost,
            "contact-form" => CommentType::ContactForm,
            "signup" => CommentType::Signup,
            "message" => CommentType::Message,
            "pingback" => CommentType::Pingback,
            "trackback" => CommentType::Trackback,
            other => CommentType::Other(other.to_string()),
        }
    }
}

impl From<String> for CommentType {
    fn from(value: String) -> Self {
        CommentType::from(value.as_str())
    }
}

impl From<CommentType> for String {
    fn from(kind: CommentType) -> Self {
        kind.as_str().to_string()
    }
}

impl FromStr for CommentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CommentType::from(s))
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_result_serializes_camel_case() {
        let json = serde_json::to_value(CheckResult::PervasiveSpam).unwrap();
        assert_eq!(json, "pervasiveSpam");
        let back: CheckResult = serde_json::from_str(r#""ham""#).unwrap();
        assert_eq!(back, CheckResult::Ham);
    }

    #[test]
    fn only_ham_is_not_spam() {
        assert!(!CheckResult::Ham.is_spam());
        assert!(CheckResult::Spam.is_spam());
        assert!(CheckResult::PervasiveSpam.is_spam());
    }

    #[test]
    fn known_comment_types_parse_to_variants() {
        assert_eq!(CommentType::from("forum-post"), CommentType::ForumPost);
        assert_eq!(CommentType::from("contact-form"), CommentType::ContactForm);
        assert_eq!(CommentType::ForumPost.as_str(), "forum-post");
    }

    #[test]
    fn unknown_comment_type_is_kept_verbatim() {
        let kind: CommentType = "product-review".parse().unwrap();
        assert_eq!(kind, CommentType::Other("product-review".to_string()));
        assert_eq!(kind.to_string(), "product-review");
    }

    #[test]
    fn author_role_round_trips_through_json() {
        let json = serde_json::to_string(&AuthorRole::Administrator).unwrap();
        assert_eq!(json, r#""administrator""#);
        let role: AuthorRole = serde_json::from_str(r#""editor""#).unwrap();
        assert_eq!(role, AuthorRole::Other("editor".to_string()));
    }
}
