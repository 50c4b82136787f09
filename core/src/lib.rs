//! Client core for the Akismet comment-spam service.
//!
//! # Overview
//! Serializes blog, author and comment data into the service's form fields,
//! posts them to the per-key endpoint and turns the raw response (status,
//! `X-akismet-*` headers, body) into typed results or a `ClientError`.
//!
//! # Design
//! - `AkismetClient` holds immutable configuration and a transport; it is
//!   safe to share across threads whenever the transport is.
//! - Each operation is also available as a `build_*` / `parse_*` pair so the
//!   caller can run the HTTP round-trip itself.
//! - The network is reached only through the `HttpTransport` trait. With the
//!   default `ureq` feature, `UreqTransport` provides a blocking one.
//!
//! ```no_run
//! use akismet_core::{AkismetClient, Author, Blog, ClientConfig, Comment, UreqTransport};
//! use url::Url;
//!
//! let blog = Blog::new(Url::parse("https://blog.example.com/").unwrap());
//! let client = AkismetClient::new(ClientConfig::new("my-api-key", blog), UreqTransport::new()).unwrap();
//! let comment = Comment::new(Author::new("127.0.0.1").with_name("viagra-test-123"))
//!     .with_content("Buy now!");
//! assert!(client.check_comment(&comment).unwrap().is_spam());
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod observer;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use client::{AkismetClient, Operation, SUCCESS_ACK};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use model::{Author, Blog, Comment, WireMap};
pub use observer::RequestObserver;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{AuthorRole, CheckResult, CommentType};
