#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # delete-with-body
//!
//! The `delete_with_body` crate provides request descriptors for HTTP
//! `DELETE` requests that carry an entity body.
//!
//! Plenty of HTTP tooling treats `DELETE` as a body-less method, yet many
//! APIs expect a payload on it (bulk deletes, deletion reasons, optimistic
//! concurrency tokens). A [`DeleteWithBody`] behaves like any other
//! entity-enclosing request, except that its method is fixed to `DELETE`.
//!
//! Descriptors do not send themselves. Convert one into an
//! [`http::Request`] and hand it to whatever execution layer you use
//! (`hyper`, `hyper-util`, a `tower` service, ...).
//!
//! ## Building a request
//!
//! ```rust
//! use delete_with_body::DeleteWithBody;
//!
//! # fn run() -> Result<(), delete_with_body::Error> {
//! let req = DeleteWithBody::builder("https://api.example.com/items")
//!     .bearer_auth("my-token")
//!     .header("content-type", "application/json")
//!     .body(r#"{"ids":[1,2,3]}"#)
//!     .build()?;
//!
//! let req: http::Request<delete_with_body::Body> = req.try_into()?;
//! assert_eq!(req.method(), "DELETE");
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! The following are a list of [Cargo features][cargo-features] that can be
//! enabled or disabled:
//!
//! - **json**: Provides `RequestBuilder::json` for JSON bodies.
//!
//! [cargo-features]: https://doc.rust-lang.org/stable/cargo/reference/manifest.html#the-features-section

#[macro_use]
extern crate log;

pub use http::header;
pub use http::Method;
pub use http::Version;
pub use url::Url;

pub use self::body::Body;
pub use self::delete::DeleteWithBody;
pub use self::error::{Error, Result};
pub use self::into_url::IntoUrl;
pub use self::request::{Buildable, Request, RequestBuilder};

mod body;
mod delete;
mod error;
mod into_url;
mod request;
