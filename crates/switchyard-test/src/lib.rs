//! In-memory testing for Switchyard applications.
//!
//! [`TestClient`] builds `http::Request`s, runs them through
//! [`App::serve`](switchyard_core::App::serve) on the calling thread and
//! wraps the result in a [`TestResponse`] with chainable assertions. No
//! runtime or socket is involved.

#![doc(html_root_url = "https://docs.rs/switchyard-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod response;

pub use client::{TestClient, TestRequest};
pub use error::TestError;
pub use response::TestResponse;
