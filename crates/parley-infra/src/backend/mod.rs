//! Reply-generation backend adapters.

pub mod http;

pub use http::HttpReplyBackend;
