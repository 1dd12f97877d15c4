//! Production implementations of the DI traits.

pub mod http;

pub use http::ReqwestHttpClient;
