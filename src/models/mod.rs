//! Data models for HTTP requests and responses.
//!
//! These are the values exchanged with the transport: the resolved request a
//! case turns into, and the raw response that comes back.

pub mod request;
pub mod response;

pub use request::{FilePart, HttpMethod, HttpRequest, RequestBody};
pub use response::HttpResponse;
