//! Remote task repository: the abstract trait the store talks to, the HTTP
//! adapter for the dashboard service, and a scriptable in-memory double.

mod api;
mod http;
mod mock;

pub use api::{ApiError, TaskApi};
pub use http::{HttpConfig, HttpTaskApi};
pub use mock::{Endpoint, MockTaskApi};
