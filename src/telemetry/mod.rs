pub mod database;
pub mod events;
pub mod http;
pub mod subscriber;

pub use events::BusinessEvent;
pub use http::{REQUEST_ID_HEADER, RequestContext, TRACE_ID_HEADER, request_logging_middleware};
pub use subscriber::{init_tracing, shutdown_tracing};
