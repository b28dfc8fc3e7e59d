//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → TraceLayer (spans)
//!     → middleware.rs (start timer)
//!     → CatchPanicLayer (panic → 500)
//!     → application / ServeDir / redirect (handler.rs markers)
//!     → middleware.rs (CompletedRequest → Logger::log_request)
//!     → Send to client
//! ```

pub mod handler;
pub mod middleware;
pub mod server;

pub use handler::{
    redirect, CompletedRequest, HandlerKind, LogPayload, ReasonPhrase, RequestHandler,
    RollbarToken,
};
pub use middleware::access_log_middleware;
pub use server::{build_router, HttpServer};
