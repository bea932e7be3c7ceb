// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod notify;

pub use http::{RequestTracker, RestBoardApi};
pub use notify::TracingNotifier;
