pub mod session;

pub use session::{BoardSession, DropOutcome};
