// In-process session registry. Nothing here outlives the process.

pub mod store;

pub use store::{InterviewSession, SessionGuard, SessionStore, DEFAULT_SESSION_TIMEOUT};
