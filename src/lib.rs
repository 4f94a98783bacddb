//! Masil Admin - server-rendered admin console for the Masil matching service
//!
//! Lets an administrator approve or blacklist pending members, pick three
//! scored male candidates for an approved female member and review created
//! matchings. All data lives in the admin REST API; this crate keeps only
//! per-session view state.

pub mod config;
pub mod console;
pub mod core;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use console::AdminConsole;
pub use self::core::{score_color, ConsoleState, MatchingStage, Tab, WorkflowError};
pub use models::{Matching, MatchingCandidate, Member, MemberStatus};
pub use services::{AdminApiClient, BackendError, SessionStore};
