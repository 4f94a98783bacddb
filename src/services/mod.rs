// Service exports
pub mod backend;
pub mod sessions;

pub use backend::{AdminApiClient, BackendError};
pub use sessions::{new_session_id, SessionHandle, SessionStore};
