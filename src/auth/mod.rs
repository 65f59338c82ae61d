//! Authentication and session management

pub mod accounts;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use accounts::{authenticate, create_user};
pub use middleware::{load_session, require_login, session_id_from_request, SessionId};
pub use models::{SessionUser, UserRole};
pub use session::{Session, SessionManager};
