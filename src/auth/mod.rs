pub mod guard;
pub mod login;
pub mod token;

pub use guard::{require_admin, Guard};
