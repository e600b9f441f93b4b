// Authentication: email/password signup and sign-in, sessions, email verification,
// and social sign-in. Everything under /api/auth is served from here.

pub mod handlers;
pub mod oauth;
pub mod password;
pub mod session;
pub mod validation;

pub use session::AuthSession;
