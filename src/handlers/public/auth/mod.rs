// handlers/public/auth/mod.rs - Sign-in and session endpoints
//
// These handlers establish or tear down the browser session; none of them
// require an existing identity.

pub mod google;  // GET /auth/google, GET /auth/google/callback
pub mod session; // GET /isAuthenticated, GET /logout

pub use google::{google_callback, google_login};
pub use session::{is_authenticated, logout};
