// handlers/public/mod.rs - Public handlers (no admin gate)
//
// Security Level: None. Visitors read articles and manage their own session.
// Middleware: session layer only.

pub mod articles; // /api/articles, /api/recent-articles
pub mod auth;     // /auth/google, /isAuthenticated, /logout
