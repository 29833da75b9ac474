// handlers/protected/mod.rs - Protected handlers (admin gate required)
//
// Every handler here takes an `AdminUser` argument. Requests without a
// signed-in, allow-listed identity never reach the handler body and are
// redirected to the landing page.
//
// Security Level: Session identity + admin allow-list
// Middleware: session layer; upload route also carries a body limit

pub mod admin;  // /admin, /api/admin/articles, /edit/{id}, /delete/{id}
pub mod upload; // /uploadarticle, /upload-article
