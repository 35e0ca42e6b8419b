//! Paths the portal routes on.
//!
//! The route table in `app.rs` uses `path!` literals, which must match these.

/// Home page. Public.
pub const ROOT: &str = "/";

/// Token page. Requires an authenticated session.
pub const PROTECTED: &str = "/protected";

/// Target of the identity provider's redirect after a login.
pub const LOGIN_CALLBACK: &str = "/login/callback";
