//! Partner portal: a Leptos single-page application gating its routes behind the redirect login
//! of an OpenID Connect identity provider (Okta).
//!
//! Routes:
//! - `/`: home page. Public.
//! - `/protected`: token information. Redirects home unless authenticated.
//! - `/login/callback`: finishes the login handshake after the identity provider redirected back.
//!
//! All security relevant work is done by the identity provider's browser SDK. This crate reads
//! the SDK's session through [`SessionProvider`] and drives its redirect flow through
//! [`IdentityProvider`]. [`App`] wires in the Okta SDK, [`Portal`] accepts any provider.

pub mod app;
pub mod callback;
pub mod components;
pub mod config;
pub mod error;
pub mod guard;
mod hooks;
pub mod okta;
pub mod realm;
pub mod routes;
pub mod session;
pub mod state;

// Library exports (additional to pub modules).
pub use app::{App, Portal};
pub use callback::{CallbackState, LoginCallback, complete_login_redirect};
pub use config::PortalConfig;
pub use error::{ConfigError, IdentityProviderError, PortalError};
pub use guard::{RedirectTarget, ViewDecision, decide_view};
pub use hooks::*;
pub use realm::{Realm, RoleUrlTable, is_admin_realm};
pub use session::{IdentityProvider, SessionProvider, Subscription};
pub use state::{AccessToken, AuthState, Claims, IdToken};
pub mod url {
    pub use url::Url;
}
