use crate::error::IdentityProviderError;
use crate::state::AuthState;
use async_trait::async_trait;
use std::fmt::{Debug, Formatter};

/// Read access to the identity provider's session.
///
/// The portal never mutates the session. It asks for the current [`AuthState`] and gets told
/// about every change the SDK makes.
pub trait SessionProvider {
    /// The current state. Implementations must map "no state yet" to `AuthState::default()`.
    fn snapshot(&self) -> AuthState;

    /// Registers `listener` for all future state changes.
    ///
    /// The listener stays registered for as long as the returned [`Subscription`] is alive.
    fn subscribe(&self, listener: Box<dyn Fn(AuthState)>) -> Subscription;
}

/// The redirect-based login flow of an external identity provider SDK.
///
/// Everything security relevant (PKCE, token exchange, validation, storage and refresh) happens
/// behind this trait.
#[async_trait(?Send)]
pub trait IdentityProvider: SessionProvider {
    /// Navigates away to the provider's login page.
    async fn sign_in_with_redirect(&self) -> Result<(), IdentityProviderError>;

    /// Ends the session, locally and at the provider.
    async fn sign_out(&self) -> Result<(), IdentityProviderError>;

    /// Parses the authorization response of the current URL and stores the resulting tokens.
    ///
    /// Fails with [`IdentityProviderError::RedirectAlreadyCompleted`] when there was nothing
    /// (left) to parse.
    async fn handle_login_redirect(&self) -> Result<(), IdentityProviderError>;
}

/// Keeps a [`SessionProvider::subscribe`] listener registered. Unsubscribes on drop.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            tracing::trace!("Dropping session subscription");
            unsubscribe();
        }
    }
}
