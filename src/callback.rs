//! The login callback handshake.
//!
//! When the identity provider redirects back to us, the SDK must be asked once to finish the
//! handshake (parse the authorization response, store the tokens). Afterwards we leave the
//! callback page.
//!
//! ```text
//!            completion ok / session authenticated
//! Pending ──────────────────────────────────────────▶ Success (navigate home, once)
//!    │
//!    │ genuine failure while unauthenticated
//!    ▼
//!  Error (message + link home, no navigation)
//! ```
//!
//! A failure stating that the redirect was already completed keeps the handler in `Pending`
//! until the session turns authenticated.

use crate::error::IdentityProviderError;
use crate::guard::RedirectTarget;
use crate::session::IdentityProvider;

/// Message shown to the user when the handshake failed.
pub const LOGIN_FAILED_MESSAGE: &str = "Failed to complete authentication. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackState {
    Pending,
    Success,
    Error(CallbackFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    pub cause: IdentityProviderError,
}

impl CallbackFailure {
    pub fn user_message(&self) -> &'static str {
        LOGIN_FAILED_MESSAGE
    }
}

/// State machine of one login callback. Create one per page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCallback {
    state: CallbackState,
    started: bool,
}

impl Default for LoginCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginCallback {
    pub fn new() -> Self {
        Self {
            state: CallbackState::Pending,
            started: false,
        }
    }

    pub fn state(&self) -> &CallbackState {
        &self.state
    }

    /// Returns `true` exactly once: the caller must then issue the completion call and report
    /// its result through [`LoginCallback::complete`].
    pub fn start(&mut self) -> bool {
        let first = !self.started;
        self.started = true;
        first
    }

    /// Feeds the result of the completion call.
    ///
    /// `is_authenticated` is the session state right after the call settled.
    /// Returns where to navigate to, if this transition requires it.
    pub fn complete(
        &mut self,
        result: Result<(), IdentityProviderError>,
        is_authenticated: bool,
    ) -> Option<RedirectTarget> {
        if self.state != CallbackState::Pending {
            tracing::trace!(state = ?self.state, "Ignoring completion of a settled login callback");
            return None;
        }

        match result {
            Ok(()) => {
                tracing::trace!("Login redirect handled");
                self.succeed()
            }
            Err(err) if is_authenticated => {
                tracing::debug!(%err, "Ignoring login redirect error, session is already authenticated");
                self.succeed()
            }
            Err(IdentityProviderError::RedirectAlreadyCompleted { message }) => {
                tracing::debug!(reason = %message, "Login redirect already completed. Waiting for session");
                None
            }
            Err(err) => {
                tracing::error!(%err, "Authentication error");
                self.state = CallbackState::Error(CallbackFailure { cause: err });
                None
            }
        }
    }

    /// Feeds a session change. An authenticated session finishes a pending callback.
    pub fn observe_session(&mut self, is_authenticated: bool) -> Option<RedirectTarget> {
        match (&self.state, is_authenticated) {
            (CallbackState::Pending, true) => {
                tracing::trace!("Session authenticated during login callback");
                self.succeed()
            }
            _ => None,
        }
    }

    fn succeed(&mut self) -> Option<RedirectTarget> {
        self.state = CallbackState::Success;
        Some(RedirectTarget::home())
    }
}

/// Result of the completion call together with the session state right after it settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectOutcome {
    pub result: Result<(), IdentityProviderError>,
    pub is_authenticated: bool,
}

impl LoginCallback {
    pub fn settle(&mut self, outcome: RedirectOutcome) -> Option<RedirectTarget> {
        self.complete(outcome.result, outcome.is_authenticated)
    }
}

/// Asks `provider` to finish the login handshake.
///
/// Callers must have won [`LoginCallback::start`] before and feed the outcome back through
/// [`LoginCallback::settle`].
pub async fn handle_redirect<P>(provider: &P) -> RedirectOutcome
where
    P: IdentityProvider + ?Sized,
{
    let result = provider.handle_login_redirect().await;
    RedirectOutcome {
        result,
        is_authenticated: provider.snapshot().is_authenticated,
    }
}

/// Runs the completion call against `provider`, at most once per `callback`.
///
/// Returns where to navigate to, if anywhere.
pub async fn complete_login_redirect<P>(
    provider: &P,
    callback: &mut LoginCallback,
) -> Option<RedirectTarget>
where
    P: IdentityProvider + ?Sized,
{
    if !callback.start() {
        tracing::trace!("Login callback already started");
        return None;
    }
    let outcome = handle_redirect(provider).await;
    callback.settle(outcome)
}

#[cfg(test)]
mod tests {
    use super::{CallbackFailure, CallbackState, LoginCallback};
    use crate::error::IdentityProviderError;
    use crate::guard::RedirectTarget;
    use assertr::prelude::*;

    fn already_completed() -> IdentityProviderError {
        IdentityProviderError::from_redirect_failure("Unable to parse a token from the url")
    }

    fn genuine() -> IdentityProviderError {
        IdentityProviderError::from_redirect_failure("The authorization server denied the request")
    }

    #[test]
    fn starts_only_once() {
        let mut callback = LoginCallback::new();
        assert_that(callback.start()).is_equal_to(true);
        assert_that(callback.start()).is_equal_to(false);
        assert_that(callback.state()).is_equal_to(&CallbackState::Pending);
    }

    #[test]
    fn success_navigates_home() {
        let mut callback = LoginCallback::new();
        assert_that(callback.complete(Ok(()), true)).is_equal_to(Some(RedirectTarget::home()));
        assert_that(callback.state()).is_equal_to(&CallbackState::Success);
    }

    #[test]
    fn benign_error_while_authenticated_is_success() {
        let mut callback = LoginCallback::new();
        assert_that(callback.complete(Err(already_completed()), true))
            .is_equal_to(Some(RedirectTarget::home()));
        assert_that(callback.state()).is_equal_to(&CallbackState::Success);
    }

    #[test]
    fn any_error_while_authenticated_is_success() {
        let mut callback = LoginCallback::new();
        assert_that(callback.complete(Err(genuine()), true))
            .is_equal_to(Some(RedirectTarget::home()));
        assert_that(callback.state()).is_equal_to(&CallbackState::Success);
    }

    #[test]
    fn genuine_error_while_unauthenticated_is_terminal() {
        let mut callback = LoginCallback::new();
        assert_that(callback.complete(Err(genuine()), false)).is_equal_to(None);
        assert_that(callback.state()).is_equal_to(&CallbackState::Error(CallbackFailure {
            cause: genuine(),
        }));

        // A later authentication does not leave the error screen on its own.
        assert_that(callback.observe_session(true)).is_equal_to(None);
        assert_that(matches!(callback.state(), CallbackState::Error(_))).is_equal_to(true);
    }

    #[test]
    fn benign_error_while_unauthenticated_waits_for_session() {
        let mut callback = LoginCallback::new();
        assert_that(callback.complete(Err(already_completed()), false)).is_equal_to(None);
        assert_that(callback.state()).is_equal_to(&CallbackState::Pending);

        assert_that(callback.observe_session(false)).is_equal_to(None);
        assert_that(callback.observe_session(true)).is_equal_to(Some(RedirectTarget::home()));
        assert_that(callback.state()).is_equal_to(&CallbackState::Success);
    }

    #[test]
    fn navigates_only_once() {
        let mut callback = LoginCallback::new();
        assert_that(callback.observe_session(true)).is_equal_to(Some(RedirectTarget::home()));
        assert_that(callback.complete(Ok(()), true)).is_equal_to(None);
        assert_that(callback.observe_session(true)).is_equal_to(None);
    }

    #[test]
    fn failure_has_static_user_message() {
        let failure = CallbackFailure { cause: genuine() };
        assert_that(failure.user_message())
            .is_equal_to("Failed to complete authentication. Please try again.");
    }
}
