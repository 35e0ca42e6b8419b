use snafu::Snafu;

/// Message the identity provider SDK reports when the callback URL no longer carries tokens,
/// typically because an earlier call already consumed them.
const REDIRECT_ALREADY_COMPLETED_MESSAGE: &str = "unable to parse a token from the url";

/// Errors reported by the identity provider SDK.
///
/// The SDK itself only gives us messages. Adapters classify them into these variants, so that
/// the rest of the application never has to inspect message text.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum IdentityProviderError {
    #[snafu(display("IdentityProviderError: Could not initialize the SDK: {message}"))]
    Initialize { message: String },

    #[snafu(display("IdentityProviderError: Sign-in redirect failed: {message}"))]
    SignIn { message: String },

    #[snafu(display("IdentityProviderError: Sign-out failed: {message}"))]
    SignOut { message: String },

    /// The login redirect was already handled. Tokens are (or are about to be) in the session.
    #[snafu(display("IdentityProviderError: Login redirect already completed: {message}"))]
    RedirectAlreadyCompleted { message: String },

    #[snafu(display("IdentityProviderError: Could not complete login redirect: {message}"))]
    HandleRedirect { message: String },
}

impl IdentityProviderError {
    /// Classifies a failure of the SDK's "handle login redirect" operation by its message.
    pub fn from_redirect_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message
            .to_ascii_lowercase()
            .contains(REDIRECT_ALREADY_COMPLETED_MESSAGE)
        {
            IdentityProviderError::RedirectAlreadyCompleted { message }
        } else {
            IdentityProviderError::HandleRedirect { message }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            IdentityProviderError::Initialize { message }
            | IdentityProviderError::SignIn { message }
            | IdentityProviderError::SignOut { message }
            | IdentityProviderError::RedirectAlreadyCompleted { message }
            | IdentityProviderError::HandleRedirect { message } => message,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("ConfigError: Invalid {name} url '{value}': {source}"))]
    InvalidUrl {
        name: &'static str,
        value: String,
        source: url::ParseError,
    },

    #[snafu(display("ConfigError: Missing {name}"))]
    Missing { name: &'static str },
}

/// Anything that keeps the portal from starting up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PortalError {
    #[snafu(display("PortalError: Invalid configuration: {source}"))]
    Config { source: ConfigError },

    #[snafu(display("PortalError: Identity provider unavailable: {source}"))]
    IdentityProvider { source: IdentityProviderError },
}

#[cfg(test)]
mod tests {
    use super::IdentityProviderError;
    use assertr::prelude::*;

    #[test]
    fn benign_parse_failure_is_classified_as_already_completed() {
        let err = IdentityProviderError::from_redirect_failure("Unable to parse a token from the url");
        assert_that(err).is_equal_to(IdentityProviderError::RedirectAlreadyCompleted {
            message: "Unable to parse a token from the url".to_owned(),
        });
    }

    #[test]
    fn benign_message_matches_as_substring() {
        let err = IdentityProviderError::from_redirect_failure(
            "AuthSdkError: Unable to parse a token from the url.",
        );
        assert_that(matches!(
            err,
            IdentityProviderError::RedirectAlreadyCompleted { .. }
        ))
        .is_equal_to(true);
    }

    #[test]
    fn other_failures_stay_genuine() {
        let err = IdentityProviderError::from_redirect_failure("invalid_grant");
        assert_that(err.message()).is_equal_to("invalid_grant");
        assert_that(matches!(err, IdentityProviderError::HandleRedirect { .. }))
            .is_equal_to(true);
    }
}
