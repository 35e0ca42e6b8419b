use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

/// Snapshot of the identity provider's session.
///
/// Owned and mutated by the SDK only. The portal receives fresh snapshots through a
/// [`SessionProvider`](crate::session::SessionProvider) whenever something changes.
///
/// The default value is the unauthenticated state, which is also what a missing snapshot means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub id_token: Option<IdToken>,
    pub access_token: Option<AccessToken>,
}

impl AuthState {
    pub fn id_token_claims(&self) -> Option<&Claims> {
        self.id_token.as_ref().map(|token| &token.claims)
    }

    pub fn access_token_claims(&self) -> Option<&Claims> {
        self.access_token.as_ref().map(|token| &token.claims)
    }

    /// The `realmName` claim of the ID token. Only string values count as a realm.
    pub fn realm_claim(&self) -> Option<&str> {
        self.id_token_claims().and_then(Claims::realm_name)
    }

    /// Name to greet the user with. Only available while authenticated.
    pub fn greeting_name(&self) -> Option<&str> {
        match self.is_authenticated {
            true => self.id_token_claims().and_then(Claims::name),
            false => None,
        }
    }
}

/// Decoded token claims. Opaque to the portal, apart from the few accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// Value of `claim` if present and a non-empty string.
    pub fn string(&self, claim: &str) -> Option<&str> {
        self.get(claim)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.string("name")
    }

    pub fn realm_name(&self) -> Option<&str> {
        self.string("realmName")
    }
}

/// ID token as handed out by the SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdToken {
    /// The raw, encoded JWT.
    pub id_token: String,

    pub claims: Claims,

    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,

    #[serde(default)]
    pub scopes: Vec<String>,

    /// Everything else the SDK attached (issuer, client id, urls, ...). Kept for display.
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Access token as handed out by the SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// The raw, encoded token. Use this in an authorization header.
    pub access_token: String,

    pub claims: Claims,

    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,

    #[serde(default)]
    pub token_type: Option<String>,

    #[serde(default)]
    pub scopes: Vec<String>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl IdToken {
    pub fn expires_in(&self, now: OffsetDateTime) -> Duration {
        self.expires_at - now
    }
}

impl AccessToken {
    pub fn expires_in(&self, now: OffsetDateTime) -> Duration {
        self.expires_at - now
    }
}

/// Formats a token object (or its absence) as JSON, indented by two spaces.
pub fn pretty_token<T: Serialize>(token: Option<&T>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&token)
}

/// Human readable remaining lifetime, e.g. `"4m 05s"`, or `"expired"`.
pub fn format_time_left(left: Duration) -> String {
    if left <= Duration::ZERO {
        return "expired".to_owned();
    }
    let minutes = left.whole_minutes();
    let seconds = left.whole_seconds() - minutes * 60;
    match minutes {
        0 => format!("{seconds}s"),
        _ => format!("{minutes}m {seconds:02}s"),
    }
}
