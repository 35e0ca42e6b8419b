use crate::error::{ConfigError, InvalidUrlSnafu, MissingSnafu};
use crate::realm::RoleUrlTable;
use crate::routes;
use itertools::Itertools;
use snafu::{ResultExt, ensure};
use url::Url;

pub const DEFAULT_CLIENT_ID: &str = "0oap525ydtG2YwxWL1d7";
pub const DEFAULT_ISSUER: &str = "https://sherwindemo.oktapreview.com/oauth2/default";
pub const DEFAULT_SCOPES: &str = "openid profile email";

/// Static configuration of the portal, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    /// The name of this client as registered with the identity provider.
    pub client_id: String,

    /// Authorization server issuing our tokens, e.g. "https://{domain}/oauth2/default".
    pub issuer: Url,

    /// Requested scopes. Always contains "openid".
    pub scopes: Vec<String>,

    /// Whether to use the PKCE extension of the authorization code flow.
    /// Always on for this single-page application; kept configurable for the SDK's sake.
    pub pkce: bool,

    /// Partner portal per realm, linked from the admin area.
    pub portals: RoleUrlTable,
}

impl PortalConfig {
    /// Loads the configuration compiled into this binary.
    ///
    /// Defaults can be overridden at build time through the `PORTAL_CLIENT_ID`, `PORTAL_ISSUER`
    /// and `PORTAL_SCOPES` (space separated) environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_values(
            option_env!("PORTAL_CLIENT_ID").unwrap_or(DEFAULT_CLIENT_ID),
            option_env!("PORTAL_ISSUER").unwrap_or(DEFAULT_ISSUER),
            option_env!("PORTAL_SCOPES").unwrap_or(DEFAULT_SCOPES),
        )
    }

    pub fn from_values(client_id: &str, issuer: &str, scopes: &str) -> Result<Self, ConfigError> {
        let client_id = client_id.trim();
        ensure!(!client_id.is_empty(), MissingSnafu { name: "client id" });

        let issuer = Url::parse(issuer.trim()).context(InvalidUrlSnafu {
            name: "issuer",
            value: issuer,
        })?;

        let scopes = std::iter::once("openid")
            .chain(scopes.split_whitespace())
            .unique()
            .map(str::to_owned)
            .collect();

        Ok(Self {
            client_id: client_id.to_owned(),
            issuer,
            scopes,
            pkce: true,
            portals: RoleUrlTable::partner_portals()?,
        })
    }

    /// The URL the identity provider redirects back to: `<origin>/login/callback`.
    pub fn redirect_uri(&self, origin: &str) -> Result<Url, ConfigError> {
        Url::parse(origin)
            .and_then(|origin| origin.join(routes::LOGIN_CALLBACK))
            .context(InvalidUrlSnafu {
                name: "origin",
                value: origin,
            })
    }
}
