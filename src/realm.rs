//! Realm claims and the partner portal each realm administers.

use crate::error::{ConfigError, InvalidUrlSnafu};
use snafu::ResultExt;
use std::collections::HashMap;
use url::Url;

const NAPA_PORTAL_URL: &str = "https://sherwindemo.twisec.com/partner-portal/guop53oy4bTNZpcNO1d7";
const EAST_PORTAL_URL: &str = "https://sherwindemo.twisec.com/partner-portal/guop53mic7JNWXMmO1d7";
const WEST_PORTAL_URL: &str = "https://sherwindemo.twisec.com/partner-portal/guop53y5n89mtrusM1d7";
const DEFAULT_PORTAL_URL: &str = WEST_PORTAL_URL;

/// A known organizational partition, as named by the `realmName` ID token claim.
///
/// Members of any known realm are portal administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Realm {
    Napa,
    East,
    West,
}

impl Realm {
    pub const ALL: [Realm; 3] = [Realm::Napa, Realm::East, Realm::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Realm::Napa => "NAPA_REALM",
            Realm::East => "EAST_REALM",
            Realm::West => "WEST_REALM",
        }
    }

    /// Exact, case-sensitive match of a claim value.
    pub fn from_claim(claim: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|realm| realm.as_str() == claim)
    }
}

/// Whether a user with this realm claim may see the admin area.
pub fn is_admin_realm(claim: Option<&str>) -> bool {
    claim
        .filter(|claim| !claim.is_empty())
        .and_then(Realm::from_claim)
        .is_some()
}

/// Static mapping from realm to the external portal administering it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleUrlTable {
    portals: HashMap<Realm, Url>,
    default: Url,
}

impl RoleUrlTable {
    pub fn new(default: Url, portals: impl IntoIterator<Item = (Realm, Url)>) -> Self {
        Self {
            portals: portals.into_iter().collect(),
            default,
        }
    }

    /// The partner portals of the known realms.
    pub fn partner_portals() -> Result<Self, ConfigError> {
        let parse = |value: &'static str| {
            Url::parse(value).context(InvalidUrlSnafu {
                name: "partner portal",
                value,
            })
        };
        Ok(Self::new(
            parse(DEFAULT_PORTAL_URL)?,
            [
                (Realm::Napa, parse(NAPA_PORTAL_URL)?),
                (Realm::East, parse(EAST_PORTAL_URL)?),
                (Realm::West, parse(WEST_PORTAL_URL)?),
            ],
        ))
    }

    /// Portal URL for a realm claim. Unknown or missing claims resolve to the default portal.
    pub fn resolve(&self, claim: Option<&str>) -> &Url {
        claim
            .and_then(Realm::from_claim)
            .and_then(|realm| self.portals.get(&realm))
            .unwrap_or(&self.default)
    }

    pub fn default_url(&self) -> &Url {
        &self.default
    }
}
