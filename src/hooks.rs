use crate::callback::LoginCallback;
use crate::realm::{RoleUrlTable, is_admin_realm};
use crate::session::{IdentityProvider, Subscription};
use crate::state::AuthState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use url::Url;

/// The session state this portal tracks, provided as context.
///
/// Use
/// ```no_run
/// use partner_portal::use_portal_auth;
///
/// let auth = use_portal_auth();
/// ```
/// in any component rendered below [`Portal`](crate::app::Portal).
#[derive(Clone, Copy)]
pub struct PortalAuth {
    provider: StoredValue<Rc<dyn IdentityProvider>, LocalStorage>,

    /// Latest snapshot of the identity provider's session.
    pub state: Signal<AuthState>,

    /// Derived signal stating `true` when `state` is authenticated.
    pub is_authenticated: Signal<bool>,

    /// Whether the user belongs to a realm administering a partner portal.
    pub is_admin: Signal<bool>,

    /// Partner portal of the user's realm, or the default portal.
    pub admin_url: Signal<Url>,

    /// Login callback handshake of this page load.
    pub(crate) login_callback: RwSignal<LoginCallback>,

    #[allow(unused)]
    subscription: StoredValue<Subscription, LocalStorage>,
}

impl PortalAuth {
    pub fn provider(&self) -> Rc<dyn IdentityProvider> {
        self.provider.get_value()
    }

    /// Redirects to the identity provider's login page. Failures are only logged.
    pub fn sign_in(&self) {
        let provider = self.provider();
        spawn_local(async move {
            tracing::trace!("Redirecting to login...");
            if let Err(err) = provider.sign_in_with_redirect().await {
                tracing::error!(%err, "Login error");
            }
        });
    }

    /// Ends the session. Failures are only logged.
    pub fn sign_out(&self) {
        let provider = self.provider();
        spawn_local(async move {
            tracing::trace!("Logging out...");
            if let Err(err) = provider.sign_out().await {
                tracing::error!(%err, "Logout error");
            }
        });
    }
}

/// Subscribes to `provider` and provides the resulting [`PortalAuth`] as context.
pub fn provide_portal_auth(provider: Rc<dyn IdentityProvider>, portals: RoleUrlTable) -> PortalAuth {
    tracing::trace!("Initializing portal auth...");

    let state = RwSignal::new(provider.snapshot());
    let subscription = provider.subscribe(Box::new(move |snapshot: AuthState| {
        tracing::trace!(is_authenticated = snapshot.is_authenticated, "Session changed");
        state.set(snapshot);
    }));

    let realm_claim = Memo::new(move |_| state.with(|it| it.realm_claim().map(str::to_owned)));
    let portals = StoredValue::new(portals);

    let auth = PortalAuth {
        provider: StoredValue::new_local(provider),
        state: state.into(),
        is_authenticated: Signal::derive(move || state.with(|it| it.is_authenticated)),
        is_admin: Signal::derive(move || realm_claim.with(|claim| is_admin_realm(claim.as_deref()))),
        admin_url: Signal::derive(move || {
            realm_claim.with(|claim| portals.with_value(|it| it.resolve(claim.as_deref()).clone()))
        }),
        login_callback: RwSignal::new(LoginCallback::new()),
        subscription: StoredValue::new_local(subscription),
    };

    provide_context(auth);

    auth
}

/// Returns the [`PortalAuth`] provided by an enclosing [`Portal`](crate::app::Portal).
///
/// # Panics
/// When rendered outside a `Portal`.
pub fn use_portal_auth() -> PortalAuth {
    expect_context::<PortalAuth>()
}
