//! Binding to the Okta browser SDK (`okta-auth-js`).
//!
//! The SDK must be loaded by the page, exposing the global `OktaAuth` class. It owns everything
//! security relevant: PKCE, the token exchange, validation, storage and renewal.

use crate::config::PortalConfig;
use crate::error::{ConfigError, IdentityProviderError};
use crate::session::{IdentityProvider, SessionProvider, Subscription};
use crate::state::AuthState;
use async_trait::async_trait;
use leptos::prelude::window;
use serde::Serialize;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    type OktaAuth;

    #[wasm_bindgen(constructor, catch)]
    fn new(options: &JsValue) -> Result<OktaAuth, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signInWithRedirect)]
    async fn sign_in_with_redirect(this: &OktaAuth) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = signOut)]
    async fn sign_out(this: &OktaAuth) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch, js_name = handleLoginRedirect)]
    async fn handle_login_redirect(this: &OktaAuth) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, catch)]
    async fn start(this: &OktaAuth) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, getter, js_name = authStateManager)]
    fn auth_state_manager(this: &OktaAuth) -> AuthStateManager;

    type AuthStateManager;

    #[wasm_bindgen(method, js_name = getAuthState)]
    fn get_auth_state(this: &AuthStateManager) -> JsValue;

    #[wasm_bindgen(method)]
    fn subscribe(this: &AuthStateManager, handler: &Closure<dyn Fn(JsValue)>);

    #[wasm_bindgen(method)]
    fn unsubscribe(this: &AuthStateManager, handler: &Closure<dyn Fn(JsValue)>);
}

/// Constructor options of `OktaAuth`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OktaAuthOptions<'a> {
    client_id: &'a str,
    issuer: &'a Url,
    redirect_uri: &'a Url,
    scopes: &'a [String],
    pkce: bool,
}

/// [`IdentityProvider`] backed by an `OktaAuth` instance.
pub struct OktaIdentityProvider {
    auth: OktaAuth,

    /// Handed to the SDK as `restoreOriginalUri`. Must outlive `auth`.
    #[allow(unused)]
    restore_original_uri: Closure<dyn Fn(JsValue, JsValue)>,
}

impl std::fmt::Debug for OktaIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OktaIdentityProvider").finish_non_exhaustive()
    }
}

impl OktaIdentityProvider {
    pub fn new(config: &PortalConfig, redirect_uri: &Url) -> Result<Self, IdentityProviderError> {
        let options = serde_wasm_bindgen::to_value(&OktaAuthOptions {
            client_id: &config.client_id,
            issuer: &config.issuer,
            redirect_uri,
            scopes: &config.scopes,
            pkce: config.pkce,
        })
        .map_err(|err| IdentityProviderError::Initialize {
            message: err.to_string(),
        })?;

        // The SDK would otherwise reload the page after the handshake. Leaving the callback page
        // is up to `LoginCallbackPage`.
        let restore_original_uri =
            Closure::<dyn Fn(JsValue, JsValue)>::new(|_auth: JsValue, original_uri: JsValue| {
                tracing::trace!(?original_uri, "Not restoring original uri");
            });
        js_sys::Reflect::set(
            &options,
            &JsValue::from_str("restoreOriginalUri"),
            restore_original_uri.as_ref(),
        )
        .map_err(|err| IdentityProviderError::Initialize {
            message: js_error_message(&err),
        })?;

        let auth = OktaAuth::new(&options).map_err(|err| IdentityProviderError::Initialize {
            message: js_error_message(&err),
        })?;

        tracing::debug!(client_id = %config.client_id, issuer = %config.issuer, %redirect_uri, "Created OktaAuth");

        Ok(Self {
            auth,
            restore_original_uri,
        })
    }

    /// Starts the SDK's background services (token renewal, cross-tab sync).
    pub async fn start(&self) {
        match self.auth.start().await {
            Ok(_) => tracing::trace!("OktaAuth started"),
            Err(err) => tracing::error!(err = %js_error_message(&err), "Could not start OktaAuth"),
        }
    }
}

impl SessionProvider for OktaIdentityProvider {
    fn snapshot(&self) -> AuthState {
        decode_auth_state(self.auth.auth_state_manager().get_auth_state())
    }

    fn subscribe(&self, listener: Box<dyn Fn(AuthState)>) -> Subscription {
        let handler =
            Closure::<dyn Fn(JsValue)>::new(move |state: JsValue| listener(decode_auth_state(state)));
        let manager = self.auth.auth_state_manager();
        manager.subscribe(&handler);
        Subscription::new(move || manager.unsubscribe(&handler))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for OktaIdentityProvider {
    async fn sign_in_with_redirect(&self) -> Result<(), IdentityProviderError> {
        self.auth
            .sign_in_with_redirect()
            .await
            .map(drop)
            .map_err(|err| IdentityProviderError::SignIn {
                message: js_error_message(&err),
            })
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.auth
            .sign_out()
            .await
            .map(drop)
            .map_err(|err| IdentityProviderError::SignOut {
                message: js_error_message(&err),
            })
    }

    async fn handle_login_redirect(&self) -> Result<(), IdentityProviderError> {
        self.auth
            .handle_login_redirect()
            .await
            .map(drop)
            .map_err(|err| IdentityProviderError::from_redirect_failure(js_error_message(&err)))
    }
}

/// The SDK reports "no state yet" as `null`. Anything we cannot read counts as unauthenticated.
fn decode_auth_state(value: JsValue) -> AuthState {
    if value.is_null() || value.is_undefined() {
        return AuthState::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_else(|err| {
        tracing::warn!(%err, "Could not read auth state. Treating session as unauthenticated");
        AuthState::default()
    })
}

fn js_error_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Origin of the page we are served from, e.g. "https://portal.example.com".
pub fn current_origin() -> Result<String, ConfigError> {
    window().location().origin().map_err(|err| {
        tracing::error!(err = %js_error_message(&err), "Could not read window origin");
        ConfigError::Missing {
            name: "window origin",
        }
    })
}
