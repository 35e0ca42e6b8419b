#![allow(dead_code)]

use async_trait::async_trait;
use partner_portal::{AuthState, IdentityProvider, IdentityProviderError, SessionProvider, Subscription};
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub mod tracing {
    pub fn init_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(::tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }
}

/// An authenticated session, as the SDK would report it.
pub fn authenticated(name: &str, realm: Option<&str>) -> AuthState {
    let mut claims = json!({ "sub": "00u1", "name": name });
    if let Some(realm) = realm {
        claims["realmName"] = json!(realm);
    }
    serde_json::from_value(json!({
        "isAuthenticated": true,
        "idToken": {
            "idToken": "eyJraWQiOi...",
            "claims": claims,
            "expiresAt": 1_700_000_000,
            "scopes": ["openid", "profile", "email"]
        },
        "accessToken": {
            "accessToken": "eyJhY2Nlc3M...",
            "claims": { "sub": "00u1" },
            "expiresAt": 1_700_000_000,
            "tokenType": "Bearer"
        }
    }))
    .expect("valid auth state")
}

type Listeners = Rc<RefCell<Vec<(usize, Rc<dyn Fn(AuthState)>)>>>;

/// In-memory identity provider. Sessions change only when a test says so.
pub struct FakeIdentityProvider {
    state: RefCell<AuthState>,
    listeners: Listeners,
    next_listener_id: Cell<usize>,

    redirect_result: RefCell<Result<(), IdentityProviderError>>,
    session_after_redirect: RefCell<Option<AuthState>>,

    pub sign_in_calls: Cell<usize>,
    pub sign_out_calls: Cell<usize>,
    pub handle_redirect_calls: Cell<usize>,
}

impl FakeIdentityProvider {
    pub fn new(state: AuthState) -> Self {
        Self {
            state: RefCell::new(state),
            listeners: Rc::default(),
            next_listener_id: Cell::new(0),
            redirect_result: RefCell::new(Ok(())),
            session_after_redirect: RefCell::new(None),
            sign_in_calls: Cell::new(0),
            sign_out_calls: Cell::new(0),
            handle_redirect_calls: Cell::new(0),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(AuthState::default())
    }

    /// The outcome of every following `handle_login_redirect` call.
    pub fn redirect_fails_with(self, message: &str) -> Self {
        *self.redirect_result.borrow_mut() = Err(IdentityProviderError::from_redirect_failure(message));
        self
    }

    /// Session the SDK stores while handling the redirect, before the call settles.
    pub fn redirect_stores(self, state: AuthState) -> Self {
        *self.session_after_redirect.borrow_mut() = Some(state);
        self
    }

    /// Replaces the session and notifies all listeners.
    pub fn set_state(&self, state: AuthState) {
        *self.state.borrow_mut() = state.clone();
        let listeners = self.listeners.borrow().clone();
        for (_, listener) in listeners {
            listener(state.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl SessionProvider for FakeIdentityProvider {
    fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn subscribe(&self, listener: Box<dyn Fn(AuthState)>) -> Subscription {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::from(listener)));

        let listeners = Rc::clone(&self.listeners);
        Subscription::new(move || listeners.borrow_mut().retain(|(it, _)| *it != id))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_with_redirect(&self) -> Result<(), IdentityProviderError> {
        self.sign_in_calls.set(self.sign_in_calls.get() + 1);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        self.set_state(AuthState::default());
        Ok(())
    }

    async fn handle_login_redirect(&self) -> Result<(), IdentityProviderError> {
        self.handle_redirect_calls.set(self.handle_redirect_calls.get() + 1);
        let stored = self.session_after_redirect.borrow_mut().take();
        if let Some(state) = stored {
            self.set_state(state);
        }
        self.redirect_result.borrow().clone()
    }
}
