use crate::callback::{CallbackState, LoginCallback, handle_redirect};
use crate::guard::{RedirectTarget, ViewDecision, decide_view};
use crate::hooks::use_portal_auth;
use crate::routes;
use crate::state::{format_time_left, pretty_token};
use leptos::either::Either;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::NavigateOptions;
use leptos_router::components::{A, Redirect};
use leptos_router::hooks::use_navigate;
use leptos_use::{UseIntervalReturn, use_interval};
use std::sync::Arc;
use time::OffsetDateTime;

/// Renders `children` only for an authenticated session. Otherwise redirects home, replacing the
/// current history entry.
///
/// # Example
/// ```no_run
/// use leptos::prelude::*;
/// use partner_portal::components::ProtectedRoute;
///
/// # #[component]
/// # fn Component() -> impl IntoView {
/// view! {
///     <ProtectedRoute>
///         <p>"Your secure content here"</p>
///     </ProtectedRoute>
/// }
/// # }
/// ```
#[component]
#[allow(clippy::must_use_candidate)]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_portal_auth();

    move || match auth.state.with(|state| decide_view(state, Arc::clone(&children))) {
        ViewDecision::Render(children) => Either::Left(children()),
        ViewDecision::Redirect(target) => {
            tracing::trace!(path = target.path, "Not authenticated. Redirecting...");
            Either::Right(view! { <Redirect path=target.path options=NavigateOptions::from(target)/> })
        }
    }
}

#[component]
#[allow(clippy::must_use_candidate)]
pub fn LoginButton() -> impl IntoView {
    let auth = use_portal_auth();
    view! {
        <button class="login-button" on:click=move |_| auth.sign_in()>
            "Login"
        </button>
    }
}

#[component]
#[allow(clippy::must_use_candidate)]
pub fn LogoutButton() -> impl IntoView {
    let auth = use_portal_auth();
    view! {
        <button class="logout-button" on:click=move |_| auth.sign_out()>
            "Logout"
        </button>
    }
}

/// Finishes the login handshake when the identity provider redirects back to us.
///
/// Navigates home once the handshake succeeded or the session turned authenticated. Shows an
/// error and a link home when the handshake genuinely failed.
#[component]
#[allow(clippy::must_use_candidate)]
pub fn LoginCallbackPage() -> impl IntoView {
    let auth = use_portal_auth();
    let callback = auth.login_callback;
    let navigate = use_navigate();

    let go = move |target: Option<RedirectTarget>| {
        if let Some(target) = target {
            tracing::trace!(path = target.path, "Leaving login callback");
            navigate(target.path, NavigateOptions::from(target));
        }
    };

    Effect::new({
        let go = go.clone();
        move |_| {
            let is_authenticated = auth.is_authenticated.get();
            let target = callback
                .try_update(|it| it.observe_session(is_authenticated))
                .flatten();
            go(target);
        }
    });

    Effect::new(move |_| {
        // The completion call must only ever be issued once per page load.
        if callback.try_update(LoginCallback::start) != Some(true) {
            return;
        }
        let provider = auth.provider();
        let go = go.clone();
        spawn_local(async move {
            let outcome = handle_redirect(provider.as_ref()).await;
            let target = callback.try_update(|it| it.settle(outcome)).flatten();
            go(target);
        });
    });

    let failure = Memo::new(move |_| {
        callback.with(|it| match it.state() {
            CallbackState::Error(failure) => Some(failure.user_message()),
            CallbackState::Pending | CallbackState::Success => None,
        })
    });

    move || match failure.get() {
        Some(message) => Either::Left(view! {
            <div class="login-callback">
                <h2>"Error during login"</h2>
                <p id="login-error">{message}</p>
                <A href=routes::ROOT>"Return to Home"</A>
            </div>
        }),
        None => Either::Right(view! {
            <div class="login-callback">
                <h2>"Processing login..."</h2>
                <p>"Please wait while we complete your authentication."</p>
            </div>
        }),
    }
}

/// Shows the session's ID and access token as JSON, together with their remaining lifetime.
#[component]
#[allow(clippy::must_use_candidate)]
pub fn TokenDisplay() -> impl IntoView {
    let auth = use_portal_auth();

    let now = {
        let UseIntervalReturn { counter, .. } = use_interval::<u64>(1000);
        Memo::new(move |_| {
            let _count = counter.get();
            OffsetDateTime::now_utc()
        })
    };

    let id_token_json = Signal::derive(move || {
        auth.state
            .with(|state| pretty_token(state.id_token.as_ref()))
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "Could not serialize id token");
                String::new()
            })
    });
    let access_token_json = Signal::derive(move || {
        auth.state
            .with(|state| pretty_token(state.access_token.as_ref()))
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "Could not serialize access token");
                String::new()
            })
    });

    let id_token_expires_in = Signal::derive(move || {
        auth.state.with(|state| {
            state
                .id_token
                .as_ref()
                .map(|token| format_time_left(token.expires_in(now.get())))
        })
    });
    let access_token_expires_in = Signal::derive(move || {
        auth.state.with(|state| {
            state
                .access_token
                .as_ref()
                .map(|token| format_time_left(token.expires_in(now.get())))
        })
    });

    view! {
        <Show
            when=move || auth.is_authenticated.get()
            fallback=|| view! { <div>"Please log in to view tokens"</div> }
        >
            <div class="token-display">
                <h2>"Token Information"</h2>

                <div class="token">
                    <h3>"ID Token"</h3>
                    <Show when=move || id_token_expires_in.read().is_some()>
                        <p>"Expires in: " {move || id_token_expires_in.get()}</p>
                    </Show>
                    <pre id="id-token">{move || id_token_json.get()}</pre>
                </div>

                <div class="token">
                    <h3>"Access Token"</h3>
                    <Show when=move || access_token_expires_in.read().is_some()>
                        <p>"Expires in: " {move || access_token_expires_in.get()}</p>
                    </Show>
                    <pre id="access-token">{move || access_token_json.get()}</pre>
                </div>
            </div>
        </Show>
    }
}
