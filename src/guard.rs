use crate::routes;
use crate::state::AuthState;
use leptos_router::NavigateOptions;

/// Where to navigate to, and whether to replace the current history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: &'static str,
    pub replace: bool,
}

impl RedirectTarget {
    /// The home page, replacing the current history entry.
    pub const fn home() -> Self {
        Self {
            path: routes::ROOT,
            replace: true,
        }
    }
}

impl From<RedirectTarget> for NavigateOptions {
    fn from(target: RedirectTarget) -> Self {
        NavigateOptions {
            replace: target.replace,
            ..Default::default()
        }
    }
}

/// Outcome of guarding some `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewDecision<C> {
    Redirect(RedirectTarget),
    Render(C),
}

/// Decides whether protected `content` may be shown for `state`.
///
/// Only an authenticated session renders the content, handed back unchanged. Everything else
/// redirects home.
pub fn decide_view<C>(state: &AuthState, content: C) -> ViewDecision<C> {
    match state.is_authenticated {
        true => ViewDecision::Render(content),
        false => ViewDecision::Redirect(RedirectTarget::home()),
    }
}
