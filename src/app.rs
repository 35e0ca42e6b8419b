use crate::components::{LoginButton, LoginCallbackPage, LogoutButton, ProtectedRoute, TokenDisplay};
use crate::config::PortalConfig;
use crate::error::{ConfigSnafu, IdentityProviderSnafu, PortalError};
use crate::hooks::{provide_portal_auth, use_portal_auth};
use crate::okta::{OktaIdentityProvider, current_origin};
use crate::realm::RoleUrlTable;
use crate::routes;
use crate::session::IdentityProvider;
use leptos::either::Either;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::{A, Route, Router, Routes};
use leptos_router::path;
use snafu::ResultExt;
use std::rc::Rc;

/// Entry point: wires the Okta SDK into the [`Portal`].
#[component]
#[allow(clippy::must_use_candidate)]
pub fn App() -> impl IntoView {
    match bootstrap() {
        Ok((provider, portals)) => Either::Left(view! { <Portal provider=provider portals=portals/> }),
        Err(err) => {
            tracing::error!(%err, "Could not start the partner portal");
            Either::Right(view! {
                <div class="bootstrap-error">
                    <h2>"The partner portal is currently unavailable."</h2>
                    <p>{err.to_string()}</p>
                </div>
            })
        }
    }
}

fn bootstrap() -> Result<(Rc<dyn IdentityProvider>, RoleUrlTable), PortalError> {
    let config = PortalConfig::load().context(ConfigSnafu)?;
    let origin = current_origin().context(ConfigSnafu)?;
    let redirect_uri = config.redirect_uri(&origin).context(ConfigSnafu)?;

    let okta =
        Rc::new(OktaIdentityProvider::new(&config, &redirect_uri).context(IdentityProviderSnafu)?);
    spawn_local({
        let okta = Rc::clone(&okta);
        async move { okta.start().await }
    });

    Ok((okta, config.portals))
}

/// The portal's routes, served against any [`IdentityProvider`].
#[component]
#[allow(clippy::must_use_candidate)]
pub fn Portal(provider: Rc<dyn IdentityProvider>, portals: RoleUrlTable) -> impl IntoView {
    let _auth = provide_portal_auth(provider, portals);

    view! {
        <main class="portal">
            <Router>
                <Routes fallback=|| view! { "Page not found." }>
                    <Route path=path!("/") view=HomePage/>
                    <Route path=path!("/protected") view=|| view! { <ProtectedRoute><TokenDisplay/></ProtectedRoute> }/>
                    <Route path=path!("/login/callback") view=LoginCallbackPage/>
                </Routes>
            </Router>
        </main>
    }
}

#[component]
#[allow(clippy::must_use_candidate)]
pub fn HomePage() -> impl IntoView {
    let auth = use_portal_auth();
    let greeting_name = Signal::derive(move || {
        auth.state
            .with(|state| state.greeting_name().map(str::to_owned))
    });
    let admin_url = Signal::derive(move || auth.admin_url.get().to_string());

    view! {
        <div class="home">
            <header>
                <h1>"Partner Portal"</h1>
                <nav>
                    <Show when=move || auth.is_authenticated.get() fallback=|| view! { <LoginButton/> }>
                        <A href=routes::PROTECTED>"Protected Page"</A>
                        <Show when=move || auth.is_admin.get()>
                            <a id="admin-link" href=move || admin_url.get() target="_blank" rel="noopener noreferrer">
                                "Admin"
                            </a>
                        </Show>
                        <LogoutButton/>
                    </Show>
                </nav>
            </header>

            <section class="welcome">
                <h2>
                    "Welcome to the Sherwin Williams Partner Portal"
                    {move || greeting_name.get().map(|name| view! {
                        <span class="greeting">"Hello, " {name} "!"</span>
                    })}
                </h2>
                <p>
                    "Streamline your product verification process with our secure partner portal. "
                    "Access real-time product information, verify availability, and manage customer data efficiently."
                </p>
            </section>

            <Show when=move || auth.is_admin.get()>
                <section class="admin-dashboard">
                    <h3>"Admin Dashboard"</h3>
                    <p>"Welcome to the admin dashboard. Manage users, configure settings, and monitor system activity."</p>
                    <a href=move || admin_url.get() target="_blank" rel="noopener noreferrer">
                        "Access Admin Portal"
                    </a>
                </section>
            </Show>

            <section class="features">
                <FeatureCard
                    title="Real-time Information"
                    text="Instantly verify product availability and product details for your customers."
                />
                <FeatureCard
                    title="Secure Access"
                    text="Enterprise-grade security to protect sensitive customer information."
                />
                <FeatureCard
                    title="24/7 Availability"
                    text="Access the portal anytime, anywhere to meet your business needs."
                />
            </section>

            <Show when=move || !auth.is_authenticated.get()>
                <section class="get-started">
                    <h3>"Ready to Get Started?"</h3>
                    <p>"Log in to access the partner portal and start verifying product availability."</p>
                    <LoginButton/>
                </section>
            </Show>

            <footer>
                <p>"© 2024 USAA. All rights reserved."</p>
                <p>
                    "For support, please contact: "
                    <a href="mailto:support@usaa.com">"support@usaa.com"</a>
                </p>
            </footer>
        </div>
    }
}

#[component]
fn FeatureCard(title: &'static str, text: &'static str) -> impl IntoView {
    view! {
        <div class="feature-card">
            <h3>{title}</h3>
            <p>{text}</p>
        </div>
    }
}
