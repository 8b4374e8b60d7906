//! Login page component.

use dlpanel_common::auth::{expiry_from_ttl, now_millis, AuthPatch};
use dlpanel_common::config::DashboardConfig;
use leptos::ev;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api;
use crate::AuthContext;

/// Login page — username/password form.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let config = expect_context::<DashboardConfig>();
    let navigate = use_navigate();
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(Option::<String>::None);
    let (loading, set_loading) = signal(false);

    let do_login = move |username_val: String, password_val: String| {
        set_loading.set(true);
        set_error.set(None);
        let config = config.clone();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(&config, &username_val, &password_val).await {
                Ok(resp) => {
                    auth.set_auth(AuthPatch {
                        user_id: resp.user_id,
                        username: Some(resp.username.unwrap_or(username_val)),
                        ..AuthPatch::default()
                    });
                    auth.set_token(resp.token, expiry_from_ttl(now_millis(), resp.expires_in));
                    set_loading.set(false);
                    navigate("/", Default::default());
                }
                Err(e) => {
                    log::warn!("login failed: {e}");
                    set_error.set(Some(e));
                    set_loading.set(false);
                }
            }
        });
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let username_val = username.get_untracked();
        let password_val = password.get_untracked();
        if username_val.is_empty() || password_val.is_empty() {
            set_error.set(Some("Username and password are required".into()));
            return;
        }
        do_login(username_val, password_val);
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-100">
            <div class="card bg-base-200 border border-base-300 w-full max-w-sm">
                <div class="card-body">
                    <h1 class="text-2xl font-bold text-center">"dlpanel"</h1>
                    <p class="text-center text-sm text-base-content/60 mb-4">"Download service administration"</p>

                    {move || error.get().map(|e| view! {
                        <div class="alert alert-error text-sm mb-4">{e}</div>
                    })}

                    <form on:submit=on_submit>
                        <fieldset class="fieldset">
                            <label class="fieldset-label" for="username">"Username"</label>
                            <input
                                id="username"
                                class="input input-bordered w-full"
                                type="text"
                                autocomplete="username"
                                prop:value=move || username.get()
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                            />
                        </fieldset>
                        <fieldset class="fieldset">
                            <label class="fieldset-label" for="password">"Password"</label>
                            <input
                                id="password"
                                class="input input-bordered w-full"
                                type="password"
                                placeholder="••••••••"
                                autocomplete="current-password"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                            />
                        </fieldset>
                        <button
                            class="btn btn-primary w-full mt-4"
                            type="submit"
                            disabled=move || loading.get()
                        >
                            {move || if loading.get() { "Signing in…" } else { "Sign in" }}
                        </button>
                    </form>
                    <a class="btn btn-ghost btn-sm mt-2" href="/">"Continue without signing in"</a>
                </div>
            </div>
        </div>
    }
}
