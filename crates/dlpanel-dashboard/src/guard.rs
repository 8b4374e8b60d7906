//! Route guard for protected pages.

use dlpanel_common::config::DashboardConfig;
use dlpanel_common::session::{self, GateView};
use leptos::prelude::*;

use crate::api;
use crate::AuthContext;

/// Shared gate state; one per app, so a late response from a previous
/// page can be told apart from the current one.
pub type GateHandle = RwSignal<session::SessionGate>;

/// Checks the backend session on every mount, then always renders
/// `children`. Until the first answer arrives only a spinner is shown.
/// When the answer is "not authenticated" (or the check failed) a
/// dismissible login banner sits above the content.
#[component]
pub fn SessionGate(children: ChildrenFn) -> impl IntoView {
    let gate = expect_context::<GateHandle>();
    let config = expect_context::<DashboardConfig>();
    let auth = expect_context::<AuthContext>();

    if let Some(ticket) = gate.try_update(|g| g.mount()) {
        let token = auth.token_untracked();
        leptos::task::spawn_local(async move {
            let result = api::auth_status(&config, token.as_deref()).await;
            // The app may have been torn down while the request was out.
            let _ = gate.try_update(|g| g.resolve(ticket, result));
        });
        on_cleanup(move || {
            let _ = gate.try_update(|g| g.unmount(ticket));
        });
    }

    let gate_view = Memo::new(move |_| gate.with(|g| g.view()));
    let (dismissed, set_dismissed) = signal(false);
    let show_banner = move || {
        matches!(gate_view.get(), GateView::Content { login_banner: true }) && !dismissed.get()
    };

    view! {
        <Show
            when=move || gate_view.get() != GateView::Loading
            fallback=|| view! {
                <div class="flex items-center justify-center min-h-screen w-full">
                    <span class="loading loading-spinner loading-lg"></span>
                </div>
            }
        >
            {move || show_banner().then(|| view! {
                <div class="alert alert-warning text-sm mb-4" role="alert">
                    <span>"You are not signed in. Some data may be unavailable."</span>
                    <a href="/login" class="btn btn-sm btn-primary">"Sign in"</a>
                    <button class="btn btn-sm btn-ghost" on:click=move |_| set_dismissed.set(true)>
                        "Dismiss"
                    </button>
                </div>
            })}
            {children()}
        </Show>
    }
}
