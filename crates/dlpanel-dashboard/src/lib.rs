//! dlpanel Dashboard — Leptos CSR WASM application.
//!
//! Single-page admin UI for the download service. Session state is
//! cached in `localStorage` and every protected page re-checks the
//! backend session through [`guard::SessionGate`].

pub mod api;
pub mod guard;
pub mod pages;
pub mod storage;
pub mod types;

use dlpanel_common::auth::{now_millis, AuthPatch, AuthStore};
use dlpanel_common::config::DashboardConfig;
use dlpanel_common::session;
use dlpanel_common::ui::{Theme, UiStore};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use guard::{GateHandle, SessionGate};
use pages::login::LoginPage;
use pages::overview::OverviewPage;
use pages::settings::SettingsPage;
use storage::BrowserStorage;

const CONFIG_TOML: &str = include_str!("../dashboard.toml");

// ── Auth State ──────────────────────────────────────────────────────

/// Optimistic auth record, provided via Leptos context. Drives the
/// Login/Logout button; the backend still decides every request.
#[derive(Clone, Copy)]
pub struct AuthContext {
    store: RwSignal<AuthStore<BrowserStorage>>,
}

impl AuthContext {
    /// Load the persisted record, dropping a session whose token has
    /// already lapsed.
    fn init() -> Self {
        let mut store = AuthStore::init(BrowserStorage);
        store.invalidate_if_expired(now_millis());
        Self {
            store: RwSignal::new(store),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.with(|s| s.state().is_authenticated())
    }

    pub fn username(&self) -> Option<String> {
        self.store.with(|s| s.state().username().map(str::to_owned))
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.with(|s| s.state().user_id().map(str::to_owned))
    }

    pub fn token_expiry(&self) -> Option<i64> {
        self.store.with(|s| s.state().token_expiry())
    }

    pub fn token_expired(&self) -> bool {
        self.store.with(|s| s.check_token_expiry())
    }

    pub fn token_untracked(&self) -> Option<String> {
        self.store
            .with_untracked(|s| s.state().token().map(str::to_owned))
    }

    pub fn set_auth(&self, patch: AuthPatch) {
        self.store.update(|s| s.set_auth(patch));
    }

    pub fn set_token(&self, token: String, expiry: Option<i64>) {
        self.store.update(|s| s.set_token(token, expiry));
    }

    pub fn clear_auth(&self) {
        self.store.update(|s| s.clear_auth());
    }
}

// ── UI State ────────────────────────────────────────────────────────

/// Persisted presentation preferences, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct UiContext {
    store: RwSignal<UiStore<BrowserStorage>>,
}

impl UiContext {
    fn init() -> Self {
        Self {
            store: RwSignal::new(UiStore::init(BrowserStorage)),
        }
    }

    pub fn theme(&self) -> Theme {
        self.store.with(|s| s.state().theme())
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.store.with(|s| s.state().sidebar_collapsed())
    }

    pub fn language(&self) -> String {
        self.store.with(|s| s.state().language().to_owned())
    }

    pub fn compact_mode(&self) -> bool {
        self.store.with(|s| s.state().compact_mode())
    }

    pub fn table_page_size(&self) -> u32 {
        self.store.with(|s| s.state().table_page_size())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.update(|s| s.set_theme(theme));
    }

    pub fn toggle_sidebar(&self) {
        self.store.update(|s| s.toggle_sidebar());
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.store.update(|s| s.set_sidebar_collapsed(collapsed));
    }

    pub fn set_language(&self, language: String) {
        self.store.update(|s| s.set_language(language));
    }

    pub fn set_compact_mode(&self, compact: bool) {
        self.store.update(|s| s.set_compact_mode(compact));
    }

    pub fn set_table_page_size(&self, size: u32) {
        self.store.update(|s| s.set_table_page_size(size));
    }
}

/// Mirror theme and density onto `<html>` so stylesheets can key off them.
fn apply_document_prefs(theme: Theme, compact: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if let Err(e) = root.set_attribute("data-theme", theme.as_str()) {
        log::warn!("failed to apply theme: {e:?}");
    }
    let _ = root.set_attribute("data-compact", if compact { "true" } else { "false" });
}

// ── App Root ────────────────────────────────────────────────────────

/// Leptos application root.
#[component]
pub fn App(config: DashboardConfig) -> impl IntoView {
    let auth = AuthContext::init();
    let ui = UiContext::init();
    let gate: GateHandle = RwSignal::new(session::SessionGate::new());

    Effect::new(move || apply_document_prefs(ui.theme(), ui.compact_mode()));

    provide_context(config);
    provide_context(auth);
    provide_context(ui);
    provide_context(gate);

    view! {
        <Router>
            <Routes fallback=|| view! { <Shell><NotFound /></Shell> }>
                <Route path=path!("/login") view=LoginPage />
                <Route
                    path=path!("/")
                    view=|| view! { <Shell><SessionGate><OverviewPage /></SessionGate></Shell> }
                />
                <Route
                    path=path!("/settings")
                    view=|| view! { <Shell><SessionGate><SettingsPage /></SessionGate></Shell> }
                />
            </Routes>
        </Router>
    }
}

// ── Dashboard Shell (sidebar + content) ─────────────────────────────

#[component]
fn Shell(children: Children) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let ui = expect_context::<UiContext>();
    let config = expect_context::<DashboardConfig>();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        let token = auth.token_untracked();
        let config = config.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = api::logout(&config, token.as_deref()).await {
                log::warn!("logout request failed: {e}");
            }
            // Local state is dropped whatever the server said.
            auth.clear_auth();
        });
    };

    view! {
        <div class="app-layout">
            <nav class=move || if ui.sidebar_collapsed() { "sidebar sidebar-collapsed" } else { "sidebar" }>
                <div class="sidebar-brand">
                    <h1>"dlpanel"</h1>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| ui.toggle_sidebar()>
                        {move || if ui.sidebar_collapsed() { "»" } else { "«" }}
                    </button>
                </div>
                <div class="sidebar-nav">
                    <a href="/">
                        <span class="icon">"📥"</span>
                        "Overview"
                    </a>
                    <a href="/settings">
                        <span class="icon">"⚙"</span>
                        "Settings"
                    </a>
                </div>
                <div class="sidebar-footer">
                    {move || if auth.is_authenticated() {
                        let on_logout = on_logout.clone();
                        view! {
                            <div style="display: flex; justify-content: space-between; align-items: center;">
                                <span>{auth.username().unwrap_or_else(|| "signed in".into())}</span>
                                <button class="btn btn-ghost btn-sm" on:click=on_logout>
                                    "Logout"
                                </button>
                            </div>
                        }.into_any()
                    } else {
                        view! { <a class="btn btn-primary btn-sm" href="/login">"Login"</a> }.into_any()
                    }}
                </div>
            </nav>
            <main class="main-content">
                {children()}
            </main>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center py-16 text-center">
            <h3 class="text-lg font-medium mb-2">"Page not found"</h3>
            <a class="btn btn-ghost btn-sm" href="/">"Back to overview"</a>
        </div>
    }
}

// ── WASM entry point ────────────────────────────────────────────────

/// Called by trunk to mount the app.
pub fn main() {
    console_error_panic_hook::set_once();
    let parsed = DashboardConfig::from_toml_str(CONFIG_TOML);
    let level = parsed
        .as_ref()
        .map(DashboardConfig::log_level)
        .unwrap_or(log::Level::Debug);
    let _ = console_log::init_with_level(level);
    let config = parsed.unwrap_or_else(|e| {
        log::warn!("{e}; using default config");
        DashboardConfig::default()
    });
    log::info!("dlpanel dashboard starting");
    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(
            DashboardConfig::from_toml_str(CONFIG_TOML).unwrap(),
            DashboardConfig::default()
        );
    }
}
