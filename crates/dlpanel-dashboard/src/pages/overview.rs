//! Overview page: what the dashboard currently believes about the session.

use chrono::DateTime;
use leptos::prelude::*;

use crate::AuthContext;

fn format_expiry(expiry_ms: Option<i64>) -> String {
    match expiry_ms.and_then(DateTime::from_timestamp_millis) {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "—".into(),
    }
}

#[component]
pub fn OverviewPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();

    view! {
        <div>
            <div class="page-header">
                <div>
                    <h2>"Overview"</h2>
                    <p class="subtitle">"Session cached by this browser"</p>
                </div>
            </div>

            <div class="card">
                <div class="card-header">
                    <h3>"Session"</h3>
                    {move || if auth.is_authenticated() {
                        view! { <span class="badge badge-online"><span class="dot dot-green"></span>"Signed in"</span> }.into_any()
                    } else {
                        view! { <span class="badge badge-offline"><span class="dot dot-gray"></span>"Signed out"</span> }.into_any()
                    }}
                </div>
                <div class="session-meta">
                    <div>"User: " {move || auth.username().unwrap_or_else(|| "—".into())}</div>
                    <div>"User ID: " {move || auth.user_id().unwrap_or_else(|| "—".into())}</div>
                    <div>"Token expires: " {move || format_expiry(auth.token_expiry())}</div>
                    {move || auth.token_expired().then(|| view! {
                        <div class="text-warning">"The cached token has expired. Sign in again to refresh it."</div>
                    })}
                </div>
            </div>
        </div>
    }
}
