//! Settings page: presentation preferences.

use dlpanel_common::ui::Theme;
use leptos::prelude::*;

use crate::UiContext;

const LANGUAGES: [(&str, &str); 3] = [("en-US", "English"), ("zh-CN", "中文"), ("de-DE", "Deutsch")];
const PAGE_SIZES: [u32; 4] = [10, 20, 50, 100];

#[component]
pub fn SettingsPage() -> impl IntoView {
    let ui = expect_context::<UiContext>();

    view! {
        <div>
            <div class="page-header">
                <div>
                    <h2>"Settings"</h2>
                    <p class="subtitle">"Stored in this browser only"</p>
                </div>
            </div>

            <div class="card">
                <div class="form-group">
                    <label>"Theme"</label>
                    <select
                        class="form-input"
                        on:change=move |ev| {
                            match event_target_value(&ev).parse::<Theme>() {
                                Ok(theme) => ui.set_theme(theme),
                                Err(e) => log::warn!("{e}"),
                            }
                        }
                    >
                        {Theme::ALL.into_iter().map(|theme| view! {
                            <option value=theme.as_str() selected=move || ui.theme() == theme>
                                {theme.as_str()}
                            </option>
                        }).collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label>"Language"</label>
                    <select
                        class="form-input"
                        on:change=move |ev| ui.set_language(event_target_value(&ev))
                    >
                        {LANGUAGES.into_iter().map(|(code, name)| view! {
                            <option value=code selected=move || ui.language() == code>{name}</option>
                        }).collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label>"Rows per page"</label>
                    <select
                        class="form-input"
                        on:change=move |ev| {
                            if let Ok(size) = event_target_value(&ev).parse::<u32>() {
                                ui.set_table_page_size(size);
                            }
                        }
                    >
                        {PAGE_SIZES.into_iter().map(|size| view! {
                            <option value=size.to_string() selected=move || ui.table_page_size() == size>
                                {size}
                            </option>
                        }).collect_view()}
                    </select>
                </div>

                <div class="form-group">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || ui.compact_mode()
                            on:change=move |ev| ui.set_compact_mode(event_target_checked(&ev))
                        />
                        " Compact tables"
                    </label>
                </div>

                <div class="form-group">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || ui.sidebar_collapsed()
                            on:change=move |ev| ui.set_sidebar_collapsed(event_target_checked(&ev))
                        />
                        " Collapse sidebar"
                    </label>
                </div>
            </div>
        </div>
    }
}
