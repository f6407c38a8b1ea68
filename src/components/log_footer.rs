//! ログ操作フッター

use leptos::*;
use crate::utils::log_trace::{clear_logs, download_logs, log_count};

#[component]
pub fn LogFooter() -> impl IntoView {
    let (count, set_count) = create_signal(log_count());

    view! {
        <footer class="log-footer">
            <span class="log-count">"ログ: " {move || count.get()} "件"</span>
            <button on:click=move |_| {
                download_logs();
                set_count.set(log_count());
            }>"ログをダウンロード"</button>
            <button on:click=move |_| {
                clear_logs();
                set_count.set(log_count());
            }>"ログをクリア"</button>
        </footer>
    }
}
