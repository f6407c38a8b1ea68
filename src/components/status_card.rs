//! デプロイ確認カード

use leptos::*;

use crate::utils::log_trace::{log_error, log_info};
use crate::AppContext;

/// ストレージの状態表示と全データのリセット
#[component]
pub fn StatusCard(persistent: bool) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let AppContext { storage, cart, favorites, .. } = ctx;

    let on_reset = move |_| match storage.clear() {
        Ok(()) => {
            log_info("ui-action", "全データをリセット");
            cart.reload();
            favorites.reload();
        }
        Err(e) => log_error("storage", &e.to_string()),
    };

    view! {
        <div class="status-card">
            <h3 class="status-title">"✓ Deployment Working"</h3>
            <p class="status-text">
                {if persistent {
                    "localStorageに保存しています"
                } else {
                    "localStorageが使えないため、データはこのタブを閉じると消えます"
                }}
            </p>
            <button class="reset-btn" on:click=on_reset>"データをリセット"</button>
        </div>
    }
}
