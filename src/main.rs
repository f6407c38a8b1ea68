use leptos::*;

use collection_shell::components::{CollectionPanel, LogFooter, StatusCard};
use collection_shell::config;
use collection_shell::hooks::use_collection;
use collection_shell::models::Tab;
use collection_shell::pages::Home;
use collection_shell::storage::{AnyStore, Storage};
use collection_shell::utils::log_trace::log_info;
use collection_shell::AppContext;

// ============================================
// メインアプリ（タブ切り替え）
// ============================================

#[component]
fn App() -> impl IntoView {
    let (current_tab, set_current_tab) = create_signal(Tab::Home);

    let store = AnyStore::browser_or_memory();
    let persistent = store.is_persistent();
    let storage = Storage::new(store);

    let cart = use_collection(storage.clone(), config::CART.to_string());
    let favorites = use_collection(storage.clone(), config::FAVORITES.to_string());
    let cart_total = cart.total_quantity();
    let favorite_count = favorites.item_count();

    provide_context(AppContext {
        storage,
        cart,
        favorites,
        set_tab: set_current_tab,
    });

    let select_tab = move |tab: Tab| {
        log_info("ui-action", &format!("タブ切り替え: {:?}", tab));
        set_current_tab.set(tab);
    };

    view! {
        <div class="app">
            <header class="app-header">
                <h1>{config::APP_TITLE}</h1>
                <nav class="tabs">
                    <button
                        class=move || if current_tab.get() == Tab::Home { "active" } else { "" }
                        on:click=move |_| select_tab(Tab::Home)
                    >
                        "ホーム"
                    </button>
                    <button
                        class=move || if current_tab.get() == Tab::Cart { "active" } else { "" }
                        on:click=move |_| select_tab(Tab::Cart)
                    >
                        "カート (" {move || cart_total.get()} ")"
                    </button>
                    <button
                        class=move || if current_tab.get() == Tab::Favorites { "active" } else { "" }
                        on:click=move |_| select_tab(Tab::Favorites)
                    >
                        "お気に入り (" {move || favorite_count.get()} ")"
                    </button>
                </nav>
            </header>

            <main class="container">
                <StatusCard persistent=persistent />
                {move || match current_tab.get() {
                    Tab::Home => view! { <Home /> }.into_view(),
                    Tab::Cart => view! { <CollectionPanel title="カート" list=cart /> }.into_view(),
                    Tab::Favorites => view! { <CollectionPanel title="お気に入り" list=favorites /> }.into_view(),
                }}
            </main>

            <LogFooter />
        </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
