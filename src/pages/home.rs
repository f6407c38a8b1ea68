//! トップページ（ヒーロー + サンプル商品）

use leptos::*;
use serde::{Deserialize, Serialize};

use crate::config::{APP_TITLE, CART};
use crate::models::{Item, Tab};
use crate::storage::{KeyValueStore, Storage};
use crate::utils::log_trace::{log_error, log_info};
use crate::AppContext;

/// ログインユーザー（`user` キーに保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
}

/// 動作確認用のサンプル商品
fn sample_items() -> Vec<Item> {
    vec![
        Item::new(1).with("name", "Green Tea").with("price", 480),
        Item::new(2).with("name", "Matcha Latte").with("price", 620),
        Item::new(3).with("name", "Hojicha").with("price", 450),
    ]
}

fn item_name(item: &Item) -> Option<String> {
    item.fields.get("name").and_then(|v| v.as_str()).map(String::from)
}

/// 最後にカートへ追加した商品名（`current_cart`）。壊れていればログに残してNone
pub fn load_last_added<S: KeyValueStore>(storage: &Storage<S>) -> Option<String> {
    match storage.get_current_item::<Item>(CART) {
        Ok(item) => item.as_ref().and_then(item_name),
        Err(e) => {
            log_error("storage", &e.to_string());
            None
        }
    }
}

#[component]
fn ProductCard(item: Item, set_last_added: WriteSignal<Option<String>>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let name = item_name(&item).unwrap_or_default();
    let price = item.fields.get("price").and_then(|v| v.as_u64()).unwrap_or(0);
    let (added, set_added) = create_signal(false);

    let AppContext { storage, cart, favorites, .. } = ctx;
    let cart_item = item.clone();
    let favorite_item = item;

    let on_add = move |_| {
        // 最後に触った商品として記録
        match storage.save_current_item(CART, &cart_item) {
            Ok(()) => set_last_added.set(item_name(&cart_item)),
            Err(e) => log_error("storage", &e.to_string()),
        }
        cart.add_item(cart_item.clone());
        set_added.set(true);
        // 2秒後にリセット
        spawn_local(async move {
            gloo::timers::future::TimeoutFuture::new(2000).await;
            set_added.set(false);
        });
    };

    view! {
        <div class="product-card">
            <h4>{name}</h4>
            <span class="price">"¥" {price}</span>
            <button on:click=on_add>
                {move || if added.get() { "追加しました!" } else { "カートに追加" }}
            </button>
            <button class="favorite-btn" on:click=move |_| favorites.add_item(favorite_item.clone())>
                "☆"
            </button>
        </div>
    }
}

#[component]
pub fn Home() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let set_tab = ctx.set_tab;
    let storage = ctx.storage;

    let stored_user = storage.get_user::<User>().unwrap_or_else(|e| {
        log_error("storage", &e.to_string());
        None
    });
    let (user, set_user) = create_signal(stored_user);
    let (name_input, set_name_input) = create_signal(String::new());

    let (last_added, set_last_added) = create_signal(load_last_added(&storage));

    let on_save_user = move |_| {
        let name = name_input.get().trim().to_string();
        if name.is_empty() {
            return;
        }
        let new_user = User { name };
        match storage.save_user(&new_user) {
            Ok(()) => {
                log_info("ui-action", &format!("ユーザー保存: {}", new_user.name));
                set_user.set(Some(new_user));
            }
            Err(e) => log_error("storage", &e.to_string()),
        }
    };

    view! {
        <div class="home">
            <section class="hero">
                <h1>{APP_TITLE}</h1>
                <p class="tagline">"Ready to build your challenge"</p>
                <button class="get-started" on:click=move |_| set_tab.set(Tab::Cart)>
                    "Get Started"
                </button>
            </section>

            <section class="user-section">
                {move || match user.get() {
                    Some(u) => view! { <p class="greeting">"ようこそ、" {u.name} "さん"</p> }.into_view(),
                    None => view! {
                        <div class="input-group">
                            <input type="text" placeholder="お名前"
                                prop:value=move || name_input.get()
                                on:input=move |ev| set_name_input.set(event_target_value(&ev)) />
                            <button on:click=on_save_user.clone()>"保存"</button>
                        </div>
                    }.into_view(),
                }}
            </section>

            {move || last_added.get().map(|name| view! {
                <p class="last-viewed">"最後に追加した商品: " {name}</p>
            })}

            <section class="products">
                {sample_items().into_iter().map(|item| view! {
                    <ProductCard item=item set_last_added=set_last_added />
                }).collect_view()}
            </section>
        </div>
    }
}
