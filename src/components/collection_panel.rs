//! コレクション一覧パネル（カート・お気に入り共通）

use leptos::*;
use serde_json::{json, Map, Value};

use crate::hooks::UseCollection;
use crate::models::{Entry, ItemId};
use crate::storage::AnyStore;
use crate::utils::log_trace::log_info;

fn quantity_update(quantity: u32) -> Map<String, Value> {
    let mut updates = Map::new();
    updates.insert("quantity".to_string(), json!(quantity));
    updates
}

/// 1行分（数量の増減・削除）
#[component]
fn EntryRow(entry: Entry, list: UseCollection<AnyStore>) -> impl IntoView {
    let quantity = entry.quantity;
    let id_inc = entry.id.clone();
    let id_dec = entry.id.clone();
    let id_remove: ItemId = entry.id.clone();

    view! {
        <li class="entry-row">
            <span class="entry-name">{entry.label()}</span>
            <span class="entry-quantity">"×" {quantity}</span>
            <button class="qty-btn" on:click=move |_| {
                list.update_item(id_inc.clone(), quantity_update(quantity.saturating_add(1)));
            }>"+"</button>
            <button class="qty-btn" on:click=move |_| {
                // 1個の時に減らしたら削除
                if quantity <= 1 {
                    list.remove_item(id_dec.clone());
                } else {
                    list.update_item(id_dec.clone(), quantity_update(quantity - 1));
                }
            }>"−"</button>
            <button class="remove-btn" on:click=move |_| {
                list.remove_item(id_remove.clone());
            }>"削除"</button>
        </li>
    }
}

#[component]
pub fn CollectionPanel(title: &'static str, list: UseCollection<AnyStore>) -> impl IntoView {
    let items = list.items();
    let item_count = list.item_count();
    let total = list.total_quantity();
    let last_error = list.last_error();

    let on_clear = move |_| {
        log_info("ui-action", &format!("{} を全削除", list.name()));
        list.clear_items();
    };

    view! {
        <div class="collection-panel">
            <div class="panel-header">
                <h2>{title}</h2>
                <span class="count">{move || item_count.get()} "種類 / " {move || total.get()} "点"</span>
                <button class="reload-btn" on:click=move |_| list.reload()>"再読み込み"</button>
            </div>

            {move || last_error.get().map(|e| view! {
                <p class="status error">{e}</p>
            })}

            {move || {
                let entries = items.get();
                if entries.is_empty() {
                    view! { <p class="empty">"まだ何もありません"</p> }.into_view()
                } else {
                    view! {
                        <ul class="entry-list">
                            {entries.into_iter().map(|entry| view! {
                                <EntryRow entry=entry list=list />
                            }).collect_view()}
                        </ul>
                        <button class="clear-btn" on:click=on_clear>"すべて削除"</button>
                    }.into_view()
                }
            }}
        </div>
    }
}
