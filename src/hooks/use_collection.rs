//! コレクション用フック
//!
//! [`Collection`] をシグナルで包み、コンポーネントから操作できるようにする。
//! コレクション名のシグナルが変わったらストレージから読み直す。

use leptos::*;
use serde_json::{json, Map, Value};

use crate::collection::{Collection, CollectionError};
use crate::models::{Entry, Item, ItemId};
use crate::storage::{KeyValueStore, Storage};
use crate::utils::log_trace::{log_error_with_data, log_info_with_data};

pub struct UseCollection<S: 'static> {
    inner: StoredValue<Collection<S>>,
    items: RwSignal<Vec<Entry>>,
    last_error: RwSignal<Option<String>>,
}

// StoredValue/RwSignal はIDなので S に関係なくコピー可能
impl<S: 'static> Clone for UseCollection<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static> Copy for UseCollection<S> {}

pub fn use_collection<S>(storage: Storage<S>, name: impl Into<MaybeSignal<String>>) -> UseCollection<S>
where
    S: KeyValueStore + Clone + 'static,
{
    let name = name.into();
    let initial = name.get_untracked();
    let last_error = create_rw_signal(None::<String>);

    let collection = match Collection::load(storage.clone(), initial.clone()) {
        Ok(c) => c,
        Err(e) => {
            log_error_with_data("collection", &e.to_string(), json!({ "name": initial }));
            last_error.set(Some(e.to_string()));
            Collection::empty(storage, initial)
        }
    };

    let handle = UseCollection {
        items: create_rw_signal(collection.items().to_vec()),
        inner: store_value(collection),
        last_error,
    };

    // 名前が変わった時だけ読み直す（初回は読み込み済み）
    create_effect(move |prev: Option<String>| {
        let next = name.get();
        if prev.is_some_and(|p| p != next) {
            handle.switch_to(next.clone());
        }
        next
    });

    handle
}

impl<S: KeyValueStore + 'static> UseCollection<S> {
    pub fn items(&self) -> Signal<Vec<Entry>> {
        self.items.into()
    }

    pub fn item_count(&self) -> Signal<usize> {
        let items = self.items;
        Signal::derive(move || items.with(|i| i.len()))
    }

    pub fn total_quantity(&self) -> Signal<u64> {
        let items = self.items;
        Signal::derive(move || items.with(|i| i.iter().map(|e| u64::from(e.quantity)).sum()))
    }

    /// 直近の操作で発生したエラー（成功すればNone）
    pub fn last_error(&self) -> Signal<Option<String>> {
        self.last_error.into()
    }

    pub fn name(&self) -> String {
        self.inner.with_value(|c| c.name().to_string())
    }

    pub fn add_item(&self, item: Item) {
        let id = item.id.to_string();
        self.apply("add_item", &id, move |c| c.add_item(item));
    }

    pub fn remove_item(&self, id: ItemId) {
        self.apply("remove_item", &id.to_string(), move |c| c.remove_item(&id));
    }

    pub fn update_item(&self, id: ItemId, updates: Map<String, Value>) {
        self.apply("update_item", &id.to_string(), move |c| c.update_item(&id, updates));
    }

    pub fn clear_items(&self) {
        self.apply("clear_items", "", |c| c.clear_items());
    }

    /// 他のタブ等で書き換えられた内容を読み直す
    pub fn reload(&self) {
        self.apply("reload", "", |c| c.reload().map_err(CollectionError::from));
    }

    pub fn switch_to(&self, name: String) {
        self.apply("switch_to", "", move |c| c.switch_to(name).map_err(CollectionError::from));
    }

    fn apply(&self, op: &str, id: &str, f: impl FnOnce(&mut Collection<S>) -> Result<(), CollectionError>) {
        let mut outcome = None;
        self.inner.update_value(|c| {
            let result = f(c);
            outcome = Some((result, c.name().to_string(), c.items().to_vec()));
        });
        let Some((result, name, items)) = outcome else {
            return;
        };

        self.items.set(items);
        match result {
            Ok(()) => {
                log_info_with_data("collection", op, json!({ "name": name, "id": id }));
                self.last_error.set(None);
            }
            Err(e) => {
                log_error_with_data(
                    "collection",
                    &e.to_string(),
                    json!({ "op": op, "name": name, "id": id }),
                );
                self.last_error.set(Some(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_hook_mirrors_collection() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let cart = use_collection(Storage::new(store.clone()), "cart".to_string());

        cart.add_item(Item::new(1).with("name", "A"));
        cart.add_item(Item::new(1).with("name", "A"));
        cart.add_item(Item::new(2).with("name", "B"));

        assert_eq!(cart.item_count().get_untracked(), 2);
        assert_eq!(cart.total_quantity().get_untracked(), 3);
        assert_eq!(cart.items().get_untracked()[0].quantity, 2);
        assert!(store.contains_key("cart"));

        cart.clear_items();
        assert_eq!(cart.item_count().get_untracked(), 0);
        assert!(!store.contains_key("cart"));

        runtime.dispose();
    }

    #[test]
    fn test_hook_records_errors() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let cart = use_collection(Storage::new(store), "cart".to_string());
        cart.add_item(Item::new(1));

        let mut updates = Map::new();
        updates.insert("quantity".to_string(), Value::from("lots"));
        cart.update_item(ItemId::from(1), updates);
        assert!(cart.last_error().get_untracked().is_some());
        assert_eq!(cart.items().get_untracked()[0].quantity, 1);

        cart.remove_item(ItemId::from(1));
        assert_eq!(cart.last_error().get_untracked(), None);

        runtime.dispose();
    }

    #[test]
    fn test_hook_starts_empty_on_malformed_data() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        store.set_item("favorites", "not json").unwrap();

        let favorites = use_collection(Storage::new(store.clone()), "favorites".to_string());
        assert_eq!(favorites.item_count().get_untracked(), 0);
        assert!(favorites.last_error().get_untracked().is_some());

        favorites.add_item(Item::new("x"));
        assert_eq!(favorites.item_count().get_untracked(), 1);
        assert_eq!(favorites.last_error().get_untracked(), None);

        runtime.dispose();
    }

    #[test]
    fn test_name_signal_change_reloads() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let storage = Storage::new(store.clone());
        storage
            .save_collection("favorites", &[json!({"id": 1}), json!({"id": 2})])
            .unwrap();

        let (name, set_name) = create_signal("cart".to_string());
        let list = use_collection(storage, name);
        list.add_item(Item::new(9));
        assert_eq!(list.item_count().get_untracked(), 1);

        set_name.set("favorites".to_string());
        assert_eq!(list.name(), "favorites");
        assert_eq!(list.item_count().get_untracked(), 2);

        set_name.set("cart".to_string());
        assert_eq!(list.name(), "cart");
        assert_eq!(list.item_count().get_untracked(), 1);

        runtime.dispose();
    }

    #[test]
    fn test_name_signal_change_to_malformed_collection() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        store.set_item("favorites", "not json").unwrap();

        let (name, set_name) = create_signal("cart".to_string());
        let list = use_collection(Storage::new(store.clone()), name);
        list.add_item(Item::new(1));

        set_name.set("favorites".to_string());
        assert_eq!(list.name(), "favorites");
        assert_eq!(list.item_count().get_untracked(), 0);
        assert!(list.last_error().get_untracked().is_some());

        // 壊れたコレクションの代わりに新しい名前へ書き込み、前のコレクションは触らない
        list.add_item(Item::new(2));
        assert_eq!(
            store.get_item("favorites").unwrap().as_deref(),
            Some(r#"[{"id":2,"quantity":1}]"#)
        );
        assert_eq!(
            store.get_item("cart").unwrap().as_deref(),
            Some(r#"[{"id":1,"quantity":1}]"#)
        );

        runtime.dispose();
    }

    #[test]
    fn test_switch_to_reloads() {
        let runtime = create_runtime();
        let store = MemoryStore::new();
        let storage = Storage::new(store.clone());
        storage
            .save_collection("favorites", &[json!({"id": 1}), json!({"id": 2})])
            .unwrap();

        let list = use_collection(storage, "cart".to_string());
        assert_eq!(list.item_count().get_untracked(), 0);
        list.switch_to("favorites".to_string());
        assert_eq!(list.name(), "favorites");
        assert_eq!(list.item_count().get_untracked(), 2);

        Storage::new(store)
            .save_collection("favorites", &[json!({"id": 3})])
            .unwrap();
        list.reload();
        assert_eq!(list.item_count().get_untracked(), 1);

        runtime.dispose();
    }
}
