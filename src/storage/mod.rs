//! キー・バリューストレージのラッパー
//!
//! 値はすべてJSON文字列として保存する。バックエンドは [`KeyValueStore`] で差し替え可能で、
//! ブラウザでは [`BrowserStore`]（localStorage）、テストでは [`MemoryStore`] を使う。

pub mod browser;
pub mod memory;

pub use browser::BrowserStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::config::{current_item_key, USER_KEY};
use crate::utils::log_trace::log_warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("localStorageが利用できません")]
    Unavailable,

    #[error("ストレージ操作失敗 ({op}): {message}")]
    Backend { op: &'static str, message: String },

    #[error("シリアライズ失敗 (key={key}): {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("保存データが不正です (key={key}): {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 文字列キー・文字列値の同期ストア
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// アプリで使うストア。localStorageが使えない環境（プライベートモード等）ではメモリに退避する
#[derive(Debug, Clone)]
pub enum AnyStore {
    Browser(BrowserStore),
    Memory(MemoryStore),
}

impl AnyStore {
    pub fn browser_or_memory() -> Self {
        match BrowserStore::open() {
            Ok(store) => AnyStore::Browser(store),
            Err(e) => {
                log_warn("storage", &format!("{}。メモリ上に保存します", e));
                AnyStore::Memory(MemoryStore::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, AnyStore::Browser(_))
    }
}

impl KeyValueStore for AnyStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            AnyStore::Browser(s) => s.get_item(key),
            AnyStore::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            AnyStore::Browser(s) => s.set_item(key, value),
            AnyStore::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            AnyStore::Browser(s) => s.remove_item(key),
            AnyStore::Memory(s) => s.remove_item(key),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        match self {
            AnyStore::Browser(s) => s.clear(),
            AnyStore::Memory(s) => s.clear(),
        }
    }
}

/// JSONでシリアライズして保存するストレージファサード
#[derive(Debug, Clone, Default)]
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 値を保存（既存の値は上書き）
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.store.set_item(key, &json)
    }

    /// 値を読み込み。未保存（または空文字列）ならNone
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = match self.store.get_item(key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(None),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(source) => {
                log_warn("storage", &format!("保存データの解析失敗: {} ({})", key, source));
                Err(StorageError::Malformed {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// 値を読み込み。未保存ならデフォルト値を返す
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StorageError> {
        Ok(self.get_opt(key)?.unwrap_or(default))
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove_item(key)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.clear()
    }

    // カート・お気に入りなどのコレクション

    pub fn save_collection<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), StorageError> {
        self.save(name, items)
    }

    /// コレクションを読み込み（未保存なら空）
    pub fn get_collection<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, StorageError> {
        self.get(name, Vec::new())
    }

    // ログインユーザー

    pub fn save_user<T: Serialize>(&self, user: &T) -> Result<(), StorageError> {
        self.save(USER_KEY, user)
    }

    pub fn get_user<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        // `null` が保存されていてもNone
        Ok(self.get_opt::<Option<T>>(USER_KEY)?.flatten())
    }

    // 作業中のアイテム（`current_<name>`）

    pub fn save_current_item<T: Serialize>(&self, name: &str, item: &T) -> Result<(), StorageError> {
        self.save(&current_item_key(name), item)
    }

    pub fn get_current_item<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StorageError> {
        Ok(self.get_opt::<Option<T>>(&current_item_key(name))?.flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, Item};
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        email: String,
    }

    fn storage() -> Storage<MemoryStore> {
        Storage::new(MemoryStore::new())
    }

    #[test]
    fn test_save_and_get() {
        let storage = storage();
        storage.save("theme", &"dark").unwrap();
        assert_eq!(storage.get("theme", String::new()).unwrap(), "dark");
        assert_eq!(storage.store().get_item("theme").unwrap().as_deref(), Some("\"dark\""));
    }

    #[test]
    fn test_save_overwrites() {
        let storage = storage();
        storage.save("count", &1).unwrap();
        storage.save("count", &2).unwrap();
        assert_eq!(storage.get("count", 0).unwrap(), 2);
    }

    #[test]
    fn test_get_returns_default_when_absent() {
        let storage = storage();
        assert_eq!(storage.get("missing", 42).unwrap(), 42);
        assert_eq!(storage.get_opt::<Value>("missing").unwrap(), None);
    }

    #[test]
    fn test_get_treats_empty_string_as_absent() {
        let storage = storage();
        storage.store().set_item("blank", "").unwrap();
        assert_eq!(storage.get("blank", 5).unwrap(), 5);
    }

    #[test]
    fn test_get_malformed_is_error() {
        let storage = storage();
        storage.store().set_item("broken", "{not json").unwrap();
        let err = storage.get("broken", Value::Null).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { ref key, .. } if key == "broken"));
    }

    #[test]
    fn test_remove_and_clear_are_unconditional() {
        let storage = storage();
        storage.remove("never-written").unwrap();
        storage.save("a", &1).unwrap();
        storage.save("b", &2).unwrap();
        storage.remove("a").unwrap();
        assert!(!storage.store().contains_key("a"));
        storage.clear().unwrap();
        assert!(storage.store().is_empty());
        storage.clear().unwrap();
    }

    #[test]
    fn test_get_collection_empty_when_absent() {
        let storage = storage();
        let items: Vec<Entry> = storage.get_collection("cart").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_collection_round_trip() {
        let storage = storage();
        let items = vec![
            json!({"id": 1, "name": "A", "quantity": 3}),
            json!({"id": "x", "tags": ["a", "b"], "nested": {"k": null}}),
        ];
        storage.save_collection("favorites", &items).unwrap();
        let loaded: Vec<Value> = storage.get_collection("favorites").unwrap();
        assert_eq!(loaded, items);

        let entries = vec![Entry::first(Item::new(1).with("name", "A"))];
        storage.save_collection("cart", &entries).unwrap();
        assert_eq!(storage.get_collection::<Entry>("cart").unwrap(), entries);
    }

    #[test]
    fn test_user_slot() {
        let storage = storage();
        assert_eq!(storage.get_user::<User>().unwrap(), None);

        let user = User {
            name: "Aki".to_string(),
            email: "aki@example.com".to_string(),
        };
        storage.save_user(&user).unwrap();
        assert!(storage.store().contains_key("user"));
        assert_eq!(storage.get_user::<User>().unwrap(), Some(user));

        storage.save_user(&Value::Null).unwrap();
        assert_eq!(storage.get_user::<User>().unwrap(), None);
    }

    #[test]
    fn test_current_item_slot_uses_prefix() {
        let storage = storage();
        let item = Item::new(5).with("name", "Draft");
        storage.save_current_item("order", &item).unwrap();
        assert!(storage.store().contains_key("current_order"));
        assert_eq!(storage.get_current_item::<Item>("order").unwrap(), Some(item));
        assert_eq!(storage.get_current_item::<Item>("other").unwrap(), None);
    }

    #[test]
    fn test_any_store_memory_variant() {
        let store = AnyStore::Memory(MemoryStore::new());
        assert!(!store.is_persistent());
        let storage = Storage::new(store);
        storage.save_collection("cart", &[json!({"id": 1})]).unwrap();
        assert_eq!(storage.get_collection::<Value>("cart").unwrap().len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = storage();
        storage.save_collection("cart", &[json!({"id": 1})]).unwrap();
        storage.save_current_item("cart", &json!({"id": 2})).unwrap();
        storage.remove("cart").unwrap();
        assert_eq!(
            storage.get_current_item::<Value>("cart").unwrap(),
            Some(json!({"id": 2}))
        );
    }
}
