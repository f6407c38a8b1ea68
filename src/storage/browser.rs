//! localStorageバックエンド

use wasm_bindgen::JsValue;

use super::{KeyValueStore, StorageError};

/// `window.localStorage` のハンドル
#[derive(Debug, Clone)]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

impl BrowserStore {
    /// localStorageを取得（プライベートモード等で使えない場合はエラー）
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|e| backend_error("local_storage", e))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn backend_error(op: &'static str, e: JsValue) -> StorageError {
    StorageError::Backend {
        op,
        message: format!("{:?}", e),
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| backend_error("getItem", e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // 容量超過（QuotaExceededError）もここで返る
        self.storage
            .set_item(key, value)
            .map_err(|e| backend_error("setItem", e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| backend_error("removeItem", e))
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear().map_err(|e| backend_error("clear", e))
    }
}
