//! メモリ上のストア（テスト・localStorageが使えない環境用）

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{KeyValueStore, StorageError};

/// 複製したハンドルは同じマップを共有する
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries.borrow_mut().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set_item("k", "v").unwrap();
        assert_eq!(b.get_item("k").unwrap().as_deref(), Some("v"));
        b.remove_item("k").unwrap();
        assert!(a.is_empty());
    }

    #[test]
    fn test_len() {
        let store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        store.set_item("b", "3").unwrap();
        assert_eq!(store.len(), 2);
        store.clear().unwrap();
        assert_eq!(store.len(), 0);
    }
}
