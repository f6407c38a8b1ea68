//! コレクション管理（カート・お気に入りなど）
//!
//! メモリ上の順序付きリストを保持し、変更のたびにリスト全体を
//! コレクション名のキーでストレージに書き込む。
//! 同じ名前のコレクションを複数インスタンスで操作した場合は後勝ちになる（同期はしない）。

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Entry, Item, ItemId};
use crate::storage::{KeyValueStore, Storage, StorageError};
use crate::utils::log_trace::{log_info, log_warn};

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("アイテム {id} の更新内容が不正です: {source}")]
    InvalidUpdate {
        id: ItemId,
        #[source]
        source: serde_json::Error,
    },

    #[error("ID {id} は既に存在します")]
    DuplicateId { id: ItemId },
}

pub struct Collection<S> {
    storage: Storage<S>,
    name: String,
    items: Vec<Entry>,
}

impl<S: KeyValueStore> Collection<S> {
    /// ストレージから読み込んで生成
    pub fn load(storage: Storage<S>, name: impl Into<String>) -> Result<Self, StorageError> {
        let name = name.into();
        let items = storage.get_collection(&name)?;
        Ok(Self {
            storage,
            name,
            items,
        })
    }

    /// 読み込まずに空で生成（保存データが壊れている場合の退避用）
    pub fn empty(storage: Storage<S>, name: impl Into<String>) -> Self {
        Self {
            storage,
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// 別のコレクション名に切り替えて読み直す
    ///
    /// 読み込みに失敗しても名前は切り替わり、リストは空になる。
    /// 以降の書き込みが前のコレクションのキーに入らないようにするため。
    pub fn switch_to(&mut self, name: impl Into<String>) -> Result<(), StorageError> {
        self.name = name.into();
        self.items.clear();
        self.reload()
    }

    /// 現在の名前で読み直す
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.items = self.storage.get_collection(&self.name)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// 数量の合計（カートのバッジ表示用）
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// 追加。既存IDなら数量を+1（既存のフィールドはそのまま）
    pub fn add_item(&mut self, item: Item) -> Result<(), CollectionError> {
        let mut next = self.items.clone();
        match next.iter_mut().find(|e| e.id == item.id) {
            Some(existing) => {
                // 数量0や欠損は1とみなす
                existing.quantity = existing.quantity.max(1).saturating_add(1);
            }
            None => next.push(Entry::first(item)),
        }
        self.commit(next)
    }

    /// 削除（存在しないIDは何もしない）
    pub fn remove_item(&mut self, id: &ItemId) -> Result<(), CollectionError> {
        let next: Vec<Entry> = self.items.iter().filter(|e| &e.id != id).cloned().collect();
        self.commit(next)
    }

    /// 指定フィールドだけ上書き（浅いマージ）
    pub fn update_item(&mut self, id: &ItemId, updates: Map<String, Value>) -> Result<(), CollectionError> {
        let mut next = self.items.clone();
        if let Some(pos) = next.iter().position(|e| &e.id == id) {
            let merged = merge_entry(&next[pos], updates)?;
            if &merged.id != id && next.iter().any(|e| e.id == merged.id) {
                return Err(CollectionError::DuplicateId { id: merged.id });
            }
            next[pos] = merged;
        }
        self.commit(next)
    }

    /// 全削除。空リストを書くのではなくキー自体を消す
    pub fn clear_items(&mut self) -> Result<(), CollectionError> {
        self.storage.remove(&self.name)?;
        self.items.clear();
        log_info("collection", &format!("{} をクリア", self.name));
        Ok(())
    }

    // 書き込みに成功してからメモリに反映
    fn commit(&mut self, next: Vec<Entry>) -> Result<(), CollectionError> {
        self.storage.save_collection(&self.name, &next)?;
        self.items = next;
        Ok(())
    }
}

fn merge_entry(entry: &Entry, updates: Map<String, Value>) -> Result<Entry, CollectionError> {
    let invalid = |source| CollectionError::InvalidUpdate {
        id: entry.id.clone(),
        source,
    };
    let mut object = match serde_json::to_value(entry).map_err(invalid)? {
        Value::Object(object) => object,
        _ => Map::new(),
    };
    object.extend(updates);
    serde_json::from_value(Value::Object(object)).map_err(|source| {
        log_warn("collection", &format!("更新をスキップ: {} ({})", entry.id, source));
        invalid(source)
    })
}
