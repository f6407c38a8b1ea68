//! データ構造体モジュール

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================
// コレクション用データ構造
// ============================================

/// アイテムID（JSONの整数・文字列どちらも可）
///
/// 比較は厳密で、`1` と `"1"` は別のIDとして扱う。
/// 小数・真偽値・nullのIDは受け付けないため、そうしたIDを含む保存データは
/// JSONとして正しくても読み込み時に `StorageError::Malformed` になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Number(i64::from(n))
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}

/// 呼び出し側が渡すアイテム（ID + 任意フィールド）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// フィールドを追加（ビルダー形式）
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}

/// コレクションに保存されたアイテム（数量付き）
///
/// `quantity` は0以上の整数のみ。小数や負数の数量を含む保存データは
/// [`ItemId`] と同様に `StorageError::Malformed` として扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: ItemId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    // 数量のない保存データは1として読む
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Entry {
    /// 初回追加時のエントリ（数量1）
    pub fn first(item: Item) -> Self {
        let Item { id, mut fields } = item;
        fields.remove("quantity");
        Self {
            id,
            fields,
            quantity: 1,
        }
    }

    /// 表示用の名前（`name` フィールド、なければID）
    pub fn label(&self) -> String {
        self.fields
            .get("name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.id.to_string())
    }
}

// ============================================
// UI状態
// ============================================

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Tab {
    #[default]
    Home,
    Cart,
    Favorites,
}
