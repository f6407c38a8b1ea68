//! アプリ設定（ストレージキーとコレクション名）

/// アプリ名（ヘッダー表示）
pub const APP_TITLE: &str = "Competition MVP";

/// ユーザー情報の保存キー
pub const USER_KEY: &str = "user";

/// 「現在のアイテム」スロットのキー接頭辞（`current_<name>`）
pub const CURRENT_ITEM_PREFIX: &str = "current_";

/// ログトレースの保存キー
pub const LOG_TRACE_KEY: &str = "collection_shell_log_trace";

// コレクション名
pub const CART: &str = "cart";
pub const FAVORITES: &str = "favorites";

/// `current_<name>` キーを組み立てる
pub fn current_item_key(name: &str) -> String {
    format!("{}{}", CURRENT_ITEM_PREFIX, name)
}
