//! 汎用ストレージラッパーとコレクション管理を備えた1ページUIシェル

pub mod collection;
pub mod components;
pub mod config;
pub mod hooks;
pub mod models;
pub mod pages;
pub mod storage;
pub mod utils;

use leptos::WriteSignal;

use hooks::UseCollection;
use models::Tab;
use storage::{AnyStore, Storage};

/// アプリ共通コンテキスト
#[derive(Clone)]
pub struct AppContext {
    pub storage: Storage<AnyStore>,
    pub cart: UseCollection<AnyStore>,
    pub favorites: UseCollection<AnyStore>,
    pub set_tab: WriteSignal<Tab>,
}
