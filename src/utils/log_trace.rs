//! 時系列トレースログシステム
//! ストレージ操作とUIイベントを記録し、後から確認できるようにする

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[cfg(target_arch = "wasm32")]
use crate::config::LOG_TRACE_KEY;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub category: String, // "storage", "collection", "ui-action"
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Default)]
pub struct LogTrace {
    logs: VecDeque<LogEntry>,
}

impl LogTrace {
    pub fn new() -> Self {
        let mut trace = LogTrace {
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
        };
        trace.load_from_storage();
        trace
    }

    pub fn log(&mut self, level: LogLevel, category: &str, message: &str, data: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            category: category.to_string(),
            message: message.to_string(),
            data,
        };

        write_console(level, category, message);

        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);

        self.save_to_storage();
    }

    pub fn get_logs(&self) -> Vec<LogEntry> {
        self.logs.iter().cloned().collect()
    }

    pub fn get_logs_json(&self) -> String {
        let logs: Vec<&LogEntry> = self.logs.iter().collect();
        serde_json::to_string_pretty(&logs).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn clear(&mut self) {
        self.logs.clear();
        self.save_to_storage();
    }

    // ログ自体はストレージファサードを通さず直接localStorageへ書く（ログのログを防ぐ）
    #[cfg(target_arch = "wasm32")]
    fn load_from_storage(&mut self) {
        let json_str = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(LOG_TRACE_KEY).ok().flatten());
        if let Some(json_str) = json_str {
            if let Ok(logs) = serde_json::from_str::<Vec<LogEntry>>(&json_str) {
                self.logs = logs.into_iter().collect();
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from_storage(&mut self) {}

    #[cfg(target_arch = "wasm32")]
    fn save_to_storage(&self) {
        if let Some(window) = web_sys::window() {
            if let Ok(Some(storage)) = window.local_storage() {
                let json_str = serde_json::to_string(&self.logs).unwrap_or_else(|_| "[]".to_string());
                let _ = storage.set_item(LOG_TRACE_KEY, &json_str);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to_storage(&self) {}

    #[cfg(target_arch = "wasm32")]
    pub fn download_logs(&self) {
        use wasm_bindgen::{JsCast, JsValue};

        let json_str = self.get_logs_json();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let filename = format!("log_trace_{}.json", timestamp);

        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                let blob_parts = js_sys::Array::new();
                blob_parts.push(&JsValue::from_str(&json_str));

                let options = web_sys::BlobPropertyBag::new();
                options.set_type("application/json");

                if let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&blob_parts, &options) {
                    if let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) {
                        if let Ok(a) = document.create_element("a") {
                            let _ = a.set_attribute("href", &url);
                            let _ = a.set_attribute("download", &filename);
                            if let Some(element) = a.dyn_ref::<web_sys::HtmlElement>() {
                                element.click();
                            }
                            let _ = web_sys::Url::revoke_object_url(&url);
                        }
                    }
                }
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn download_logs(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: LogLevel, category: &str, message: &str) {
    let line = format!("[{}] {}", category, message);
    match level {
        LogLevel::Error => web_sys::console::error_1(&line.into()),
        LogLevel::Warn => web_sys::console::warn_1(&line.into()),
        LogLevel::Info => web_sys::console::log_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(_level: LogLevel, _category: &str, _message: &str) {}

// グローバルなログトレースインスタンス
thread_local! {
    static LOG_TRACE: std::cell::RefCell<LogTrace> = std::cell::RefCell::new(LogTrace::new());
}

pub fn log_info(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log(LogLevel::Info, category, message, None);
    });
}

pub fn log_info_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log(LogLevel::Info, category, message, Some(data));
    });
}

pub fn log_warn(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log(LogLevel::Warn, category, message, None);
    });
}

pub fn log_error(category: &str, message: &str) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log(LogLevel::Error, category, message, None);
    });
}

pub fn log_error_with_data(category: &str, message: &str, data: serde_json::Value) {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().log(LogLevel::Error, category, message, Some(data));
    });
}

pub fn download_logs() {
    LOG_TRACE.with(|trace| {
        trace.borrow().download_logs();
    });
}

pub fn clear_logs() {
    LOG_TRACE.with(|trace| {
        trace.borrow_mut().clear();
    });
}

pub fn get_logs() -> Vec<LogEntry> {
    LOG_TRACE.with(|trace| trace.borrow().get_logs())
}

pub fn log_count() -> usize {
    LOG_TRACE.with(|trace| trace.borrow().len())
}
