//! LocalStorage 封装模块
//!
//! - [`BrowserStorage`]：基于 `web_sys::Storage` 的原始字符串存储，作为会话存储后端
//! - [`load_json`] / [`save_json`]：基于 `gloo-storage` 的 JSON 值存取（筛选条件等）

use gloo_storage::{LocalStorage, Storage};
use serde::{Serialize, de::DeserializeOwned};

use crate::session::SessionStorage;

/// 浏览器 LocalStorage
///
/// 会话的两个键按原始字符串保存（token 不带引号），与服务端下发的格式一致。
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl SessionStorage for BrowserStorage {
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 读取 JSON 值；不存在或无法解析时返回 None
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    LocalStorage::get(key).ok()
}

/// 写入 JSON 值；`None` 删除该键
pub fn save_json<T: Serialize>(key: &str, value: Option<&T>) {
    match value {
        Some(value) => {
            if let Err(e) = LocalStorage::set(key, value) {
                log_warn!("[Storage] Failed to save {}: {}", key, e);
            }
        }
        None => LocalStorage::delete(key),
    }
}
