//! 客户端配置
//!
//! 构建时可通过环境变量覆盖，未设置或为空时使用默认值：
//! - `ADFLUENCER_API_URL`：REST API 基础地址
//! - `ADFLUENCER_HUB_URL`：实时聊天 hub 地址

const DEFAULT_API_URL: &str = "https://localhost:5000";
const DEFAULT_HUB_URL: &str = "https://localhost:5003/hubs/chat";

/// 通知提示自动消失的时间
pub const NOTICE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub hub_url: String,
}

/// 去掉首尾空白与末尾斜杠，空值回退到默认
fn url_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_overrides(option_env!("ADFLUENCER_API_URL"), option_env!("ADFLUENCER_HUB_URL"))
    }

    fn from_overrides(api_url: Option<&str>, hub_url: Option<&str>) -> Self {
        Self {
            api_base_url: url_or(api_url, DEFAULT_API_URL),
            hub_url: url_or(hub_url, DEFAULT_HUB_URL),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_overrides(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "https://localhost:5000");
        assert_eq!(config.hub_url, "https://localhost:5003/hubs/chat");
    }

    #[test]
    fn overrides_are_trimmed_and_blank_values_ignored() {
        let config = ClientConfig::from_overrides(
            Some(" https://api.example.com/ "),
            Some("https://chat.example.com/hubs/chat/"),
        );
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.hub_url, "https://chat.example.com/hubs/chat");

        let config = ClientConfig::from_overrides(Some(""), Some("   "));
        assert_eq!(config, ClientConfig::default());
    }
}
