//! REST 客户端
//!
//! 请求先由 [`ApiClient::prepare`] 纯函数化地组装（URL、请求头、请求体），
//! 再交给 `gloo-net` 发送，组装逻辑因此可以脱离浏览器测试。

use adfluencer_shared::protocol::{ApiRequest, HttpMethod, REGISTER_PATH, update_user_path};
use adfluencer_shared::{HEADER_AUTHORIZATION, UserRecord};
use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::validation::{ProfileUpdate, Registration};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("请求构建失败: {0}")]
    Build(String),
    #[error("网络错误: {0}")]
    Network(String),
    #[error("服务器返回 {status}: {message}")]
    Status { status: u16, message: String },
    #[error("响应解析失败: {0}")]
    Decode(String),
    #[error("请求序列化失败: {0}")]
    Encode(String),
    /// 服务端返回了 `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// 面向用户的提示文字
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Status { status: 401, .. } => "Your session has expired.".into(),
            ApiError::Rejected(message) => message.clone(),
            ApiError::Network(_) => "Could not reach the server.".into(),
            _ => "Something went wrong. Please try again.".into(),
        }
    }
}

/// 已组装、尚未发送的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    /// 未编码的查询参数，发送时由 `RequestBuilder::query` 编码
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let token = token.filter(|t| !t.is_empty());
        Self { base_url, token }
    }

    pub fn from_config(config: &ClientConfig, token: Option<String>) -> Self {
        Self::new(config.api_base_url.clone(), token)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    pub fn prepare<R: ApiRequest>(&self, request: &R) -> Result<PreparedRequest, ApiError> {
        let mut headers = Vec::new();
        if let Some(bearer) = self.bearer() {
            headers.push((HEADER_AUTHORIZATION, bearer));
        }

        let body = if R::METHOD.has_body() {
            let json =
                serde_json::to_string(request).map_err(|e| ApiError::Encode(e.to_string()))?;
            headers.push(("Content-Type", "application/json".to_string()));
            Some(json)
        } else {
            None
        };

        Ok(PreparedRequest {
            method: R::METHOD,
            url: self.url(&request.path()),
            query: request.query(),
            headers,
            body,
        })
    }

    /// 发送一个类型化请求并解码响应
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        let prepared = self.prepare(request)?;
        let text = execute(prepared).await?;

        if R::DISCARD_RESPONSE {
            decode_body("")
        } else {
            decode_body(&text)
        }
    }

    /// 注册（multipart/form-data）
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.send_form(HttpMethod::Post, REGISTER_PATH, registration_fields(registration))
            .await
            .map(|_| ())
    }

    /// 更新用户资料（multipart/form-data）
    ///
    /// 服务端返回的用户记录无法解析时给出 `None`，由调用方在本地合并。
    pub async fn update_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<UserRecord>, ApiError> {
        let text = self
            .send_form(HttpMethod::Put, &update_user_path(user_id), profile_fields(update))
            .await?;
        Ok(decode_body::<Option<UserRecord>>(&text).ok().flatten())
    }

    async fn send_form(
        &self,
        method: HttpMethod,
        path: &str,
        fields: Vec<(&'static str, String)>,
    ) -> Result<String, ApiError> {
        let form = web_sys::FormData::new()
            .map_err(|e| ApiError::Build(format!("创建 FormData 失败: {:?}", e)))?;
        for (name, value) in fields {
            form.append_with_str(name, &value)
                .map_err(|e| ApiError::Build(format!("设置字段 {name} 失败: {:?}", e)))?;
        }

        let url = self.url(path);
        let mut request = builder(method, &url);
        // 不设置 Content-Type，由浏览器生成 multipart 边界
        if let Some(bearer) = self.bearer() {
            request = request.header(HEADER_AUTHORIZATION, &bearer);
        }
        let request = request
            .body(form)
            .map_err(|e| ApiError::Build(e.to_string()))?;
        let response = request.send().await.map_err(|e| {
            log_error!("[Api] {} {} failed: {}", method.as_str(), path, e);
            ApiError::Network(e.to_string())
        })?;

        let text = response.text().await.unwrap_or_default();
        if !response.ok() {
            log_warn!("[Api] {} {} -> {}", method.as_str(), path, response.status());
            return Err(status_error(response.status(), &text));
        }
        Ok(text)
    }
}

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

async fn execute(prepared: PreparedRequest) -> Result<String, ApiError> {
    let PreparedRequest {
        method,
        url,
        query,
        headers,
        body,
    } = prepared;

    let mut request = builder(method, &url);
    if !query.is_empty() {
        request = request.query(query.iter().map(|(name, value)| (*name, value)));
    }
    for (name, value) in &headers {
        request = request.header(name, value);
    }
    let request = match body {
        Some(body) => request.body(body),
        None => request.build(),
    }
    .map_err(|e| ApiError::Build(e.to_string()))?;

    let response = request.send().await.map_err(|e| {
        log_error!("[Api] {} {} failed: {}", method.as_str(), url, e);
        ApiError::Network(e.to_string())
    })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if !response.ok() {
        log_warn!("[Api] {} {} -> {}", method.as_str(), url, status);
        return Err(status_error(status, &text));
    }
    Ok(text)
}

/// 解码响应体；空响应体视为 JSON `null`
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = text.trim();
    let text = if text.is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 从错误响应体中提取提示：优先取 JSON 的 `message` 字段，否则使用原文
fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    ApiError::Status { status, message }
}

/// 注册表单的字段（顺序与服务端表单一致，可选字段为空时省略）
fn registration_fields(registration: &Registration) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("username", registration.username.clone()),
        ("email", registration.email.clone()),
        ("password", registration.password.clone()),
        ("role", registration.role.code().to_string()),
    ];
    if let Some(category) = &registration.category {
        fields.push(("category", category.clone()));
    }
    if let Some(count) = registration.follower_count {
        fields.push(("followerCount", count.to_string()));
    }
    fields
}

/// 资料表单字段，创作者附带类别与粉丝数
fn profile_fields(update: &ProfileUpdate) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("username", update.username.clone()),
        ("email", update.email.clone()),
    ];
    if let Some(category) = &update.category {
        fields.push(("category", category.clone()));
    }
    if let Some(count) = update.follower_count {
        fields.push(("followerCount", count.to_string()));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use adfluencer_shared::protocol::{
        CreatorFilter, ListCampaignsRequest, LoginRequest, SearchCreatorsRequest,
        UpdateInvitationStatusRequest,
    };
    use adfluencer_shared::{ReviewStatus, Role};

    fn header<'a>(req: &'a PreparedRequest, name: &str) -> Option<&'a str> {
        req.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn bearer_token_is_attached_only_when_present() {
        let anonymous = ApiClient::new("https://api.test/", None);
        let req = anonymous.prepare(&ListCampaignsRequest).unwrap();
        assert_eq!(req.url, "https://api.test/Campaigns/all");
        assert_eq!(header(&req, "Authorization"), None);
        assert_eq!(req.body, None);

        let client = ApiClient::new("https://api.test", Some("abc".into()));
        let req = client.prepare(&ListCampaignsRequest).unwrap();
        assert_eq!(header(&req, "Authorization"), Some("Bearer abc"));
        assert_eq!(header(&req, "Content-Type"), None);

        let empty = ApiClient::new("https://api.test", Some(String::new()));
        let req = empty.prepare(&ListCampaignsRequest).unwrap();
        assert_eq!(header(&req, "Authorization"), None);
    }

    #[test]
    fn bodies_are_json_and_exclude_path_params() {
        let client = ApiClient::new("https://api.test", Some("t".into()));

        let req = client
            .prepare(&LoginRequest {
                email: "a@b.co".into(),
                password: "pw".into(),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(header(&req, "Content-Type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(r#"{"email":"a@b.co","password":"pw"}"#));

        let req = client
            .prepare(&UpdateInvitationStatusRequest {
                invitation_id: 5,
                status: ReviewStatus::Rejected,
            })
            .unwrap();
        assert_eq!(req.url, "https://api.test/Campaigns/invitations/5/status");
        assert_eq!(req.body.as_deref(), Some(r#"{"status":2}"#));
    }

    #[test]
    fn search_filters_travel_as_raw_query_pairs() {
        let client = ApiClient::new("https://api.test", None);
        let req = client
            .prepare(&SearchCreatorsRequest {
                filter: CreatorFilter {
                    category: "Food & Travel".into(),
                    min_score: Some(3.5),
                    ..Default::default()
                },
            })
            .unwrap();
        assert_eq!(req.url, "https://api.test/Users/search");
        assert_eq!(
            req.query,
            [
                ("category", "Food & Travel".to_string()),
                ("minScore", "3.5".to_string()),
            ]
        );
        assert!(client.prepare(&ListCampaignsRequest).unwrap().query.is_empty());
    }

    #[test]
    fn empty_body_decodes_as_null() {
        assert!(decode_body::<()>("").is_ok());
        let none: Option<i64> = decode_body("  ").unwrap();
        assert_eq!(none, None);
        let list: Vec<i64> = decode_body("[1,2]").unwrap();
        assert_eq!(list, vec![1, 2]);
        assert!(matches!(decode_body::<Vec<i64>>("{"), Err(ApiError::Decode(_))));
    }

    #[test]
    fn status_errors_prefer_the_server_message() {
        assert_eq!(
            status_error(400, r#"{"message":"Already applied"}"#),
            ApiError::Status {
                status: 400,
                message: "Already applied".into()
            }
        );
        assert_eq!(
            status_error(500, " boom \n"),
            ApiError::Status {
                status: 500,
                message: "boom".into()
            }
        );
        assert_eq!(
            status_error(401, "").user_message(),
            "Your session has expired."
        );
    }

    #[test]
    fn registration_omits_missing_optional_fields() {
        let mut registration = Registration {
            username: "brand".into(),
            email: "b@x.co".into(),
            password: "secret".into(),
            role: Role::Advertiser,
            follower_count: None,
            category: None,
        };
        let names: Vec<_> = registration_fields(&registration)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, ["username", "email", "password", "role"]);

        registration.role = Role::ContentCreator;
        registration.follower_count = Some(1200);
        registration.category = Some("Travel".into());
        let fields = registration_fields(&registration);
        assert!(fields.contains(&("role", "1".to_string())));
        assert!(fields.contains(&("followerCount", "1200".to_string())));
        assert!(fields.contains(&("category", "Travel".to_string())));
    }

    #[test]
    fn profile_fields_carry_creator_extras() {
        let update = ProfileUpdate {
            username: "ayse".into(),
            email: "a@b.co".into(),
            category: Some("Food".into()),
            follower_count: Some(900),
        };
        assert_eq!(
            profile_fields(&update),
            [
                ("username", "ayse".to_string()),
                ("email", "a@b.co".to_string()),
                ("category", "Food".to_string()),
                ("followerCount", "900".to_string()),
            ]
        );
    }
}
