use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 持久化 bearer token 的存储键
pub const STORAGE_TOKEN_KEY: &str = "token";
/// 持久化用户记录的存储键
pub const STORAGE_USER_KEY: &str = "user";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

// =========================================================
// 角色 (Role)
// =========================================================

/// 市场中的两类参与者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 广告主（品牌/公司），线上编码为 0
    Advertiser,
    /// 内容创作者（网红），线上编码为 1
    ContentCreator,
}

impl Role {
    /// 将线上的数字角色编码转换为角色标签。
    ///
    /// 0 为 `Advertiser`，其余任意值均为 `ContentCreator`（并不严格校验 1）。
    pub const fn from_code(code: i64) -> Self {
        if code == 0 {
            Role::Advertiser
        } else {
            Role::ContentCreator
        }
    }

    /// 规范化的线上编码（注册表单等出站数据使用）
    pub const fn code(self) -> i64 {
        match self {
            Role::Advertiser => 0,
            Role::ContentCreator => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Role::Advertiser => "Advertiser",
            Role::ContentCreator => "Content creator",
        }
    }
}

/// 与 [`Role::from_code`] 相同，便于以函数形式传递
pub fn resolve_role(code: i64) -> Role {
    Role::from_code(code)
}

// =========================================================
// 用户 (User)
// =========================================================

/// 登录响应及 `/Users/*` 返回的用户记录（线上格式，角色为原始数字）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// 客户端内部使用的身份，角色已在边界处解析完成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub photo_url: Option<String>,
}

impl From<UserRecord> for Identity {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            role: Role::from_code(record.role),
            photo_url: record.photo_url.or(record.photo),
        }
    }
}

impl From<&Identity> for UserRecord {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role.code(),
            photo: None,
            photo_url: identity.photo_url.clone(),
        }
    }
}

/// 内容创作者的公开档案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCreator {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub avg_likes: f64,
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub engagement60_day: f64,
}

/// 注册与筛选共用的创作者类别
pub const CATEGORIES: &[&str] = &[
    "E-Commerce",
    "Technology",
    "Fashion",
    "Cosmetics",
    "Food",
    "Sustainability",
    "Gaming",
    "Pets",
    "Music",
    "Art",
    "Finance",
    "Health",
    "Automotive",
    "Family",
    "Sports",
    "Home & Living",
];

/// 部分接口将列表包装在 `data` 字段中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataList<T> {
    pub data: Vec<T>,
}

// =========================================================
// 认证 (Auth)
// =========================================================

/// 带 success 标记的通用响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// `Option` 缺省即为 `None`；加 `#[serde(default)]` 会要求 `T: Default`
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: UserRecord,
}

// =========================================================
// 活动 (Campaigns)
// =========================================================

/// 申请/邀请的处理状态（线上编码 0/1/2）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl From<u8> for ReviewStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => ReviewStatus::Accepted,
            2 => ReviewStatus::Rejected,
            _ => ReviewStatus::Pending,
        }
    }
}

impl From<ReviewStatus> for u8 {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pending => 0,
            ReviewStatus::Accepted => 1,
            ReviewStatus::Rejected => 2,
        }
    }
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "Pending",
            ReviewStatus::Accepted => "Accepted",
            ReviewStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub max_capacity: u32,
    #[serde(default)]
    pub advertiser_id: i64,
    #[serde(default)]
    pub advertiser: Option<UserRecord>,
    #[serde(default)]
    pub invitations: Option<Vec<Invitation>>,
    #[serde(default)]
    pub applications: Option<Vec<Application>>,
    #[serde(default)]
    pub is_active: bool,
}

impl Campaign {
    /// 活动状态编码：0 进行中，1 已暂停
    pub const fn status_label(&self) -> &'static str {
        match self.status {
            0 => "Active",
            1 => "Paused",
            _ => "Unknown",
        }
    }
}

/// 金额显示：千位分隔，整数不带小数，否则保留两位
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac:02}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub campaign_id: i64,
    #[serde(default)]
    pub content_creator_id: Option<i64>,
    #[serde(default)]
    pub application_date: Option<String>,
    #[serde(default)]
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: i64,
    pub campaign_id: i64,
    pub content_creator_id: i64,
    #[serde(default)]
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub id: i64,
    pub campaign_id: i64,
    pub content_creator_id: i64,
    pub advertiser_id: i64,
    #[serde(default)]
    pub status: u8,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub agreement_date: Option<String>,
}

impl Agreement {
    /// 对话另一方的用户 ID
    pub fn counterpart_id(&self, role: Role) -> i64 {
        match role {
            Role::Advertiser => self.content_creator_id,
            Role::ContentCreator => self.advertiser_id,
        }
    }
}

// =========================================================
// 消息 (Messages)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_zero_is_advertiser_everything_else_is_creator() {
        assert_eq!(resolve_role(0), Role::Advertiser);
        assert_eq!(resolve_role(1), Role::ContentCreator);
        assert_eq!(resolve_role(-5), Role::ContentCreator);
        assert_eq!(resolve_role(42), Role::ContentCreator);
    }

    #[test]
    fn identity_resolves_role_and_prefers_photo_url() {
        let record: UserRecord = serde_json::from_str(
            r#"{"id":7,"username":"ayse","email":"a@b.co","role":1,"photo":"p.png","photoUrl":"u.png"}"#,
        )
        .unwrap();
        let identity = Identity::from(record);
        assert_eq!(identity.role, Role::ContentCreator);
        assert_eq!(identity.photo_url.as_deref(), Some("u.png"));
    }

    #[test]
    fn review_status_uses_numeric_codes() {
        let app: Application =
            serde_json::from_str(r#"{"id":1,"campaignId":3,"status":2}"#).unwrap();
        assert_eq!(app.status, ReviewStatus::Rejected);
        assert_eq!(serde_json::to_string(&ReviewStatus::Accepted).unwrap(), "1");
    }

    #[test]
    fn amounts_are_grouped_by_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(2500.0), "2,500");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-1000.25), "-1,000.25");
        assert_eq!(format_amount(f64::NAN), "0");
    }

    #[test]
    fn counterpart_depends_on_viewer_role() {
        let agreement = Agreement {
            id: 1,
            campaign_id: 2,
            content_creator_id: 10,
            advertiser_id: 20,
            status: 0,
            currency: "TRY".into(),
            budget: 100.0,
            title: String::new(),
            description: String::new(),
            agreement_date: None,
        };
        assert_eq!(agreement.counterpart_id(Role::Advertiser), 10);
        assert_eq!(agreement.counterpart_id(Role::ContentCreator), 20);
    }

    #[test]
    fn login_envelope_decodes_token_and_user() {
        let envelope: ApiEnvelope<LoginPayload> = serde_json::from_str(
            r#"{"success":true,"message":"ok","data":{"token":"t","user":{"id":3,"username":"brand","email":"b@x.co","role":0}}}"#,
        )
        .unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("ok"));
        let payload = envelope.data.unwrap();
        assert_eq!(payload.token, "t");
        assert_eq!(Identity::from(payload.user).role, Role::Advertiser);

        let failed: ApiEnvelope<LoginPayload> =
            serde_json::from_str(r#"{"success":false,"message":"Invalid credentials"}"#).unwrap();
        assert!(!failed.success);
        assert!(failed.data.is_none());
    }
}
