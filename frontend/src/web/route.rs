//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 路由表是启动时即确定的静态数据：路径模式 -> 页面 + 访问规则。

use adfluencer_shared::Role;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const CREATOR_HOME: &str = "/jobs";
pub const ADVERTISER_HOME: &str = "/influencers";

/// 角色的默认落地页
pub const fn role_home(role: Role) -> &'static str {
    match role {
        Role::ContentCreator => CREATOR_HOME,
        Role::Advertiser => ADVERTISER_HOME,
    }
}

/// 应用页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Landing,
    About,
    Pricing,
    Login,
    Signup,
    Jobs,
    AppliedCampaigns,
    CampaignDetail,
    MyInvitations,
    CreatorChat,
    Influencers,
    InfluencerDetail,
    CreateCampaign,
    MyCampaigns,
    ManageCampaign,
    Applications,
    AdvertiserChat,
    PaymentSuccess,
    PaymentReject,
    Profile,
    /// 不在路由表中，仅在重定向无法收敛时渲染
    NotFound,
}

/// 访问规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 任何人可见；路由表不使用，只作为 [`RouteMatch::not_found`] 的规则
    Public,
    /// 仅未登录可见，已登录者被送回角色首页
    GuestOnly,
    /// 任意已登录角色
    Authenticated,
    /// 仅限列出的角色
    Roles(&'static [Role]),
}

const CREATOR_ONLY: Access = Access::Roles(&[Role::ContentCreator]);
const ADVERTISER_ONLY: Access = Access::Roles(&[Role::Advertiser]);

#[derive(Debug, Clone, Copy)]
pub struct RouteEntry {
    /// 以 `/` 分隔的模式，`:name` 段匹配任意非空段
    pub pattern: &'static str,
    pub page: Page,
    pub access: Access,
}

const fn entry(pattern: &'static str, page: Page, access: Access) -> RouteEntry {
    RouteEntry {
        pattern,
        page,
        access,
    }
}

/// **核心路由表**
pub static ROUTES: &[RouteEntry] = &[
    entry("/", Page::Landing, Access::GuestOnly),
    entry("/about", Page::About, Access::GuestOnly),
    entry("/pricing", Page::Pricing, Access::GuestOnly),
    entry("/login", Page::Login, Access::GuestOnly),
    entry("/signup", Page::Signup, Access::GuestOnly),
    entry("/jobs", Page::Jobs, CREATOR_ONLY),
    entry("/applied-campaigns", Page::AppliedCampaigns, CREATOR_ONLY),
    entry("/campaign/:id", Page::CampaignDetail, CREATOR_ONLY),
    entry("/get-my-invitations", Page::MyInvitations, CREATOR_ONLY),
    entry("/chat/contentcreator", Page::CreatorChat, CREATOR_ONLY),
    entry("/influencers", Page::Influencers, ADVERTISER_ONLY),
    entry("/influencers/:id", Page::InfluencerDetail, ADVERTISER_ONLY),
    entry("/create-campaign", Page::CreateCampaign, ADVERTISER_ONLY),
    entry("/my-campaigns", Page::MyCampaigns, ADVERTISER_ONLY),
    entry("/manage-campaign", Page::ManageCampaign, ADVERTISER_ONLY),
    entry("/applications", Page::Applications, ADVERTISER_ONLY),
    entry("/chat/adversiter", Page::AdvertiserChat, ADVERTISER_ONLY),
    entry("/payment/success", Page::PaymentSuccess, ADVERTISER_ONLY),
    entry("/payment/reject", Page::PaymentReject, ADVERTISER_ONLY),
    entry("/profile", Page::Profile, Access::Authenticated),
];

/// 路由匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: Page,
    pub access: Access,
    /// `:id` 段捕获的值
    pub param: Option<String>,
}

impl RouteMatch {
    /// 兜底页面对任何访客开放，守卫不会再对它重定向
    pub fn not_found() -> Self {
        Self {
            page: Page::NotFound,
            access: Access::Public,
            param: None,
        }
    }
}

/// 规范化路径：去掉查询串与片段、去掉末尾斜杠
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() { ROOT_PATH } else { trimmed }
}

/// 读取查询串中的参数（不做百分号解码，页面间只传递数字 ID）
pub fn query_param<'a>(path: &'a str, key: &str) -> Option<&'a str> {
    let query = path.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// 在给定路由表中查找路径
pub fn match_route(table: &[RouteEntry], path: &str) -> Option<RouteMatch> {
    let path = normalize(path);
    table.iter().find_map(|entry| {
        match_pattern(entry.pattern, path).map(|param| RouteMatch {
            page: entry.page,
            access: entry.access,
            param,
        })
    })
}

/// 匹配单个模式，成功时返回捕获的参数（若有）
///
/// 字面段按 ASCII 忽略大小写比较，参数段保留原样。
fn match_pattern(pattern: &str, path: &str) -> Option<Option<String>> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut param = None;

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(param),
            (Some(p), Some(s)) if p.starts_with(':') => {
                if s.is_empty() {
                    return None;
                }
                param = Some(s.to_string());
            }
            (Some(p), Some(s)) if p.eq_ignore_ascii_case(s) => {}
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_query_fragment_and_trailing_slash() {
        assert_eq!(normalize("/jobs/"), "/jobs");
        assert_eq!(normalize("/payment/success?session_id=42"), "/payment/success");
        assert_eq!(normalize("/#top"), "/");
        assert_eq!(normalize(""), "/");
    }

    #[test]
    fn reads_query_parameters() {
        assert_eq!(query_param("/manage-campaign?id=7", "id"), Some("7"));
        assert_eq!(query_param("/manage-campaign?tab=a&id=7#x", "id"), Some("7"));
        assert_eq!(query_param("/manage-campaign", "id"), None);
        assert_eq!(query_param("/manage-campaign?ids=7", "id"), None);
    }

    #[test]
    fn matches_static_and_parameterised_paths() {
        let m = match_route(ROUTES, "/influencers/17").unwrap();
        assert_eq!(m.page, Page::InfluencerDetail);
        assert_eq!(m.param.as_deref(), Some("17"));

        let m = match_route(ROUTES, "/influencers").unwrap();
        assert_eq!(m.page, Page::Influencers);
        assert_eq!(m.param, None);

        assert_eq!(match_route(ROUTES, "/").unwrap().page, Page::Landing);
    }

    #[test]
    fn literal_segments_ignore_case_but_params_keep_it() {
        assert_eq!(match_route(ROUTES, "/Jobs").unwrap().page, Page::Jobs);
        assert_eq!(match_route(ROUTES, "/Payment/SUCCESS/").unwrap().page, Page::PaymentSuccess);

        let m = match_route(ROUTES, "/Campaign/AbC").unwrap();
        assert_eq!(m.page, Page::CampaignDetail);
        assert_eq!(m.param.as_deref(), Some("AbC"));
    }

    #[test]
    fn public_access_is_reserved_for_the_fallback_page() {
        assert!(ROUTES.iter().all(|e| e.access != Access::Public));
        let fallback = RouteMatch::not_found();
        assert_eq!(fallback.page, Page::NotFound);
        assert_eq!(fallback.access, Access::Public);
    }

    #[test]
    fn unknown_and_partial_paths_do_not_match() {
        assert!(match_route(ROUTES, "/nope").is_none());
        assert!(match_route(ROUTES, "/campaign").is_none());
        assert!(match_route(ROUTES, "/campaign/1/extra").is_none());
    }

    #[test]
    fn role_homes_are_routed_to_their_own_role() {
        for role in [Role::Advertiser, Role::ContentCreator] {
            let m = match_route(ROUTES, role_home(role)).unwrap();
            assert!(matches!(m.access, Access::Roles(roles) if roles == [role]));
        }
    }
}
