//! Adfluencer 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话存储（唯一的可变共享状态）
//! - `web::route`: 路由表（领域模型）
//! - `web::guard`: 路由守卫（纯函数）
//! - `web::chrome`: 页眉/页脚选择（纯函数）
//! - `web::router`: 路由服务（History API 引擎）
//! - `web::hub`: 实时聊天 hub 客户端
//! - `auth`: 会话与 Leptos 信号的桥接、登录/注册流程
//! - `components`: UI 组件层

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (::web_sys::console::warn_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (::web_sys::console::error_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
mod auth;
pub mod config;
pub mod session;
pub mod validation;

mod components {
    pub mod advertiser;
    pub mod chat;
    pub mod creator;
    pub mod headers;
    pub mod landing;
    pub mod login;
    pub mod notice;
    pub mod profile;
    pub mod signup;
    pub mod widgets;
}

pub mod web {
    pub mod chrome;
    pub mod guard;
    pub mod hub;
    pub mod route;
    pub mod router;
    mod storage;

    pub use storage::{BrowserStorage, load_json, save_json};
}

use crate::auth::{AuthContext, init_auth};
use crate::components::advertiser::{
    ApplicationsPage, CreateCampaignPage, InfluencerDetailPage, InfluencersPage,
    ManageCampaignPage, MyCampaignsPage, PaymentResultPage,
};
use crate::components::chat::ChatPage;
use crate::components::creator::{
    AppliedCampaignsPage, CampaignDetailPage, JobsPage, MyInvitationsPage,
};
use crate::components::headers::{AdvertiserHeader, CreatorHeader, Footer, PublicHeader};
use crate::components::landing::{AboutPage, LandingPage, PricingPage};
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::signup::SignupPage;

use adfluencer_shared::Role;
use leptos::prelude::*;

use web::chrome::{HeaderKind, compose};
use web::route::{Page, RouteMatch};
use web::router::{Router, RouterOutlet, use_router};

/// 路由匹配函数
///
/// 根据守卫放行后的路由返回对应的视图组件。
fn route_matcher(route: RouteMatch) -> AnyView {
    let param = route.param.clone();
    match route.page {
        Page::Landing => view! { <LandingPage /> }.into_any(),
        Page::About => view! { <AboutPage /> }.into_any(),
        Page::Pricing => view! { <PricingPage /> }.into_any(),
        Page::Login => view! { <LoginPage /> }.into_any(),
        Page::Signup => view! { <SignupPage /> }.into_any(),
        Page::Jobs => view! { <JobsPage /> }.into_any(),
        Page::AppliedCampaigns => view! { <AppliedCampaignsPage /> }.into_any(),
        Page::CampaignDetail => view! { <CampaignDetailPage id=param /> }.into_any(),
        Page::MyInvitations => view! { <MyInvitationsPage /> }.into_any(),
        Page::CreatorChat => view! { <ChatPage role=Role::ContentCreator /> }.into_any(),
        Page::Influencers => view! { <InfluencersPage /> }.into_any(),
        Page::InfluencerDetail => view! { <InfluencerDetailPage id=param /> }.into_any(),
        Page::CreateCampaign => view! { <CreateCampaignPage /> }.into_any(),
        Page::MyCampaigns => view! { <MyCampaignsPage /> }.into_any(),
        Page::ManageCampaign => view! { <ManageCampaignPage /> }.into_any(),
        Page::Applications => view! { <ApplicationsPage /> }.into_any(),
        Page::AdvertiserChat => view! { <ChatPage role=Role::Advertiser /> }.into_any(),
        Page::PaymentSuccess => view! { <PaymentResultPage success=true /> }.into_any(),
        Page::PaymentReject => view! { <PaymentResultPage success=false /> }.into_any(),
        Page::Profile => view! { <ProfilePage /> }.into_any(),
        Page::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 页面外壳
///
/// 根据当前路径与会话选择页眉/页脚，不影响守卫的决策。
#[component]
fn Shell() -> impl IntoView {
    let router = use_router();
    let auth = auth::use_auth();

    let chrome = Memo::new(move |_| {
        let path = router.current().with(|r| r.path.clone());
        auth.session.with(|s| compose(&path, s.as_ref()))
    });

    view! {
        <div class="flex flex-col min-h-screen">
            {move || match chrome.get().header {
                Some(HeaderKind::Public) => view! { <PublicHeader /> }.into_any(),
                Some(HeaderKind::Advertiser) => view! { <AdvertiserHeader /> }.into_any(),
                Some(HeaderKind::ContentCreator) => view! { <CreatorHeader /> }.into_any(),
                None => ().into_any(),
            }}
            <main class="flex-1">
                <RouterOutlet matcher=route_matcher />
            </main>
            <Show when=move || chrome.get().footer>
                <Footer />
            </Show>
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 从 LocalStorage 恢复会话
    init_auth(&auth_ctx);

    // 3. 获取会话信号，用于注入路由服务（解耦！）
    let session = auth_ctx.session_signal();

    view! {
        // 4. 路由器组件：注入会话信号实现守卫
        <Router session=session>
            <Shell />
        </Router>
    }
}
