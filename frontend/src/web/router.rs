//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 每一次 push / popstate / 会话变化都先经过 [`resolve`](super::guard::resolve)，
//! 地址栏始终显示守卫放行后的最终路径。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::guard::{Resolved, resolve};
use super::route::ROOT_PATH;
use crate::session::Session;

/// 获取当前浏览器路径（含查询串）
fn current_location() -> String {
    web_sys::window()
        .map(|w| w.location())
        .and_then(|l| {
            let path = l.pathname().ok()?;
            let search = l.search().unwrap_or_default();
            Some(format!("{path}{search}"))
        })
        .unwrap_or_else(|| ROOT_PATH.to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn log_redirect(requested: &str, resolved: &Resolved) {
    if resolved.redirected {
        log_info!("[Router] {} -> {}", requested, resolved.path);
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前已放行的路由（只读信号）
    current: ReadSignal<Resolved>,
    set_current: WriteSignal<Resolved>,
    /// 会话（注入的信号，实现解耦）
    session: Signal<Option<Session>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由在首次渲染前即经过守卫，受保护页面不会闪现。
    fn new(session: Signal<Option<Session>>) -> Self {
        let requested = current_location();
        let initial = session.with_untracked(|s| resolve(&requested, s.as_ref()));
        if initial.redirected {
            log_redirect(&requested, &initial);
            replace_history_state(&initial.path);
        }
        let (current, set_current) = signal(initial);

        Self {
            current,
            set_current,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current(&self) -> ReadSignal<Resolved> {
        self.current
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 守卫 -> 写入 History -> 更新路由信号
    pub fn navigate(&self, path: &str) {
        let resolved = self.session.with_untracked(|s| resolve(path, s.as_ref()));
        log_redirect(path, &resolved);
        push_history_state(&resolved.path);
        self.set_current.set(resolved);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_current = self.set_current;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let requested = current_location();
            let resolved = session.with_untracked(|s| resolve(&requested, s.as_ref()));
            if resolved.redirected {
                log_redirect(&requested, &resolved);
                replace_history_state(&resolved.path);
            }
            set_current.set(resolved);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时对当前路径重新执行守卫
    ///
    /// 登录后离开登录页、注销后离开受保护页面都由此完成，
    /// 组件无需自行导航。
    fn setup_session_redirect(&self) {
        let current = self.current;
        let set_current = self.set_current;
        let session = self.session;

        Effect::new(move |_| {
            let resolved = session.with(|s| {
                current.with_untracked(|c| resolve(&c.path, s.as_ref()))
            });
            let changed = current.with_untracked(|c| *c != resolved);
            if changed {
                log_info!("[Router] Session changed, now at {}", resolved.path);
                replace_history_state(&resolved.path);
                set_current.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Option<Session>>) -> RouterService {
    let router = RouterService::new(session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Option<Session>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收守卫放行的路由，返回对应视图
    matcher: fn(super::route::RouteMatch) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let route = Memo::new(move |_| router.current().with(|r| r.route.clone()));

    move || matcher(route.get())
}

/// 站内链接
///
/// 拦截点击，经路由服务导航而非整页刷新。
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let to_clone = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to_clone);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
