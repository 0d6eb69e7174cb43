//! 路由守卫 - 纯函数
//!
//! 对每次导航给出三种结果之一：渲染目标页、重定向到登录页、
//! 重定向到当前角色的首页。决策只依赖 (路径, 会话, 路由表)，
//! 不访问网络，也没有异步步骤。

use super::route::{
    Access, LOGIN_PATH, ROOT_PATH, ROUTES, RouteEntry, RouteMatch, match_route, role_home,
};
use crate::session::Session;

/// 重定向链的最大长度；标准路由表中最长为 2（未知路径 -> / -> 角色首页）
const MAX_REDIRECTS: usize = 4;

/// 守卫决策
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteMatch),
    Redirect(&'static str),
}

/// 使用标准路由表做决策
pub fn guard(path: &str, session: Option<&Session>) -> Navigation {
    guard_with(ROUTES, path, session)
}

/// **核心守卫逻辑**
///
/// 按顺序判定：
/// 1. 仅访客页面（`/`、`/login`、`/signup` 等）且已登录 -> 角色首页
/// 2. 需要认证但未登录 -> 登录页
/// 3. 限定角色且角色不符 -> 角色首页（静默降级，而非报错页）
/// 4. 否则渲染
///
/// 路由表中不存在的路径一律重定向到根路径。
pub fn guard_with(table: &[RouteEntry], path: &str, session: Option<&Session>) -> Navigation {
    let Some(route) = match_route(table, path) else {
        return Navigation::Redirect(ROOT_PATH);
    };

    match (route.access, session) {
        (Access::GuestOnly, Some(session)) => Navigation::Redirect(role_home(session.role())),
        (Access::Authenticated | Access::Roles(_), None) => Navigation::Redirect(LOGIN_PATH),
        (Access::Roles(allowed), Some(session)) if !allowed.contains(&session.role()) => {
            Navigation::Redirect(role_home(session.role()))
        }
        _ => Navigation::Render(route),
    }
}

/// 跟随重定向后的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// 地址栏应显示的路径（未重定向时保留原始查询串）
    pub path: String,
    pub route: RouteMatch,
    pub redirected: bool,
}

pub fn resolve(path: &str, session: Option<&Session>) -> Resolved {
    resolve_with(ROUTES, path, session)
}

/// 跟随重定向直到得到可渲染的页面
pub fn resolve_with(table: &[RouteEntry], path: &str, session: Option<&Session>) -> Resolved {
    let mut target = path.to_string();
    let mut redirected = false;

    for _ in 0..=MAX_REDIRECTS {
        match guard_with(table, &target, session) {
            Navigation::Render(route) => {
                return Resolved {
                    path: target,
                    route,
                    redirected,
                };
            }
            Navigation::Redirect(next) => {
                target = next.to_string();
                redirected = true;
            }
        }
    }

    log_error!("[Router] Redirect loop starting at {}; rendering not-found.", path);
    Resolved {
        path: path.to_string(),
        route: RouteMatch::not_found(),
        redirected,
    }
}

#[cfg(test)]
mod tests;
