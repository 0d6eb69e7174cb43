//! 认证模块
//!
//! 将 [`SessionStore`] 桥接为 Leptos 信号，与路由系统解耦：
//! 路由服务只拿到注入的会话信号，从不直接访问存储。

use adfluencer_shared::{Identity, UserRecord};
use leptos::prelude::*;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::config::ClientConfig;
use crate::session::{Session, SessionStore};
use crate::validation::{FieldError, LoginForm, ProfileForm, SignupForm};
use crate::web::BrowserStorage;

/// 认证上下文
///
/// 会话存储是唯一的可变共享状态；`session` 信号由存储的订阅回调驱动，
/// 只读地暴露给组件。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 当前会话（只读）
    pub session: ReadSignal<Option<Session>>,
    set_session: WriteSignal<Option<Session>>,
    store: StoredValue<SessionStore<BrowserStorage>, LocalStorage>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (session, set_session) = signal(None);
        let store = StoredValue::new_local(SessionStore::new(BrowserStorage));
        Self {
            session,
            set_session,
            store,
        }
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Option<Session>> {
        self.session.into()
    }

    /// 当前登录用户
    pub fn identity(&self) -> Option<Identity> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| s.identity().clone()))
    }

    pub fn token(&self) -> Option<String> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| s.token().to_string()))
    }

    /// 携带当前 token 的 API 客户端
    pub fn api(&self) -> ApiClient {
        ApiClient::from_config(&ClientConfig::from_env(), self.token())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 先订阅再恢复，恢复结果会同步写入会话信号。
pub fn init_auth(ctx: &AuthContext) {
    let set_session = ctx.set_session;
    let store = ctx.store;

    store.with_value(|store| {
        store.subscribe(move |session| set_session.set(session.cloned()));
        store.restore();
    });

    on_cleanup(move || {
        store.try_with_value(|store| store.teardown());
    });
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("表单校验失败")]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AuthError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AuthError::Invalid(errors) => errors,
            AuthError::Api(_) => &[],
        }
    }
}

/// 登录
///
/// 仅当服务端确认成功时才写入会话；之后的跳转由路由服务监听会话变化完成。
pub async fn login(ctx: AuthContext, form: LoginForm) -> Result<(), AuthError> {
    let request = form.validate().map_err(AuthError::Invalid)?;
    let envelope = ctx.api().send(&request).await?;

    match envelope.data {
        Some(payload) if envelope.success && !payload.token.is_empty() => {
            ctx.store
                .with_value(|store| store.login(payload.token, payload.user));
            Ok(())
        }
        _ => {
            let message = envelope
                .message
                .unwrap_or_else(|| "Invalid email or password.".to_string());
            log_warn!("[Auth] Login rejected: {}", message);
            Err(ApiError::Rejected(message).into())
        }
    }
}

/// 注册（不会自动登录）
pub async fn register(ctx: AuthContext, form: SignupForm) -> Result<(), AuthError> {
    let registration = form.validate().map_err(AuthError::Invalid)?;
    ctx.api().register(&registration).await?;
    log_info!("[Auth] Registered {} as {:?}", registration.username, registration.role);
    Ok(())
}

/// 更新当前用户的资料，成功后刷新会话中的身份
pub async fn update_profile(ctx: AuthContext, form: ProfileForm) -> Result<(), AuthError> {
    let Some(identity) = ctx.identity() else {
        return Err(ApiError::Rejected("You are not logged in.".into()).into());
    };
    let update = form.validate().map_err(AuthError::Invalid)?;
    let returned = ctx.api().update_profile(identity.id, &update).await?;

    // 服务端未返回可用记录时，用提交的字段合并本地身份
    let record = returned.unwrap_or_else(|| UserRecord {
        username: update.username.clone(),
        email: update.email.clone(),
        ..UserRecord::from(&identity)
    });
    ctx.store.with_value(|store| store.update_user(record));
    log_info!("[Auth] Profile of user {} updated", identity.id);
    Ok(())
}

/// 注销并清除状态
///
/// 不需要手动导航，路由服务会监听会话变化并自动重定向。
pub fn logout(ctx: AuthContext) {
    ctx.store.with_value(|store| store.logout());
}
