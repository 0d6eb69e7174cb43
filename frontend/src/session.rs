//! 会话存储模块
//!
//! "谁已登录" 的唯一数据源。会话以 `Option<Session>` 持有，
//! token 与用户总是同时存在或同时缺失。
//!
//! 存储后端通过 [`SessionStorage`] 注入：浏览器中为 localStorage，
//! 测试中为 [`MemoryStorage`]。变更通过订阅回调同步通知观察者
//! （路由守卫与界面外壳由此在下一次渲染时看到最新状态）。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use adfluencer_shared::{Identity, Role, STORAGE_TOKEN_KEY, STORAGE_USER_KEY, UserRecord};

/// 键值存储抽象
pub trait SessionStorage {
    fn read(&self, key: &str) -> Option<String>;
    /// 返回写入是否成功
    fn write(&self, key: &str, value: &str) -> bool;
    /// 返回删除是否成功
    fn remove(&self, key: &str) -> bool;
}

/// 当前已认证的身份及其凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    identity: Identity,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    /// `Authorization` 头的值
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub type SubscriptionId = u64;

type Subscriber = Rc<dyn Fn(Option<&Session>)>;

/// 会话存储
pub struct SessionStore<S> {
    storage: S,
    current: RefCell<Option<Session>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_id: Cell<SubscriptionId>,
}

impl<S: SessionStorage> SessionStore<S> {
    /// 创建空会话的存储。调用 [`restore`](Self::restore) 以加载持久化的会话。
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            current: RefCell::new(None),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// 从持久化存储恢复会话
    ///
    /// 持久化副本按原样信任（此处不检查过期）。任一键缺失或用户记录
    /// 无法解析时视为无会话，并清除两个键。
    pub fn restore(&self) -> Option<Session> {
        let token = self.storage.read(STORAGE_TOKEN_KEY).filter(|t| !t.is_empty());
        let user = self.storage.read(STORAGE_USER_KEY);

        let restored = match (token, user) {
            (Some(token), Some(raw)) => match serde_json::from_str::<UserRecord>(&raw) {
                Ok(record) => Some(Session {
                    token,
                    identity: record.into(),
                }),
                Err(e) => {
                    log_warn!("[Session] Discarding corrupt user record: {}", e);
                    self.clear_persisted();
                    None
                }
            },
            (None, None) => None,
            _ => {
                log_warn!("[Session] Discarding incomplete persisted session.");
                self.clear_persisted();
                None
            }
        };

        if let Some(session) = &restored {
            log_info!(
                "[Session] Restored session for user {} ({:?}).",
                session.identity.id,
                session.role()
            );
        }
        self.replace(restored.clone());
        restored
    }

    /// 登录：同时写入内存与持久化存储
    ///
    /// 仅应在登录请求已确认成功后调用。空 token 会被忽略。
    pub fn login(&self, token: impl Into<String>, record: UserRecord) {
        let token = token.into();
        if token.is_empty() {
            log_warn!("[Session] Ignoring login with an empty token.");
            return;
        }

        // 先写用户再写 token，保证持久化副本中不会出现只有 token 的情况
        let persisted = match serde_json::to_string(&record) {
            Ok(raw) => {
                self.storage.write(STORAGE_USER_KEY, &raw)
                    && self.storage.write(STORAGE_TOKEN_KEY, &token)
            }
            Err(e) => {
                log_error!("[Session] Failed to serialize user record: {}", e);
                false
            }
        };
        if !persisted {
            log_warn!("[Session] Session could not be persisted; it will not survive a reload.");
            self.clear_persisted();
        }

        let session = Session {
            token,
            identity: record.into(),
        };
        log_info!(
            "[Session] Logged in as user {} ({:?}).",
            session.identity.id,
            session.role()
        );
        self.replace(Some(session));
    }

    /// 资料更新后替换当前身份，token 不变
    ///
    /// 未登录或记录属于其他用户时忽略，返回是否生效。持久化副本只在
    /// token 也已持久化时更新，避免留下只有用户记录的半份会话。
    pub fn update_user(&self, record: UserRecord) -> bool {
        let token = self
            .current
            .borrow()
            .as_ref()
            .filter(|s| s.identity.id == record.id)
            .map(|s| s.token.clone());
        let Some(token) = token else {
            log_warn!("[Session] Ignoring profile update for user {}.", record.id);
            return false;
        };

        if self.storage.read(STORAGE_TOKEN_KEY).is_some() {
            match serde_json::to_string(&record) {
                Ok(raw) => {
                    if !self.storage.write(STORAGE_USER_KEY, &raw) {
                        log_warn!("[Session] Updated profile could not be persisted.");
                    }
                }
                Err(e) => log_error!("[Session] Failed to serialize user record: {}", e),
            }
        }

        self.replace(Some(Session {
            token,
            identity: record.into(),
        }));
        true
    }

    /// 注销：清除内存与持久化存储
    pub fn logout(&self) {
        self.clear_persisted();
        log_info!("[Session] Logged out.");
        self.replace(None);
    }

    /// 订阅会话变更，回调在每次变更（含恢复）后同步调用
    pub fn subscribe(&self, callback: impl Fn(Option<&Session>) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
    }

    /// 应用关闭时释放所有订阅
    pub fn teardown(&self) {
        self.subscribers.borrow_mut().clear();
    }

    fn clear_persisted(&self) {
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_USER_KEY);
    }

    fn replace(&self, next: Option<Session>) {
        *self.current.borrow_mut() = next;
        self.notify();
    }

    fn notify(&self) {
        // 先拷贝快照，允许回调中再次订阅或读取存储
        let snapshot = self.current();
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, s)| Rc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(snapshot.as_ref());
        }
    }
}

/// 内存键值存储
///
/// 克隆体共享同一份数据。
#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> bool {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.items.borrow_mut().remove(key);
        true
    }
}

#[cfg(test)]
mod tests;
