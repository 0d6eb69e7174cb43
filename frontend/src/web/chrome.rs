//! 页面外壳选择
//!
//! 纯展示分支：根据路径与会话决定页眉和页脚，不改变守卫的决策。

use adfluencer_shared::Role;

use super::route::{LOGIN_PATH, SIGNUP_PATH, normalize};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Public,
    Advertiser,
    ContentCreator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chrome {
    /// `None` 表示不渲染页眉
    pub header: Option<HeaderKind>,
    /// 营销页脚仅对未登录访客显示
    pub footer: bool,
}

/// 是否为登录/注册表单页
pub fn is_auth_path(path: &str) -> bool {
    matches!(normalize(path), LOGIN_PATH | SIGNUP_PATH)
}

pub fn compose(path: &str, session: Option<&Session>) -> Chrome {
    let auth_page = is_auth_path(path);

    let header = match session {
        _ if auth_page => None,
        None => Some(HeaderKind::Public),
        Some(s) => Some(match s.role() {
            Role::Advertiser => HeaderKind::Advertiser,
            Role::ContentCreator => HeaderKind::ContentCreator,
        }),
    };

    Chrome {
        header,
        footer: session.is_none() && !auth_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, SessionStore};
    use adfluencer_shared::UserRecord;

    fn session(role: i64) -> Session {
        let store = SessionStore::new(MemoryStorage::new());
        store.login(
            "tok",
            UserRecord {
                id: 1,
                username: "u".into(),
                email: "u@example.com".into(),
                role,
                photo: None,
                photo_url: None,
            },
        );
        store.current().unwrap()
    }

    #[test]
    fn auth_pages_have_no_header_and_no_footer() {
        for path in ["/login", "/signup", "/login/", "/signup?ref=x"] {
            assert_eq!(
                compose(path, None),
                Chrome {
                    header: None,
                    footer: false
                },
                "{path}"
            );
        }
        assert_eq!(compose("/login", Some(&session(0))).header, None);
    }

    #[test]
    fn visitors_get_public_header_and_footer() {
        assert_eq!(
            compose("/", None),
            Chrome {
                header: Some(HeaderKind::Public),
                footer: true
            }
        );
    }

    #[test]
    fn logged_in_users_get_role_header_and_never_the_footer() {
        let advertiser = compose("/influencers", Some(&session(0)));
        assert_eq!(advertiser.header, Some(HeaderKind::Advertiser));
        assert!(!advertiser.footer);

        let creator = compose("/jobs", Some(&session(1)));
        assert_eq!(creator.header, Some(HeaderKind::ContentCreator));
        assert!(!creator.footer);

        assert_eq!(compose("/jobs", Some(&session(3))).header, Some(HeaderKind::ContentCreator));
    }
}
