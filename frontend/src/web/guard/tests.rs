use super::*;
use crate::session::{MemoryStorage, SessionStore};
use crate::web::route::{ADVERTISER_HOME, CREATOR_HOME, Page, SIGNUP_PATH};
use adfluencer_shared::{Role, UserRecord};

// =========================================================
// Helpers
// =========================================================

fn session_with_role(code: i64) -> Session {
    let store = SessionStore::new(MemoryStorage::new());
    store.login(
        "tok",
        UserRecord {
            id: 1,
            username: "demo".into(),
            email: "demo@example.com".into(),
            role: code,
            photo: None,
            photo_url: None,
        },
    );
    store.current().expect("logged in")
}

fn creator() -> Session {
    session_with_role(1)
}

fn advertiser() -> Session {
    session_with_role(0)
}

fn renders(nav: &Navigation, page: Page) -> bool {
    matches!(nav, Navigation::Render(route) if route.page == page)
}

const CREATOR_PATHS: &[&str] = &[
    "/jobs",
    "/applied-campaigns",
    "/campaign/3",
    "/get-my-invitations",
    "/chat/contentcreator",
];

const ADVERTISER_PATHS: &[&str] = &[
    "/influencers",
    "/influencers/8",
    "/create-campaign",
    "/my-campaigns",
    "/manage-campaign",
    "/applications",
    "/chat/adversiter",
    "/payment/success",
    "/payment/reject",
];

const GUEST_PATHS: &[&str] = &["/", "/about", "/pricing", "/login", "/signup"];

// =========================================================
// Authenticated users
// =========================================================

#[test]
fn root_redirects_authenticated_users_to_role_home() {
    assert_eq!(guard("/", Some(&creator())), Navigation::Redirect(CREATOR_HOME));
    assert_eq!(guard("/", Some(&advertiser())), Navigation::Redirect(ADVERTISER_HOME));
}

#[test]
fn guest_pages_redirect_authenticated_users_home() {
    for path in GUEST_PATHS {
        assert_eq!(guard(path, Some(&creator())), Navigation::Redirect("/jobs"), "{path}");
        assert_eq!(
            guard(path, Some(&advertiser())),
            Navigation::Redirect("/influencers"),
            "{path}"
        );
    }
}

#[test]
fn role_mismatch_redirects_to_own_home_not_login() {
    for path in ADVERTISER_PATHS {
        assert_eq!(guard(path, Some(&creator())), Navigation::Redirect(CREATOR_HOME), "{path}");
    }
    for path in CREATOR_PATHS {
        assert_eq!(
            guard(path, Some(&advertiser())),
            Navigation::Redirect(ADVERTISER_HOME),
            "{path}"
        );
    }
}

#[test]
fn matching_role_renders_requested_page() {
    assert!(renders(&guard("/jobs", Some(&creator())), Page::Jobs));
    assert!(renders(&guard("/influencers", Some(&advertiser())), Page::Influencers));

    let Navigation::Render(route) = guard("/campaign/12", Some(&creator())) else {
        panic!("campaign detail should render");
    };
    assert_eq!(route.param.as_deref(), Some("12"));
}

#[test]
fn mixed_case_paths_reach_the_same_page() {
    assert!(renders(&guard("/Jobs", Some(&creator())), Page::Jobs));
    assert!(renders(&guard("/MY-Campaigns", Some(&advertiser())), Page::MyCampaigns));
    assert_eq!(guard("/Jobs", Some(&advertiser())), Navigation::Redirect(ADVERTISER_HOME));
    assert_eq!(guard("/Jobs", None), Navigation::Redirect(LOGIN_PATH));
}

#[test]
fn profile_is_open_to_every_role() {
    assert!(renders(&guard("/profile", Some(&creator())), Page::Profile));
    assert!(renders(&guard("/profile", Some(&advertiser())), Page::Profile));
}

#[test]
fn unrecognised_role_codes_are_treated_as_creators() {
    let odd = session_with_role(-5);
    assert_eq!(odd.role(), Role::ContentCreator);
    assert!(renders(&guard("/jobs", Some(&odd)), Page::Jobs));
    assert_eq!(guard("/influencers", Some(&odd)), Navigation::Redirect(CREATOR_HOME));
}

// =========================================================
// Anonymous users
// =========================================================

#[test]
fn protected_paths_redirect_anonymous_users_to_login() {
    for path in CREATOR_PATHS.iter().chain(ADVERTISER_PATHS).chain(&["/profile"]) {
        assert_eq!(guard(path, None), Navigation::Redirect(LOGIN_PATH), "{path}");
    }
}

#[test]
fn guest_pages_render_for_anonymous_users() {
    assert!(renders(&guard("/", None), Page::Landing));
    assert!(renders(&guard(LOGIN_PATH, None), Page::Login));
    assert!(renders(&guard(SIGNUP_PATH, None), Page::Signup));
    assert!(renders(&guard("/pricing", None), Page::Pricing));
}

#[test]
fn unknown_paths_redirect_to_root() {
    assert_eq!(guard("/does-not-exist", None), Navigation::Redirect(ROOT_PATH));
    assert_eq!(guard("/does-not-exist", Some(&creator())), Navigation::Redirect(ROOT_PATH));
}

// =========================================================
// resolve
// =========================================================

#[test]
fn resolve_follows_the_redirect_chain() {
    let resolved = resolve("/does-not-exist", Some(&advertiser()));
    assert_eq!(resolved.path, ADVERTISER_HOME);
    assert_eq!(resolved.route.page, Page::Influencers);
    assert!(resolved.redirected);

    let resolved = resolve("/does-not-exist", None);
    assert_eq!(resolved.path, ROOT_PATH);
    assert_eq!(resolved.route.page, Page::Landing);
}

#[test]
fn resolve_keeps_query_string_when_rendering_directly() {
    let resolved = resolve("/payment/success?session_id=abc", Some(&advertiser()));
    assert_eq!(resolved.path, "/payment/success?session_id=abc");
    assert_eq!(resolved.route.page, Page::PaymentSuccess);
    assert!(!resolved.redirected);
}

#[test]
fn resolve_never_loops_on_a_broken_table() {
    // 角色首页不在表中：/jobs -> / -> /jobs -> ...
    let table = [RouteEntry {
        pattern: "/",
        page: Page::Landing,
        access: Access::GuestOnly,
    }];
    let resolved = resolve_with(&table, "/", Some(&creator()));
    assert_eq!(resolved.route.page, Page::NotFound);
}

// =========================================================
// Scenario: login -> role checks -> logout
// =========================================================

#[test]
fn session_changes_are_visible_to_the_next_decision() {
    let store = SessionStore::new(MemoryStorage::new());
    store.restore();
    assert_eq!(guard("/jobs", store.current().as_ref()), Navigation::Redirect(LOGIN_PATH));

    store.login(
        "tok",
        UserRecord {
            id: 2,
            username: "creator".into(),
            email: "c@example.com".into(),
            role: 1,
            photo: None,
            photo_url: None,
        },
    );
    assert!(renders(&guard("/jobs", store.current().as_ref()), Page::Jobs));
    assert_eq!(
        guard("/influencers", store.current().as_ref()),
        Navigation::Redirect(CREATOR_HOME)
    );

    store.logout();
    assert_eq!(guard("/jobs", store.current().as_ref()), Navigation::Redirect(LOGIN_PATH));
}
