use leptos::prelude::*;

use crate::auth::{logout, use_auth};
use crate::web::route::{ADVERTISER_HOME, CREATOR_HOME, LOGIN_PATH, ROOT_PATH, SIGNUP_PATH, normalize};
use crate::web::router::{Link, use_router};

const ADVERTISER_NAV: &[(&str, &str)] = &[
    (ADVERTISER_HOME, "Influencers"),
    ("/create-campaign", "Create campaign"),
    ("/my-campaigns", "My campaigns"),
    ("/applications", "Applications"),
    ("/chat/adversiter", "Messages"),
];

const CREATOR_NAV: &[(&str, &str)] = &[
    (CREATOR_HOME, "Jobs"),
    ("/applied-campaigns", "Applied campaigns"),
    ("/get-my-invitations", "Invitations"),
    ("/chat/contentcreator", "Messages"),
];

#[component]
fn Brand(#[prop(into)] home: String) -> impl IntoView {
    view! {
        <Link to=home class="btn btn-ghost text-xl font-bold text-primary">
            "Adfluencer"
        </Link>
    }
}

#[component]
pub fn PublicHeader() -> impl IntoView {
    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <Brand home=ROOT_PATH />
            </div>
            <div class="flex-none gap-2">
                <Link to="/about" class="btn btn-ghost btn-sm">"About"</Link>
                <Link to="/pricing" class="btn btn-ghost btn-sm">"Pricing"</Link>
                <Link to=LOGIN_PATH class="btn btn-outline btn-primary btn-sm">"Log in"</Link>
                <Link to=SIGNUP_PATH class="btn btn-primary btn-sm">"Sign up"</Link>
            </div>
        </div>
    }
}

/// 登录后的页眉：角色导航 + 用户菜单
#[component]
fn RoleHeader(home: &'static str, nav: &'static [(&'static str, &'static str)]) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let current_path = Memo::new(move |_| {
        router
            .current()
            .with(|r| normalize(&r.path).to_string())
    });
    let username = move || {
        auth.session
            .with(|s| s.as_ref().map(|s| s.identity().username.clone()))
            .unwrap_or_default()
    };

    let on_logout = move |_| logout(auth);

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1 gap-2">
                <Brand home=home />
                <ul class="menu menu-horizontal px-1 hidden md:flex">
                    {nav
                        .iter()
                        .map(|&(to, label)| {
                            let class = move || {
                                if current_path.with(|p| p == to) { "active" } else { "" }
                            };
                            view! {
                                <li>
                                    <a
                                        href=to
                                        class=class
                                        on:click=move |ev: leptos::ev::MouseEvent| {
                                            ev.prevent_default();
                                            router.navigate(to);
                                        }
                                    >
                                        {label}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </div>
            <div class="flex-none gap-2">
                <Link to="/profile" class="btn btn-ghost btn-sm">{username}</Link>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                    "Log out"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn AdvertiserHeader() -> impl IntoView {
    view! { <RoleHeader home=ADVERTISER_HOME nav=ADVERTISER_NAV /> }
}

#[component]
pub fn CreatorHeader() -> impl IntoView {
    view! { <RoleHeader home=CREATOR_HOME nav=CREATOR_NAV /> }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer sm:footer-horizontal bg-neutral text-neutral-content p-10">
            <aside>
                <p class="font-bold text-lg">"Adfluencer"</p>
                <p>"Connecting brands with the creators their audience already trusts."</p>
            </aside>
            <nav>
                <h6 class="footer-title">"Product"</h6>
                <Link to="/pricing" class="link link-hover">"Pricing"</Link>
                <Link to=SIGNUP_PATH class="link link-hover">"Get started"</Link>
            </nav>
            <nav>
                <h6 class="footer-title">"Company"</h6>
                <Link to="/about" class="link link-hover">"About us"</Link>
            </nav>
        </footer>
    }
}
