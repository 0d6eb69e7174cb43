use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthError, login, use_auth};
use crate::validation::{FieldError, LoginForm, error_for};
use crate::web::route::{SIGNUP_PATH, query_param};
use crate::web::router::{Link, use_router};

/// 注册成功后跳转到登录页时携带的查询参数
pub const REGISTERED_QUERY: &str = "registered";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let just_registered = router
        .current()
        .with_untracked(|r| query_param(&r.path, REGISTERED_QUERY).is_some());

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };

        set_is_submitting.set(true);
        set_errors.set(Vec::new());
        set_error_msg.set(None);

        // 成功后无需导航：会话变化会让路由服务把登录页重定向到角色首页
        spawn_local(async move {
            if let Err(e) = login(auth, form).await {
                match e {
                    AuthError::Invalid(field_errors) => set_errors.set(field_errors),
                    AuthError::Api(e) => set_error_msg.set(Some(e.user_message())),
                }
                set_is_submitting.set(false);
            }
        });
    };

    let field_error = move |field: &'static str| move || errors.with(|e| error_for(e, field));

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Welcome back"</h1>
                    <p class="text-base-content/70">"Log in to continue to Adfluencer"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit novalidate>
                        <Show when=move || just_registered && error_msg.get().is_none()>
                            <div role="status" class="alert alert-success text-sm py-2">
                                <span>"Account created. You can log in now."</span>
                            </div>
                        </Show>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            <span class="text-error text-sm">{field_error("email")}</span>
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            <span class="text-error text-sm">{field_error("password")}</span>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "No account yet? "
                            <Link to=SIGNUP_PATH class="link link-primary">"Sign up"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
