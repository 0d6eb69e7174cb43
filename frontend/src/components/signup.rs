use adfluencer_shared::{CATEGORIES, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthError, register, use_auth};
use crate::components::login::REGISTERED_QUERY;
use crate::components::notice::{NoticeToast, Notifier};
use crate::validation::{FieldError, SignupForm, error_for};
use crate::web::route::LOGIN_PATH;
use crate::web::router::{Link, use_navigate};

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let notifier = Notifier::new();

    let form = RwSignal::new(SignupForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(Vec::<FieldError>::new());

    let is_creator = move || form.with(|f| f.role == Some(Role::ContentCreator));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut submitted = form.get_untracked();
        if submitted.role != Some(Role::ContentCreator) {
            // 创作者专属字段不随广告主注册提交
            submitted.follower_count.clear();
            submitted.category.clear();
        }

        set_is_submitting.set(true);
        set_errors.set(Vec::new());

        let navigate = navigate.clone();
        spawn_local(async move {
            match register(auth, submitted).await {
                // 跳转会卸载本页面，之后不再写入本页信号
                Ok(()) => navigate(&format!("{LOGIN_PATH}?{REGISTERED_QUERY}=1")),
                Err(e) => {
                    match e {
                        AuthError::Invalid(field_errors) => set_errors.set(field_errors),
                        AuthError::Api(e) => notifier.error(e.user_message()),
                    }
                    set_is_submitting.set(false);
                }
            }
        });
    };

    let field_error = move |field: &'static str| move || errors.with(|e| error_for(e, field));

    let role_button = move |role: Role| {
        let class = move || {
            if form.with(|f| f.role == Some(role)) {
                "btn btn-primary flex-1"
            } else {
                "btn btn-outline flex-1"
            }
        };
        view! {
            <button
                type="button"
                class=class
                on:click=move |_| form.update(|f| f.role = Some(role))
            >
                {role.label()}
            </button>
        }
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                    <p class="text-base-content/70">"Join as a brand or as a creator"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body gap-2" on:submit=on_submit novalidate>
                        <div class="flex gap-2">
                            {role_button(Role::Advertiser)}
                            {role_button(Role::ContentCreator)}
                        </div>
                        <span class="text-error text-sm">{field_error("role")}</span>

                        <input
                            type="text"
                            placeholder="Username"
                            class="input input-bordered w-full"
                            prop:value=move || form.with(|f| f.username.clone())
                            on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("username")}</span>

                        <input
                            type="email"
                            placeholder="Email"
                            class="input input-bordered w-full"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("email")}</span>

                        <input
                            type="password"
                            placeholder="Password (max. 8 characters)"
                            class="input input-bordered w-full"
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                        <span class="text-error text-sm">{field_error("password")}</span>

                        <input
                            type="password"
                            placeholder="Confirm password"
                            class="input input-bordered w-full"
                            prop:value=move || form.with(|f| f.confirm_password.clone())
                            on:input=move |ev| {
                                form.update(|f| f.confirm_password = event_target_value(&ev))
                            }
                        />
                        <span class="text-error text-sm">{field_error("confirm_password")}</span>

                        <Show when=is_creator>
                            <input
                                type="number"
                                min="0"
                                placeholder="Follower count"
                                class="input input-bordered w-full"
                                prop:value=move || form.with(|f| f.follower_count.clone())
                                on:input=move |ev| {
                                    form.update(|f| f.follower_count = event_target_value(&ev))
                                }
                            />
                            <span class="text-error text-sm">{field_error("follower_count")}</span>

                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| form.update(|f| f.category = event_target_value(&ev))
                            >
                                <option value="" selected=move || form.with(|f| f.category.is_empty())>
                                    "Category (optional)"
                                </option>
                                {CATEGORIES
                                    .iter()
                                    .map(|&c| view! { <option value=c>{c}</option> })
                                    .collect_view()}
                            </select>
                        </Show>

                        <button class="btn btn-primary mt-4" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                            } else {
                                "Sign up".into_any()
                            }}
                        </button>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=LOGIN_PATH class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
