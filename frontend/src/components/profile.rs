use adfluencer_shared::protocol::{CurrentUserRequest, GetCreatorRequest};
use adfluencer_shared::{CATEGORIES, ContentCreator, Identity, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{AuthError, logout, update_profile, use_auth};
use crate::components::notice::{NoticeToast, Notifier};
use crate::components::widgets::Loading;
use crate::validation::{FieldError, ProfileForm, error_for};

/// 粉丝数缩写：1.2K、3.4M
fn compact_count(count: u64) -> String {
    match count {
        n if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        n if n >= 1_000 => format!("{:.1}K", n as f64 / 1_000.0),
        n => n.to_string(),
    }
}

fn initials(username: &str) -> String {
    username
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
fn CreatorStats(creator: ContentCreator) -> impl IntoView {
    let stats = [
        ("Followers", compact_count(creator.follower_count)),
        ("Category", creator.category.unwrap_or_else(|| "-".into())),
        ("Score", format!("{:.1}", creator.score)),
        ("Posts", creator.posts.to_string()),
        ("60-day engagement", format!("{:.2}%", creator.engagement60_day)),
    ];

    view! {
        <div class="grid gap-4 sm:grid-cols-2 xl:grid-cols-3">
            {stats
                .into_iter()
                .map(|(label, value)| {
                    view! {
                        <div class="stat bg-base-200 rounded-box">
                            <div class="stat-title">{label}</div>
                            <div class="stat-value text-2xl">{value}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// 资料编辑对话框
#[component]
fn EditProfileDialog(
    form: RwSignal<Option<ProfileForm>>,
    on_saved: Callback<ProfileForm>,
    notifier: Notifier,
) -> impl IntoView {
    let auth = use_auth();
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (is_saving, set_is_saving) = signal(false);

    let is_creator = move || form.with(|f| f.as_ref().is_some_and(|f| f.role == Role::ContentCreator));
    let field_error = move |field: &'static str| move || errors.with(|e| error_for(e, field));
    let text = move |get: fn(&ProfileForm) -> &String| move || {
        form.with(|f| f.as_ref().map(|f| get(f).clone()).unwrap_or_default())
    };
    let edit = move |apply: fn(&mut ProfileForm, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            form.update(|f| {
                if let Some(f) = f {
                    apply(f, value);
                }
            })
        }
    };

    let close = move || {
        set_errors.set(Vec::new());
        form.set(None);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(submitted) = form.get_untracked() else {
            return;
        };
        set_is_saving.set(true);
        set_errors.set(Vec::new());
        spawn_local(async move {
            match update_profile(auth, submitted.clone()).await {
                Ok(()) => {
                    on_saved.run(submitted);
                    close();
                    notifier.success("Profile updated.");
                }
                Err(AuthError::Invalid(field_errors)) => set_errors.set(field_errors),
                Err(AuthError::Api(e)) => {
                    notifier.error(format!("Profile could not be saved: {}", e.user_message()))
                }
            }
            set_is_saving.set(false);
        });
    };

    view! {
        <Show when=move || form.with(Option::is_some)>
            <div class="modal modal-open">
                <form class="modal-box" on:submit=on_submit novalidate>
                    <h3 class="font-bold text-lg mb-4">"Edit profile"</h3>

                    <label class="label font-medium">"Username"</label>
                    <input
                        type="text"
                        class="input input-bordered w-full"
                        prop:value=text(|f| &f.username)
                        on:input=edit(|f, v| f.username = v)
                    />
                    <span class="text-error text-sm">{field_error("username")}</span>

                    <label class="label font-medium">"Email"</label>
                    <input
                        type="email"
                        class="input input-bordered w-full"
                        prop:value=text(|f| &f.email)
                        on:input=edit(|f, v| f.email = v)
                    />
                    <span class="text-error text-sm">{field_error("email")}</span>

                    <Show when=is_creator>
                        <label class="label font-medium">"Category"</label>
                        <select class="select select-bordered w-full" on:change=edit(|f, v| f.category = v)>
                            <option value="" disabled=true selected=move || text(|f| &f.category)().is_empty()>
                                "Choose a category"
                            </option>
                            {CATEGORIES
                                .iter()
                                .map(|&c| {
                                    view! {
                                        <option value=c selected=move || text(|f| &f.category)() == c>
                                            {c}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <span class="text-error text-sm">{field_error("category")}</span>

                        <label class="label font-medium">"Follower count"</label>
                        <input
                            type="number"
                            min="0"
                            class="input input-bordered w-full"
                            prop:value=text(|f| &f.follower_count)
                            on:input=edit(|f, v| f.follower_count = v)
                        />
                        <span class="text-error text-sm">{field_error("follower_count")}</span>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || is_saving.get()>
                            {move || if is_saving.get() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        </Show>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();
    let editing = RwSignal::new(Option::<ProfileForm>::None);

    // 先用会话中的身份渲染，接口返回后再替换
    let cached = auth.identity();
    let (user, set_user) = signal(cached.clone());
    let (creator, set_creator) = signal(Option::<ContentCreator>::None);
    let (loading, set_loading) = signal(true);
    let (confirm_logout, set_confirm_logout) = signal(false);

    let api = auth.api();
    spawn_local(async move {
        let current = match api.send(&CurrentUserRequest).await {
            Ok(record) => {
                let me = Identity::from(record);
                set_user.set(Some(me.clone()));
                Some(me)
            }
            Err(e) => {
                log_warn!("[Profile] Falling back to cached identity: {}", e);
                cached
            }
        };

        if let Some(me) = current.filter(|u| u.role == Role::ContentCreator) {
            match api.send(&GetCreatorRequest { id: me.id }).await {
                Ok(found) => set_creator.set(Some(found)),
                Err(e) => log_warn!("[Profile] Creator stats unavailable: {}", e),
            }
        }
        set_loading.set(false);
    });

    let open_editor = move || {
        let Some(me) = user.get_untracked() else {
            return;
        };
        let (category, follower_count) = creator.with_untracked(|c| match c {
            Some(c) => (c.category.clone().unwrap_or_default(), c.follower_count.to_string()),
            None => (String::new(), String::new()),
        });
        editing.set(Some(ProfileForm {
            role: me.role,
            username: me.username,
            email: me.email,
            category,
            follower_count,
        }));
    };

    let on_saved = Callback::new(move |saved: ProfileForm| {
        set_user.set(auth.identity());
        set_creator.update(|c| {
            if let Some(c) = c {
                c.username = saved.username.trim().to_string();
                c.category = Some(saved.category.trim().to_string()).filter(|v| !v.is_empty());
                if let Ok(count) = saved.follower_count.trim().parse() {
                    c.follower_count = count;
                }
            }
        });
    });

    let card = move || {
        user.get().map(|me| {
            let avatar = match me.photo_url.clone() {
                Some(src) => view! {
                    <div class="avatar">
                        <div class="w-32 rounded-full ring ring-primary ring-offset-2"><img src=src /></div>
                    </div>
                }
                .into_any(),
                None => view! {
                    <div class="avatar avatar-placeholder">
                        <div class="bg-primary text-primary-content w-32 rounded-full">
                            <span class="text-4xl">{initials(&me.username)}</span>
                        </div>
                    </div>
                }
                .into_any(),
            };

            view! {
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body md:flex-row gap-8">
                        <div class="flex flex-col items-center text-center gap-2 md:w-1/3">
                            {avatar}
                            <h1 class="text-2xl font-bold mt-2">{me.username.clone()}</h1>
                            <p class="text-base-content/60 break-all">{me.email.clone()}</p>
                            <span class="badge badge-outline">{me.role.label()}</span>
                            <button
                                class="btn btn-outline btn-sm mt-4 w-full"
                                on:click=move |_| open_editor()
                            >
                                "Edit profile"
                            </button>
                            <button
                                class="btn btn-outline btn-error btn-sm w-full"
                                on:click=move |_| set_confirm_logout.set(true)
                            >
                                "Log out"
                            </button>
                        </div>
                        <div class="flex-1">
                            {move || match creator.get() {
                                Some(c) => view! { <CreatorStats creator=c /> }.into_any(),
                                None => view! {
                                    <p class="text-base-content/70">
                                        "Manage your campaigns and conversations from the menu above."
                                    </p>
                                }
                                .into_any(),
                            }}
                        </div>
                    </div>
                </div>
            }
        })
    };

    view! {
        <NoticeToast notifier=notifier />
        <EditProfileDialog form=editing on_saved=on_saved notifier=notifier />
        <div class="max-w-5xl mx-auto p-4 md:p-8">
            <Show when=move || !loading.get() || user.with(Option::is_some) fallback=|| view! { <Loading /> }>
                {card}
            </Show>

            <Show when=move || confirm_logout.get()>
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="font-bold text-lg">"Log out?"</h3>
                        <p class="py-4">"You will need to log in again to use your account."</p>
                        <div class="modal-action">
                            <button class="btn btn-ghost" on:click=move |_| set_confirm_logout.set(false)>
                                "Cancel"
                            </button>
                            // 会话清空后路由服务会把受保护页面重定向到登录页
                            <button class="btn btn-error" on:click=move |_| logout(auth)>
                                "Log out"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_counts_are_abbreviated() {
        assert_eq!(compact_count(950), "950");
        assert_eq!(compact_count(1_240), "1.2K");
        assert_eq!(compact_count(3_400_000), "3.4M");
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(initials("ayse yilmaz"), "AY");
        assert_eq!(initials("brand"), "B");
        assert_eq!(initials(""), "");
    }
}
