//! 广告主页面：创作者搜索与详情、活动的创建与管理、申请审核、支付结果

use std::collections::{BTreeSet, HashMap};

use adfluencer_shared::protocol::{
    CampaignApplicationsRequest, CampaignInvitationsRequest, CreatorFilter, GetCreatorRequest,
    InviteCreatorRequest, ListCreatorsRequest, MyCampaignsRequest, SearchCreatorsRequest,
    UpdateApplicationStatusRequest,
};
use adfluencer_shared::{
    Application, CATEGORIES, Campaign, ContentCreator, Invitation, ReviewStatus, format_amount,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiClient, ApiError};
use crate::auth::use_auth;
use crate::components::notice::{NoticeToast, Notifier};
use crate::components::widgets::{
    EmptyState, Loading, PageTitle, StatusBadge, display_name, resolve_usernames,
};
use crate::validation::{CampaignForm, FieldError, error_for};
use crate::web::route::{ADVERTISER_HOME, query_param};
use crate::web::router::{Link, use_navigate, use_router};
use crate::web::{load_json, save_json};

/// 创作者筛选条件的存储键
const FILTERS_KEY: &str = "influencer_filters";
const MY_CAMPAIGNS_PATH: &str = "/my-campaigns";

// =========================================================
// 创作者搜索
// =========================================================

/// 按用户名（不区分大小写）在结果中二次过滤
fn filter_by_username(creators: Vec<ContentCreator>, query: &str) -> Vec<ContentCreator> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return creators;
    }
    creators
        .into_iter()
        .filter(|c| c.username.to_lowercase().contains(&query))
        .collect()
}

/// 筛选表单的原始输入
#[derive(Debug, Clone, Default, PartialEq)]
struct FilterInputs {
    category: String,
    min_followers: String,
    max_followers: String,
    min_score: String,
    max_score: String,
}

fn parse_opt<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn opt_text<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl FilterInputs {
    /// 无法解析的数值按未填写处理
    fn to_filter(&self) -> CreatorFilter {
        CreatorFilter {
            category: self.category.trim().to_string(),
            min_followers: parse_opt(&self.min_followers),
            max_followers: parse_opt(&self.max_followers),
            min_score: parse_opt(&self.min_score),
            max_score: parse_opt(&self.max_score),
        }
    }

    fn from_filter(filter: &CreatorFilter) -> Self {
        Self {
            category: filter.category.clone(),
            min_followers: opt_text(filter.min_followers),
            max_followers: opt_text(filter.max_followers),
            min_score: opt_text(filter.min_score),
            max_score: opt_text(filter.max_score),
        }
    }
}

async fn fetch_creators(api: &ApiClient, filter: &CreatorFilter) -> Result<Vec<ContentCreator>, ApiError> {
    if filter.is_empty() {
        Ok(api.send(&ListCreatorsRequest).await?.data)
    } else {
        api.send(&SearchCreatorsRequest {
            filter: filter.clone(),
        })
        .await
    }
}

#[component]
fn CreatorCard(creator: ContentCreator) -> impl IntoView {
    let href = format!("{ADVERTISER_HOME}/{}", creator.id);
    let followers = format_amount(creator.follower_count as f64);
    let score = format!("{:.1}", creator.score);
    let initial = creator
        .username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <div class="card-body items-center text-center">
                {match creator.photo_url {
                    Some(src) => view! {
                        <div class="avatar">
                            <div class="w-20 rounded-full"><img src=src /></div>
                        </div>
                    }
                    .into_any(),
                    None => view! {
                        <div class="avatar avatar-placeholder">
                            <div class="bg-primary text-primary-content w-20 rounded-full">
                                <span class="text-2xl">{initial}</span>
                            </div>
                        </div>
                    }
                    .into_any(),
                }}
                <h2 class="card-title">{creator.username}</h2>
                {creator.category.map(|c| view! { <span class="badge badge-secondary">{c}</span> })}
                <div class="flex gap-6 text-sm mt-2">
                    <div><span class="font-bold">{followers}</span>" followers"</div>
                    <div><span class="font-bold">{score}</span>" score"</div>
                </div>
                <div class="card-actions mt-2">
                    <Link to=href class="btn btn-primary btn-sm">"View profile"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn InfluencersPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let saved: CreatorFilter = load_json(FILTERS_KEY).unwrap_or_default();
    let inputs = RwSignal::new(FilterInputs::from_filter(&saved));
    let (username, set_username) = signal(String::new());
    let (creators, set_creators) = signal(Vec::<ContentCreator>::new());
    let (loading, set_loading) = signal(true);

    let search = move |filter: CreatorFilter| {
        let api = auth.api();
        let query = username.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            match fetch_creators(&api, &filter).await {
                Ok(list) => set_creators.set(filter_by_username(list, &query)),
                Err(e) => {
                    set_creators.set(Vec::new());
                    notifier.error(format!("Search failed: {}", e.user_message()));
                }
            }
            set_loading.set(false);
        });
    };

    search(saved);

    let on_apply = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let filter = inputs.with_untracked(FilterInputs::to_filter);
        save_json(FILTERS_KEY, (!filter.is_empty()).then_some(&filter));
        search(filter);
    };

    let on_reset = move |_| {
        inputs.set(FilterInputs::default());
        set_username.set(String::new());
        save_json::<CreatorFilter>(FILTERS_KEY, None);
        search(CreatorFilter::default());
    };

    let text_input = move |placeholder: &'static str,
                           get: fn(&FilterInputs) -> String,
                           set: fn(&mut FilterInputs, String)| {
        view! {
            <input
                type="number"
                min="0"
                placeholder=placeholder
                class="input input-bordered input-sm w-full"
                prop:value=move || inputs.with(get)
                on:input=move |ev| inputs.update(|f| set(f, event_target_value(&ev)))
            />
        }
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-7xl mx-auto p-4 md:p-8">
            <PageTitle title="Influencers" subtitle="Find creators for your next campaign" />
            <div class="grid gap-6 lg:grid-cols-4">
                <form class="card bg-base-100 shadow-md h-fit" on:submit=on_apply>
                    <div class="card-body gap-3">
                        <h2 class="card-title text-lg">"Filters"</h2>
                        <input
                            type="text"
                            placeholder="Username"
                            class="input input-bordered input-sm w-full"
                            prop:value=username
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                        />
                        <select
                            class="select select-bordered select-sm w-full"
                            on:change=move |ev| inputs.update(|f| f.category = event_target_value(&ev))
                        >
                            <option value="" selected=move || inputs.with(|f| f.category.is_empty())>
                                "All categories"
                            </option>
                            {CATEGORIES
                                .iter()
                                .map(|&c| {
                                    view! {
                                        <option value=c selected=move || inputs.with(|f| f.category == c)>
                                            {c}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <label class="text-sm font-medium">"Followers"</label>
                        <div class="flex gap-2">
                            {text_input("Min", |f| f.min_followers.clone(), |f, v| f.min_followers = v)}
                            {text_input("Max", |f| f.max_followers.clone(), |f, v| f.max_followers = v)}
                        </div>
                        <label class="text-sm font-medium">"Score"</label>
                        <div class="flex gap-2">
                            {text_input("Min", |f| f.min_score.clone(), |f, v| f.min_score = v)}
                            {text_input("Max", |f| f.max_score.clone(), |f, v| f.max_score = v)}
                        </div>
                        <button type="submit" class="btn btn-primary btn-sm mt-2">"Search"</button>
                        <button type="button" class="btn btn-ghost btn-sm" on:click=on_reset>
                            "Reset filters"
                        </button>
                    </div>
                </form>

                <div class="lg:col-span-3">
                    <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                        <Show
                            when=move || creators.with(|c| !c.is_empty())
                            fallback=|| view! { <EmptyState message="No creators match these filters." /> }
                        >
                            <div class="grid gap-6 md:grid-cols-2 xl:grid-cols-3">
                                <For
                                    each=move || creators.get()
                                    key=|c| c.id
                                    children=move |creator| view! { <CreatorCard creator=creator /> }
                                />
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 创作者详情与邀请
// =========================================================

#[component]
pub fn InfluencerDetailPage(id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let creator_id = id.and_then(|id| id.parse::<i64>().ok());
    let (creator, set_creator) = signal(Option::<ContentCreator>::None);
    let (campaigns, set_campaigns) = signal(Vec::<Campaign>::new());
    let (selected, set_selected) = signal(Option::<i64>::None);
    let (loading, set_loading) = signal(true);
    let (is_inviting, set_is_inviting) = signal(false);

    if let Some(creator_id) = creator_id {
        let api = auth.api();
        spawn_local(async move {
            match api.send(&GetCreatorRequest { id: creator_id }).await {
                Ok(found) => set_creator.set(Some(found)),
                Err(e) => notifier.error(format!("Could not load creator: {}", e.user_message())),
            }
            set_loading.set(false);

            if let Ok(list) = api.send(&MyCampaignsRequest).await {
                set_selected.set(list.data.first().map(|c| c.id));
                set_campaigns.set(list.data);
            }
        });
    } else {
        set_loading.set(false);
    }

    let on_invite = move |_| {
        let (Some(creator_id), Some(campaign_id)) = (creator_id, selected.get_untracked()) else {
            notifier.error("Choose one of your campaigns first.");
            return;
        };
        let api = auth.api();
        set_is_inviting.set(true);
        spawn_local(async move {
            let request = InviteCreatorRequest {
                campaign_id,
                creator_id,
            };
            match api.send(&request).await {
                Ok(()) => notifier.success("Invitation sent."),
                Err(e) => notifier.error(e.user_message()),
            }
            set_is_inviting.set(false);
        });
    };

    let detail = move || {
        creator.get().map(|c| {
            let stats = [
                ("Followers", format_amount(c.follower_count as f64)),
                ("Score", format!("{:.1}", c.score)),
                ("Avg. likes", format_amount(c.avg_likes.round())),
                ("Posts", c.posts.to_string()),
                ("60-day engagement", format!("{:.2}%", c.engagement60_day)),
            ];
            view! {
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body gap-6">
                        <div class="flex items-center gap-6">
                            {c.photo_url.clone().map(|src| {
                                view! {
                                    <div class="avatar">
                                        <div class="w-24 rounded-xl"><img src=src /></div>
                                    </div>
                                }
                            })}
                            <div>
                                <h1 class="text-3xl font-bold">{c.username.clone()}</h1>
                                <p class="text-base-content/60">{c.email.clone()}</p>
                                {c.category.clone().map(|cat| {
                                    view! { <span class="badge badge-secondary mt-2">{cat}</span> }
                                })}
                            </div>
                        </div>
                        <div class="stats stats-vertical md:stats-horizontal shadow">
                            {stats
                                .into_iter()
                                .map(|(label, value)| {
                                    view! {
                                        <div class="stat">
                                            <div class="stat-title">{label}</div>
                                            <div class="stat-value text-xl">{value}</div>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                        <div class="divider my-0">"Invite to a campaign"</div>
                        <Show
                            when=move || campaigns.with(|c| !c.is_empty())
                            fallback=|| {
                                view! {
                                    <p class="text-base-content/60">
                                        "You have no campaigns yet. "
                                        <Link to="/create-campaign" class="link link-primary">
                                            "Create one"
                                        </Link>
                                    </p>
                                }
                            }
                        >
                            <div class="flex gap-2">
                                <select
                                    class="select select-bordered flex-1"
                                    on:change=move |ev| {
                                        set_selected.set(event_target_value(&ev).parse().ok())
                                    }
                                >
                                    <For
                                        each=move || campaigns.get()
                                        key=|c| c.id
                                        children=move |c| {
                                            let id = c.id;
                                            view! {
                                                <option
                                                    value=id.to_string()
                                                    selected=move || selected.get() == Some(id)
                                                >
                                                    {c.title}
                                                </option>
                                            }
                                        }
                                    />
                                </select>
                                <button
                                    class="btn btn-primary"
                                    disabled=move || is_inviting.get()
                                    on:click=on_invite
                                >
                                    "Send invitation"
                                </button>
                            </div>
                        </Show>
                    </div>
                </div>
            }
        })
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-5xl mx-auto p-4 md:p-8">
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || creator.with(Option::is_some)
                    fallback=|| {
                        view! {
                            <EmptyState message="This creator does not exist or was removed." />
                            <div class="text-center mt-4">
                                <Link to=ADVERTISER_HOME class="btn btn-primary">"Back to influencers"</Link>
                            </div>
                        }
                    }
                >
                    {detail}
                </Show>
            </Show>
        </div>
    }
}

// =========================================================
// 活动
// =========================================================

#[component]
pub fn CreateCampaignPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let notifier = Notifier::new();

    let form = RwSignal::new(CampaignForm::default());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let request = match form.with_untracked(CampaignForm::validate) {
            Ok(request) => request,
            Err(field_errors) => {
                set_errors.set(field_errors);
                notifier.error("Please check the highlighted fields.");
                return;
            }
        };

        set_errors.set(Vec::new());
        set_is_submitting.set(true);
        let api = auth.api();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api.send(&request).await {
                Ok(created) => {
                    log_info!("[Campaign] Created campaign {}", created.id);
                    navigate(MY_CAMPAIGNS_PATH);
                }
                Err(e) => {
                    notifier.error(format!("Could not create campaign: {}", e.user_message()));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    let field_error = move |field: &'static str| move || errors.with(|e| error_for(e, field));

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-3xl mx-auto p-4 md:p-8">
            <PageTitle title="Create campaign" subtitle="Describe what you need and set a budget" />
            <form class="card bg-base-100 shadow-xl" on:submit=on_submit novalidate>
                <div class="card-body gap-3">
                    <label class="label font-medium">"Title"</label>
                    <input
                        type="text"
                        class="input input-bordered w-full"
                        prop:value=move || form.with(|f| f.title.clone())
                        on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                    />
                    <span class="text-error text-sm">{field_error("title")}</span>

                    <label class="label font-medium">"Description"</label>
                    <textarea
                        rows="5"
                        class="textarea textarea-bordered w-full"
                        prop:value=move || form.with(|f| f.description.clone())
                        on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                    ></textarea>
                    <span class="text-error text-sm">{field_error("description")}</span>

                    <div class="grid gap-4 md:grid-cols-2">
                        <div>
                            <label class="label font-medium">"Budget (TL)"</label>
                            <input
                                type="number"
                                min="0"
                                step="0.01"
                                class="input input-bordered w-full"
                                prop:value=move || form.with(|f| f.budget.clone())
                                on:input=move |ev| form.update(|f| f.budget = event_target_value(&ev))
                            />
                            <span class="text-error text-sm">{field_error("budget")}</span>
                        </div>
                        <div>
                            <label class="label font-medium">"Maximum creators"</label>
                            <input
                                type="number"
                                min="1"
                                class="input input-bordered w-full"
                                prop:value=move || form.with(|f| f.max_capacity.clone())
                                on:input=move |ev| {
                                    form.update(|f| f.max_capacity = event_target_value(&ev))
                                }
                            />
                            <span class="text-error text-sm">{field_error("max_capacity")}</span>
                        </div>
                    </div>

                    <div class="card-actions justify-end mt-4">
                        <Link to=MY_CAMPAIGNS_PATH class="btn btn-ghost">"Cancel"</Link>
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() { "Creating..." } else { "Create campaign" }}
                        </button>
                    </div>
                </div>
            </form>
        </div>
    }
}

fn manage_path(campaign_id: i64) -> String {
    format!("/manage-campaign?id={campaign_id}")
}

#[component]
pub fn MyCampaignsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let (campaigns, set_campaigns) = signal(Vec::<Campaign>::new());
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&MyCampaignsRequest).await {
            Ok(list) => set_campaigns.set(list.data),
            Err(e) => notifier.error(format!("Could not load campaigns: {}", e.user_message())),
        }
        set_loading.set(false);
    });

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-7xl mx-auto p-4 md:p-8">
            <div class="flex justify-between items-start">
                <PageTitle title="My campaigns" subtitle="Open a campaign to review applications" />
                <Link to="/create-campaign" class="btn btn-primary">"New campaign"</Link>
            </div>
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || campaigns.with(|c| !c.is_empty())
                    fallback=|| view! { <EmptyState message="You have not created a campaign yet." /> }
                >
                    <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || campaigns.get()
                            key=|c| c.id
                            children=move |c| {
                                let budget = c.budget.map(format_amount).unwrap_or_else(|| "0".into());
                                let status = c.status_label();
                                view! {
                                    <div class="card bg-base-100 shadow-md">
                                        <div class="card-body">
                                            <div class="flex justify-between items-start gap-2">
                                                <h2 class="card-title line-clamp-1">{c.title}</h2>
                                                <span class="badge badge-outline">{status}</span>
                                            </div>
                                            <p class="line-clamp-2 text-base-content/70">{c.description}</p>
                                            <div class="flex justify-between text-sm mt-2">
                                                <span class="font-semibold">{budget} " TL"</span>
                                                <span>"Max. " {c.max_capacity} " creators"</span>
                                            </div>
                                            <div class="card-actions justify-end">
                                                <Link to=manage_path(c.id) class="btn btn-primary btn-sm">
                                                    "Manage"
                                                </Link>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

// =========================================================
// 申请审核
// =========================================================

#[derive(Debug, Clone, PartialEq)]
struct ApplicationRow {
    application: Application,
    campaign_title: String,
}

/// 更新申请状态并同步到本地列表
fn decide_application(
    api: ApiClient,
    rows: WriteSignal<Vec<ApplicationRow>>,
    notifier: Notifier,
    application: Application,
    status: ReviewStatus,
) {
    spawn_local(async move {
        let request = UpdateApplicationStatusRequest {
            campaign_id: application.campaign_id,
            application_id: application.id,
            status,
        };
        match api.send(&request).await {
            Ok(()) => {
                rows.update(|rows| {
                    if let Some(row) = rows.iter_mut().find(|r| r.application.id == application.id) {
                        row.application.status = status;
                    }
                });
                notifier.success(format!("Application {}.", status.label().to_lowercase()));
            }
            Err(e) => notifier.error(e.user_message()),
        }
    });
}

#[component]
fn ApplicationsTable(
    rows: ReadSignal<Vec<ApplicationRow>>,
    on_decide: Callback<(Application, ReviewStatus)>,
    #[prop(optional)] show_campaign: bool,
) -> impl IntoView {
    view! {
        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
            <table class="table">
                <thead>
                    <tr>
                        <Show when=move || show_campaign>
                            <th>"Campaign"</th>
                        </Show>
                        <th>"Creator"</th>
                        <th>"Applied on"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || rows.get()
                        key=|r| (r.application.id, r.application.status)
                        children=move |row| {
                            let ApplicationRow { application, campaign_title } = row;
                            let status = application.status;
                            let creator = application.content_creator_id.map(|id| {
                                view! {
                                    <Link to=format!("{ADVERTISER_HOME}/{id}") class="link link-hover">
                                        {format!("Creator #{id}")}
                                    </Link>
                                }
                            });
                            let date = application
                                .application_date
                                .as_deref()
                                .map(adfluencer_shared::date::format_date)
                                .unwrap_or_default();
                            let accept = application.clone();
                            let reject = application;
                            view! {
                                <tr>
                                    <Show when=move || show_campaign>
                                        <td>{campaign_title.clone()}</td>
                                    </Show>
                                    <td>{creator}</td>
                                    <td>{date}</td>
                                    <td><StatusBadge status=status /></td>
                                    <td class="text-right space-x-2">
                                        <Show when=move || status == ReviewStatus::Pending>
                                            <button
                                                class="btn btn-success btn-sm"
                                                on:click={
                                                    let accept = accept.clone();
                                                    move |_| on_decide.run((accept.clone(), ReviewStatus::Accepted))
                                                }
                                            >
                                                "Accept"
                                            </button>
                                            <button
                                                class="btn btn-error btn-outline btn-sm"
                                                on:click={
                                                    let reject = reject.clone();
                                                    move |_| on_decide.run((reject.clone(), ReviewStatus::Rejected))
                                                }
                                            >
                                                "Reject"
                                            </button>
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

/// 需要发送邀请的创作者：已勾选且尚未被邀请过，按 ID 升序
fn invite_targets(selected: &BTreeSet<i64>, invitations: &[Invitation]) -> Vec<i64> {
    selected
        .iter()
        .copied()
        .filter(|id| !invitations.iter().any(|i| i.content_creator_id == *id))
        .collect()
}

/// 加载活动的邀请列表并解析受邀者用户名
async fn load_invitations(
    api: &ApiClient,
    campaign_id: i64,
    set_invitations: WriteSignal<Vec<Invitation>>,
    set_names: WriteSignal<HashMap<i64, String>>,
    notifier: Notifier,
) {
    match api.send(&CampaignInvitationsRequest { campaign_id }).await {
        Ok(list) => {
            let ids: Vec<i64> = list.iter().map(|i| i.content_creator_id).collect();
            set_invitations.set(list);
            resolve_usernames(api, ids, set_names).await;
        }
        Err(e) => notifier.error(format!("Could not load invitations: {}", e.user_message())),
    }
}

/// 创作者选择对话框，按已保存的搜索条件列出创作者并批量邀请
#[component]
fn CreatorPickerDialog(
    campaign_id: i64,
    open: RwSignal<bool>,
    invitations: ReadSignal<Vec<Invitation>>,
    on_invited: Callback<()>,
    notifier: Notifier,
) -> impl IntoView {
    let auth = use_auth();
    let (creators, set_creators) = signal(Vec::<ContentCreator>::new());
    let (loading, set_loading) = signal(false);
    let (is_inviting, set_is_inviting) = signal(false);
    let selected = RwSignal::new(BTreeSet::<i64>::new());

    // 每次打开都重新读取筛选条件
    Effect::new(move |_| {
        if !open.get() {
            return;
        }
        selected.set(BTreeSet::new());
        set_loading.set(true);
        let filter: CreatorFilter = load_json(FILTERS_KEY).unwrap_or_default();
        let api = auth.api();
        spawn_local(async move {
            match fetch_creators(&api, &filter).await {
                Ok(list) => set_creators.set(list),
                Err(e) => notifier.error(format!("Could not load creators: {}", e.user_message())),
            }
            set_loading.set(false);
        });
    });

    let is_invited =
        move |id: i64| invitations.with(|list| list.iter().any(|i| i.content_creator_id == id));
    let pending = move || selected.with(|s| invitations.with(|i| invite_targets(s, i)).len());

    let invite = move |_| {
        let ids = selected.with_untracked(|s| invitations.with_untracked(|i| invite_targets(s, i)));
        if ids.is_empty() || is_inviting.get_untracked() {
            return;
        }
        let api = auth.api();
        set_is_inviting.set(true);
        spawn_local(async move {
            let mut sent = 0;
            for &creator_id in &ids {
                let request = InviteCreatorRequest {
                    campaign_id,
                    creator_id,
                };
                match api.send(&request).await {
                    Ok(()) => sent += 1,
                    Err(e) => log_warn!("[ManageCampaign] Invite to {} failed: {}", creator_id, e),
                }
            }
            if sent == ids.len() {
                notifier.success(format!("{sent} invitation(s) sent."));
            } else {
                notifier.error(format!("{sent} of {} invitations sent.", ids.len()));
            }
            set_is_inviting.set(false);
            open.set(false);
            on_invited.run(());
        });
    };

    view! {
        <Show when=move || open.get()>
            <div class="modal modal-open">
                <div class="modal-box max-w-2xl">
                    <h3 class="font-bold text-lg">"Invite creators"</h3>
                    <p class="text-sm text-base-content/60 mb-4">
                        "Creators matching your saved search filters."
                    </p>
                    <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                        <Show
                            when=move || creators.with(|c| !c.is_empty())
                            fallback=|| view! { <EmptyState message="No creators match your saved filters." /> }
                        >
                            <div class="max-h-96 overflow-y-auto flex flex-col gap-1">
                                <For
                                    each=move || creators.get()
                                    key=|c| c.id
                                    children=move |c| {
                                        let id = c.id;
                                        let followers = format_amount(c.follower_count as f64);
                                        view! {
                                            <label class="flex items-center gap-3 p-2 rounded-box hover:bg-base-200 cursor-pointer">
                                                <input
                                                    type="checkbox"
                                                    class="checkbox checkbox-primary"
                                                    prop:checked=move || is_invited(id) || selected.with(|s| s.contains(&id))
                                                    disabled=move || is_invited(id)
                                                    on:change=move |_| selected.update(|s| {
                                                        if !s.remove(&id) {
                                                            s.insert(id);
                                                        }
                                                    })
                                                />
                                                <span class="flex-1 font-medium">{c.username}</span>
                                                <span class="text-sm opacity-70">{followers}" followers"</span>
                                                <Show when=move || is_invited(id)>
                                                    <span class="badge badge-ghost">"Invited"</span>
                                                </Show>
                                            </label>
                                        }
                                    }
                                />
                            </div>
                        </Show>
                    </Show>
                    <div class="modal-action">
                        <button class="btn btn-ghost" on:click=move |_| open.set(false)>
                            "Cancel"
                        </button>
                        <button
                            class="btn btn-primary"
                            disabled=move || is_inviting.get() || pending() == 0
                            on:click=invite
                        >
                            {move || match pending() {
                                0 => "Invite".to_string(),
                                n => format!("Invite {n}"),
                            }}
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}

#[component]
pub fn ManageCampaignPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = Notifier::new();

    let campaign_id = router
        .current()
        .with_untracked(|r| query_param(&r.path, "id").and_then(|id| id.parse::<i64>().ok()));

    let (campaign, set_campaign) = signal(Option::<Campaign>::None);
    let (rows, set_rows) = signal(Vec::<ApplicationRow>::new());
    let (invitations, set_invitations) = signal(Vec::<Invitation>::new());
    let (names, set_names) = signal(HashMap::<i64, String>::new());
    let (loading, set_loading) = signal(true);
    let picker_open = RwSignal::new(false);

    if let Some(campaign_id) = campaign_id {
        let api = auth.api();
        spawn_local(async move {
            let found = match api.send(&MyCampaignsRequest).await {
                Ok(list) => list.data.into_iter().find(|c| c.id == campaign_id),
                Err(e) => {
                    notifier.error(format!("Could not load campaign: {}", e.user_message()));
                    None
                }
            };

            if let Some(found) = found {
                match api.send(&CampaignApplicationsRequest { campaign_id }).await {
                    Ok(list) => set_rows.set(
                        list.into_iter()
                            .map(|application| ApplicationRow {
                                application,
                                campaign_title: found.title.clone(),
                            })
                            .collect(),
                    ),
                    Err(e) => notifier.error(format!("Could not load applications: {}", e.user_message())),
                }
                set_campaign.set(Some(found));
                set_loading.set(false);
                load_invitations(&api, campaign_id, set_invitations, set_names, notifier).await;
            } else {
                set_loading.set(false);
            }
        });
    } else {
        set_loading.set(false);
    }

    let on_decide = Callback::new(move |(application, status): (Application, ReviewStatus)| {
        decide_application(auth.api(), set_rows, notifier, application, status);
    });

    let on_invited = Callback::new(move |()| {
        if let Some(campaign_id) = campaign_id {
            let api = auth.api();
            spawn_local(async move {
                load_invitations(&api, campaign_id, set_invitations, set_names, notifier).await;
            });
        }
    });

    let picker = move || {
        campaign.get().map(|c| {
            view! {
                <CreatorPickerDialog
                    campaign_id=c.id
                    open=picker_open
                    invitations=invitations
                    on_invited=on_invited
                    notifier=notifier
                />
            }
        })
    };

    let summary = move || {
        campaign.get().map(|c| {
            let budget = c.budget.map(format_amount).unwrap_or_else(|| "0".into());
            let status = c.status_label();
            view! {
                <div class="card bg-base-100 shadow-md mb-6">
                    <div class="card-body">
                        <div class="flex justify-between items-start">
                            <h1 class="text-3xl font-bold">{c.title}</h1>
                            <span class="badge badge-outline">{status}</span>
                        </div>
                        <p class="whitespace-pre-line text-base-content/80">{c.description}</p>
                        <div class="flex gap-8 mt-2">
                            <span><span class="font-semibold">{budget}</span>" TL budget"</span>
                            <span>"Max. " <span class="font-semibold">{c.max_capacity}</span> " creators"</span>
                        </div>
                    </div>
                </div>
            }
        })
    };

    view! {
        <NoticeToast notifier=notifier />
        {picker}
        <div class="max-w-6xl mx-auto p-4 md:p-8">
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || campaign.with(Option::is_some)
                    fallback=|| {
                        view! {
                            <EmptyState message="Campaign not found." />
                            <div class="text-center mt-4">
                                <Link to=MY_CAMPAIGNS_PATH class="btn btn-primary">"Back to my campaigns"</Link>
                            </div>
                        }
                    }
                >
                    {summary}
                    <h2 class="text-xl font-bold mb-3">"Applications"</h2>
                    <Show
                        when=move || rows.with(|r| !r.is_empty())
                        fallback=|| view! { <EmptyState message="No applications yet." /> }
                    >
                        <ApplicationsTable rows=rows on_decide=on_decide />
                    </Show>

                    <div class="flex justify-between items-center mt-8 mb-3">
                        <h2 class="text-xl font-bold">"Invited creators"</h2>
                        <button class="btn btn-primary btn-sm" on:click=move |_| picker_open.set(true)>
                            "Invite creators"
                        </button>
                    </div>
                    <Show
                        when=move || invitations.with(|i| !i.is_empty())
                        fallback=|| view! { <EmptyState message="You have not invited anyone yet." /> }
                    >
                        <ul class="menu bg-base-100 rounded-box shadow">
                            <For
                                each=move || invitations.get()
                                key=|i| i.id
                                children=move |inv| {
                                    let creator_id = inv.content_creator_id;
                                    let href = format!("{ADVERTISER_HOME}/{creator_id}");
                                    view! {
                                        <li>
                                            <div class="flex justify-between">
                                                <Link to=href>{move || names.with(|n| display_name(n, creator_id))}</Link>
                                                <StatusBadge status=inv.status />
                                            </div>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    </Show>
                </Show>
            </Show>
        </div>
    }
}

#[component]
pub fn ApplicationsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let (rows, set_rows) = signal(Vec::<ApplicationRow>::new());
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&MyCampaignsRequest).await {
            Ok(list) => {
                let mut collected = Vec::new();
                for campaign in list.data {
                    let request = CampaignApplicationsRequest {
                        campaign_id: campaign.id,
                    };
                    match api.send(&request).await {
                        Ok(applications) => collected.extend(applications.into_iter().map(
                            |application| ApplicationRow {
                                application,
                                campaign_title: campaign.title.clone(),
                            },
                        )),
                        Err(e) => log_warn!(
                            "[Campaign] Applications for {} unavailable: {}",
                            campaign.id,
                            e
                        ),
                    }
                }
                set_rows.set(collected);
            }
            Err(e) => notifier.error(format!("Could not load applications: {}", e.user_message())),
        }
        set_loading.set(false);
    });

    let on_decide = Callback::new(move |(application, status): (Application, ReviewStatus)| {
        decide_application(auth.api(), set_rows, notifier, application, status);
    });

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-6xl mx-auto p-4 md:p-8">
            <PageTitle title="Applications" subtitle="Creators who applied to your campaigns" />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || rows.with(|r| !r.is_empty())
                    fallback=|| view! { <EmptyState message="No applications yet." /> }
                >
                    <ApplicationsTable rows=rows on_decide=on_decide show_campaign=true />
                </Show>
            </Show>
        </div>
    }
}

// =========================================================
// 支付结果
// =========================================================

#[component]
pub fn PaymentResultPage(success: bool) -> impl IntoView {
    let (title, message, class) = if success {
        (
            "Payment completed",
            "Your payment went through and the campaign is now active.",
            "text-success",
        )
    } else {
        (
            "Payment failed",
            "The payment was declined or cancelled. No charge was made.",
            "text-error",
        )
    };

    view! {
        <div class="max-w-2xl mx-auto p-4 md:p-8">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body items-center text-center gap-4">
                    <h1 class=format!("text-3xl font-bold {class}")>{title}</h1>
                    <p class="text-base-content/70">{message}</p>
                    <Link to=MY_CAMPAIGNS_PATH class="btn btn-primary">"Back to my campaigns"</Link>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator(id: i64, username: &str) -> ContentCreator {
        ContentCreator {
            id,
            username: username.into(),
            email: String::new(),
            photo_url: None,
            category: None,
            follower_count: 0,
            score: 0.0,
            avg_likes: 0.0,
            posts: 0,
            engagement60_day: 0.0,
        }
    }

    #[test]
    fn username_filter_is_case_insensitive_substring() {
        let all = vec![creator(1, "AyseTravel"), creator(2, "mehmet"), creator(3, "travelbug")];
        let ids: Vec<_> = filter_by_username(all.clone(), " TRAVEL ")
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, [1, 3]);
        assert_eq!(filter_by_username(all, "").len(), 3);
    }

    fn invitation(id: i64, creator_id: i64) -> Invitation {
        Invitation {
            id,
            campaign_id: 1,
            content_creator_id: creator_id,
            status: ReviewStatus::Pending,
        }
    }

    #[test]
    fn only_newly_selected_creators_are_invited() {
        let invited = [invitation(1, 4), invitation(2, 9)];
        let selected: BTreeSet<i64> = [9, 2, 7, 4].into_iter().collect();
        assert_eq!(invite_targets(&selected, &invited), [2, 7]);

        assert!(invite_targets(&BTreeSet::new(), &invited).is_empty());
        let all_invited: BTreeSet<i64> = [4, 9].into_iter().collect();
        assert!(invite_targets(&all_invited, &invited).is_empty());
        assert_eq!(invite_targets(&selected, &[]), [2, 4, 7, 9]);
    }

    #[test]
    fn filter_inputs_ignore_unparseable_numbers() {
        let inputs = FilterInputs {
            category: " Food ".into(),
            min_followers: "1000".into(),
            max_followers: "lots".into(),
            min_score: String::new(),
            max_score: "4.5".into(),
        };
        let filter = inputs.to_filter();
        assert_eq!(filter.category, "Food");
        assert_eq!(filter.min_followers, Some(1000));
        assert_eq!(filter.max_followers, None);
        assert_eq!(filter.max_score, Some(4.5));

        assert!(FilterInputs::default().to_filter().is_empty());
        assert_eq!(FilterInputs::from_filter(&filter).max_score, "4.5");
    }
}
