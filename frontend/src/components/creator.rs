//! 内容创作者页面：活动列表、活动详情、我的申请、我的邀请

use adfluencer_shared::date::format_date;
use adfluencer_shared::protocol::{
    ApplyToCampaignRequest, ListCampaignsRequest, MyApplicationsRequest, MyInvitationsRequest,
    UpdateInvitationStatusRequest,
};
use adfluencer_shared::{Application, Campaign, Invitation, ReviewStatus, format_amount};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::notice::{NoticeToast, Notifier};
use crate::components::widgets::{EmptyState, Loading, PageTitle, StatusBadge};
use crate::web::route::CREATOR_HOME;
use crate::web::router::Link;

fn budget_text(campaign: &Campaign) -> String {
    campaign
        .budget
        .map(|b| format!("{} TL", format_amount(b)))
        .unwrap_or_else(|| "Budget not set".into())
}

#[component]
fn CampaignCard(campaign: Campaign) -> impl IntoView {
    let href = format!("/campaign/{}", campaign.id);
    let advertiser = campaign
        .advertiser
        .as_ref()
        .map(|a| a.username.clone())
        .unwrap_or_default();
    let budget = budget_text(&campaign);
    let status = campaign.status_label();

    view! {
        <div class="card bg-base-100 shadow-md hover:shadow-xl transition-shadow">
            <div class="card-body">
                <div class="flex justify-between items-start gap-2">
                    <h2 class="card-title line-clamp-1">{campaign.title}</h2>
                    <span class="badge badge-outline">{status}</span>
                </div>
                <p class="text-sm text-base-content/60">{advertiser}</p>
                <p class="line-clamp-3">{campaign.description}</p>
                <div class="flex justify-between items-center mt-2">
                    <span class="font-semibold text-primary">{budget}</span>
                    <span class="text-sm">"Max. " {campaign.max_capacity} " creators"</span>
                </div>
                <div class="card-actions justify-end">
                    <Link to=href class="btn btn-primary btn-sm">"Details"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn JobsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let (campaigns, set_campaigns) = signal(Vec::<Campaign>::new());
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&ListCampaignsRequest).await {
            Ok(list) => set_campaigns.set(list),
            Err(e) => notifier.error(format!("Could not load campaigns: {}", e.user_message())),
        }
        set_loading.set(false);
    });

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-7xl mx-auto p-4 md:p-8">
            <PageTitle title="Open campaigns" subtitle="Find a brand that fits your audience" />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || campaigns.with(|c| !c.is_empty())
                    fallback=|| view! { <EmptyState message="There are no campaigns yet." /> }
                >
                    <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                        <For
                            each=move || campaigns.get()
                            key=|c| c.id
                            children=move |campaign| view! { <CampaignCard campaign=campaign /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
pub fn CampaignDetailPage(id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let campaign_id = id.and_then(|id| id.parse::<i64>().ok());
    let (campaign, set_campaign) = signal(Option::<Campaign>::None);
    let (loading, set_loading) = signal(true);
    let (is_applying, set_is_applying) = signal(false);
    let (is_applied, set_is_applied) = signal(false);

    // 没有单个活动的查询接口，从全部活动中查找
    if let Some(campaign_id) = campaign_id {
        let api = auth.api();
        spawn_local(async move {
            match api.send(&ListCampaignsRequest).await {
                Ok(list) => set_campaign.set(list.into_iter().find(|c| c.id == campaign_id)),
                Err(e) => notifier.error(format!("Could not load campaign: {}", e.user_message())),
            }
            set_loading.set(false);
        });
    } else {
        set_loading.set(false);
    }

    let on_apply = move |_| {
        let Some(campaign_id) = campaign_id else {
            return;
        };
        let api = auth.api();
        set_is_applying.set(true);
        spawn_local(async move {
            match api.send(&ApplyToCampaignRequest { campaign_id }).await {
                Ok(response) if response.status == "error" => {
                    notifier.error("You have already applied to this campaign.");
                }
                Ok(_) => {
                    set_is_applied.set(true);
                    notifier.success("Your application was sent.");
                }
                Err(e) => notifier.error(e.user_message()),
            }
            set_is_applying.set(false);
        });
    };

    let detail = move || {
        campaign.get().map(|c| {
            let budget = budget_text(&c);
            let advertiser = c.advertiser.clone();
            view! {
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body gap-4">
                        <div class="flex items-center gap-4">
                            {advertiser
                                .as_ref()
                                .and_then(|a| a.photo_url.clone().or_else(|| a.photo.clone()))
                                .map(|src| {
                                    view! { <img src=src class="w-20 h-20 rounded-xl shadow" /> }
                                })}
                            <div>
                                <h1 class="text-2xl font-bold">{c.title.clone()}</h1>
                                <p class="text-base-content/60">
                                    {advertiser.map(|a| a.username).unwrap_or_default()}
                                </p>
                            </div>
                            <span class="badge badge-outline ml-auto">{c.status_label()}</span>
                        </div>
                        <div class="divider my-0"></div>
                        <p class="whitespace-pre-line">{c.description.clone()}</p>
                        <div class="stats shadow">
                            <div class="stat">
                                <div class="stat-title">"Budget"</div>
                                <div class="stat-value text-primary text-2xl">{budget}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Capacity"</div>
                                <div class="stat-value text-2xl">{c.max_capacity}</div>
                                <div class="stat-desc">"creators"</div>
                            </div>
                        </div>
                        <div class="card-actions justify-end">
                            <Link to=CREATOR_HOME class="btn btn-ghost">"Back to jobs"</Link>
                            <button
                                class="btn btn-primary"
                                disabled=move || is_applying.get() || is_applied.get()
                                on:click=on_apply
                            >
                                {move || if is_applied.get() { "Applied" } else { "Apply" }}
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-4xl mx-auto p-4 md:p-8">
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || campaign.with(Option::is_some)
                    fallback=|| {
                        view! {
                            <EmptyState message="This campaign could not be found." />
                            <div class="text-center mt-4">
                                <Link to=CREATOR_HOME class="btn btn-primary">"Back to jobs"</Link>
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

#[component]
pub fn AppliedCampaignsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let (applications, set_applications) = signal(Vec::<Application>::new());
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&MyApplicationsRequest).await {
            Ok(list) => set_applications.set(list),
            Err(e) => notifier.error(format!("Could not load applications: {}", e.user_message())),
        }
        set_loading.set(false);
    });

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-5xl mx-auto p-4 md:p-8">
            <PageTitle title="Applied campaigns" subtitle="Track the campaigns you applied to" />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || applications.with(|a| !a.is_empty())
                    fallback=|| {
                        view! {
                            <EmptyState message="You have not applied to any campaign yet." />
                            <div class="text-center mt-4">
                                <Link to=CREATOR_HOME class="btn btn-primary">"Browse jobs"</Link>
                            </div>
                        }
                    }
                >
                    <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                        <table class="table table-zebra">
                            <thead>
                                <tr>
                                    <th>"Campaign"</th>
                                    <th>"Applied on"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || applications.get()
                                    key=|a| (a.id, a.status)
                                    children=move |a| {
                                        let date = a
                                            .application_date
                                            .as_deref()
                                            .map(format_date)
                                            .unwrap_or_default();
                                        let href = format!("/campaign/{}", a.campaign_id);
                                        view! {
                                            <tr>
                                                <td>
                                                    <Link to=href class="link link-hover">{a.title}</Link>
                                                </td>
                                                <td>{date}</td>
                                                <td><StatusBadge status=a.status /></td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
pub fn MyInvitationsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();

    let (invitations, set_invitations) = signal(Vec::<Invitation>::new());
    let (campaigns, set_campaigns) = signal(Vec::<Campaign>::new());
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&MyInvitationsRequest).await {
            Ok(list) => set_invitations.set(list),
            Err(e) => notifier.error(format!("Could not load invitations: {}", e.user_message())),
        }
        // 标题仅用于展示，加载失败时退回显示活动编号
        if let Ok(list) = api.send(&ListCampaignsRequest).await {
            set_campaigns.set(list);
        }
        set_loading.set(false);
    });

    let respond = move |invitation_id: i64, status: ReviewStatus| {
        let api = auth.api();
        spawn_local(async move {
            let request = UpdateInvitationStatusRequest {
                invitation_id,
                status,
            };
            match api.send(&request).await {
                Ok(()) => {
                    set_invitations.update(|list| {
                        if let Some(inv) = list.iter_mut().find(|i| i.id == invitation_id) {
                            inv.status = status;
                        }
                    });
                    notifier.success(format!("Invitation {}.", status.label().to_lowercase()));
                }
                Err(e) => notifier.error(e.user_message()),
            }
        });
    };

    let campaign_title = move |campaign_id: i64| {
        campaigns.with(|list| {
            list.iter()
                .find(|c| c.id == campaign_id)
                .map(|c| c.title.clone())
                .unwrap_or_else(|| format!("Campaign #{campaign_id}"))
        })
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-5xl mx-auto p-4 md:p-8">
            <PageTitle title="Invitations" subtitle="Brands that want to work with you" />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || invitations.with(|i| !i.is_empty())
                    fallback=|| view! { <EmptyState message="You have no invitations yet." /> }
                >
                    <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Campaign"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || invitations.get()
                                    key=|i| (i.id, i.status)
                                    children=move |inv| {
                                        let id = inv.id;
                                        let pending = inv.status == ReviewStatus::Pending;
                                        view! {
                                            <tr>
                                                <td>{move || campaign_title(inv.campaign_id)}</td>
                                                <td><StatusBadge status=inv.status /></td>
                                                <td class="text-right space-x-2">
                                                    <Show when=move || pending>
                                                        <button
                                                            class="btn btn-success btn-sm"
                                                            on:click=move |_| respond(id, ReviewStatus::Accepted)
                                                        >
                                                            "Accept"
                                                        </button>
                                                        <button
                                                            class="btn btn-error btn-outline btn-sm"
                                                            on:click=move |_| respond(id, ReviewStatus::Rejected)
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
                </Show>
            </Show>
        </div>
    }
}
