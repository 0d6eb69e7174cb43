use std::collections::{BTreeSet, HashMap};

use adfluencer_shared::ReviewStatus;
use adfluencer_shared::protocol::GetCreatorRequest;
use leptos::prelude::*;

use crate::api::ApiClient;

/// 用户名未解析时显示占位
pub fn display_name(names: &HashMap<i64, String>, id: i64) -> String {
    names.get(&id).cloned().unwrap_or_else(|| format!("User #{id}"))
}

/// 通过 `GET /Users/{id}` 逐个解析用户名，失败的保留占位
pub async fn resolve_usernames(
    api: &ApiClient,
    ids: impl IntoIterator<Item = i64>,
    names: WriteSignal<HashMap<i64, String>>,
) {
    for id in ids.into_iter().collect::<BTreeSet<_>>() {
        match api.send(&GetCreatorRequest { id }).await {
            Ok(user) => {
                names.try_update(|n| n.insert(id, user.username));
            }
            Err(e) => log_warn!("[Users] Could not resolve user {}: {}", id, e),
        }
    }
}

#[component]
pub fn PageTitle(
    #[prop(into)] title: String,
    #[prop(into, optional)] subtitle: Option<String>,
) -> impl IntoView {
    view! {
        <div class="mb-6">
            <h1 class="text-3xl font-bold">{title}</h1>
            {subtitle.map(|s| view! { <p class="text-base-content/70 mt-1">{s}</p> })}
        </div>
    }
}

#[component]
pub fn StatusBadge(status: ReviewStatus) -> impl IntoView {
    let class = match status {
        ReviewStatus::Pending => "badge badge-warning",
        ReviewStatus::Accepted => "badge badge-success",
        ReviewStatus::Rejected => "badge badge-error",
    };
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body items-center text-center text-base-content/60">
                <p>{message}</p>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_users_get_a_placeholder_name() {
        let mut names = HashMap::new();
        names.insert(3, "ayse".to_string());
        assert_eq!(display_name(&names, 3), "ayse");
        assert_eq!(display_name(&names, 4), "User #4");
    }
}
