//! 双方共用的聊天页
//!
//! 会话来自当前用户的合作协议。消息历史与发送走 REST，
//! 对方发来的新消息经 hub 连接实时推送。

use std::collections::HashMap;

use adfluencer_shared::date::{format_time, now_rfc3339};
use adfluencer_shared::protocol::{ListMessagesRequest, MyAgreementsRequest};
use adfluencer_shared::{Agreement, Message, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::auth::use_auth;
use crate::components::notice::{NoticeToast, Notifier};
use crate::components::widgets::{EmptyState, Loading, PageTitle, display_name, resolve_usernames};
use crate::config::ClientConfig;
use crate::web::hub;

/// 与同一对象的一个会话（可能对应多份协议）
#[derive(Debug, Clone, PartialEq)]
struct Conversation {
    counterpart_id: i64,
    campaigns: Vec<String>,
}

/// 按对方用户归并协议，保持首次出现的顺序
fn conversations(agreements: &[Agreement], role: Role) -> Vec<Conversation> {
    let mut out: Vec<Conversation> = Vec::new();
    for agreement in agreements {
        let counterpart_id = agreement.counterpart_id(role);
        let title = agreement.title.trim();
        let index = match out.iter().position(|c| c.counterpart_id == counterpart_id) {
            Some(index) => index,
            None => {
                out.push(Conversation {
                    counterpart_id,
                    campaigns: Vec::new(),
                });
                out.len() - 1
            }
        };
        let conversation = &mut out[index];
        if !title.is_empty() && !conversation.campaigns.iter().any(|t| t == title) {
            conversation.campaigns.push(title.to_string());
        }
    }
    out
}

/// hub 推送的消息只追加到正在查看的会话，其余会话切换时从历史加载
fn incoming_message(
    selected: Option<i64>,
    my_id: Option<i64>,
    sender_id: i64,
    content: String,
) -> Option<Message> {
    let receiver_id = my_id?;
    (selected == Some(sender_id)).then(|| Message {
        id: None,
        sender_id,
        receiver_id,
        content,
        sent_at: Some(now_rfc3339()),
    })
}

/// 拉取与 `counterpart_id` 的消息；期间若切换了会话则丢弃结果
fn refresh_messages(
    api: ApiClient,
    counterpart_id: i64,
    selected: ReadSignal<Option<i64>>,
    set_messages: WriteSignal<Vec<Message>>,
) {
    spawn_local(async move {
        match api.send(&ListMessagesRequest { user_id: counterpart_id }).await {
            Ok(list) => {
                if selected.try_get_untracked().flatten() == Some(counterpart_id) {
                    set_messages.set(list);
                }
            }
            Err(e) => log_warn!("[Chat] Refresh with {} failed: {}", counterpart_id, e),
        }
    });
}

#[component]
pub fn ChatPage(role: Role) -> impl IntoView {
    let auth = use_auth();
    let notifier = Notifier::new();
    let config = ClientConfig::from_env();
    let my_id = auth.identity().map(|i| i.id);

    let (threads, set_threads) = signal(Vec::<Conversation>::new());
    let (names, set_names) = signal(HashMap::<i64, String>::new());
    let (selected, set_selected) = signal(Option::<i64>::None);
    let (messages, set_messages) = signal(Vec::<Message>::new());
    let (draft, set_draft) = signal(String::new());
    let (loading, set_loading) = signal(true);
    let (is_sending, set_is_sending) = signal(false);

    let api = auth.api();
    spawn_local(async move {
        match api.send(&MyAgreementsRequest).await {
            Ok(agreements) => {
                let list = conversations(&agreements, role);
                set_selected.set(list.first().map(|c| c.counterpart_id));
                let ids: Vec<i64> = list.iter().map(|c| c.counterpart_id).collect();
                set_threads.set(list);
                set_loading.set(false);
                resolve_usernames(&api, ids, set_names).await;
            }
            Err(e) => {
                notifier.error(format!("Could not load conversations: {}", e.user_message()));
                set_loading.set(false);
            }
        }
    });

    // 切换会话时立即加载
    Effect::new(move |_| {
        set_messages.set(Vec::new());
        if let Some(id) = selected.get() {
            refresh_messages(auth.api(), id, selected, set_messages);
        }
    });

    // 每个页面实例一条 hub 连接
    let connection = StoredValue::new_local(auth.token().map(|token| {
        hub::connect(config.hub_url, token, move |sender_id, content| {
            let current = selected.try_get_untracked().flatten();
            if let Some(message) = incoming_message(current, my_id, sender_id, content) {
                set_messages.update(|m| m.push(message));
            }
        })
    }));
    on_cleanup(move || {
        connection.try_update_value(|c| c.take());
    });

    let send = move || {
        let content = draft.get_untracked().trim().to_string();
        let (Some(sender_id), Some(receiver_id)) = (my_id, selected.get_untracked()) else {
            return;
        };
        if content.is_empty() || is_sending.get_untracked() {
            return;
        }

        let message = Message {
            id: None,
            sender_id,
            receiver_id,
            content,
            sent_at: None,
        };
        let api = auth.api();
        set_is_sending.set(true);
        spawn_local(async move {
            match api.send(&message).await {
                Ok(()) => {
                    set_draft.set(String::new());
                    set_messages.update(|m| {
                        m.push(Message {
                            sent_at: Some(now_rfc3339()),
                            ..message
                        })
                    });
                }
                Err(e) => notifier.error(format!("Message not sent: {}", e.user_message())),
            }
            set_is_sending.set(false);
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        send();
    };

    let thread_list = move || {
        threads
            .get()
            .into_iter()
            .map(|thread| {
                let id = thread.counterpart_id;
                let subtitle = thread.campaigns.join(", ");
                let is_active = move || selected.get() == Some(id);
                view! {
                    <li>
                        <button
                            class=move || if is_active() { "menu-active flex flex-col items-start" } else { "flex flex-col items-start" }
                            on:click=move |_| set_selected.set(Some(id))
                        >
                            <span class="font-semibold">{move || names.with(|n| display_name(n, id))}</span>
                            <span class="text-xs opacity-70 line-clamp-1">{subtitle}</span>
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    let bubbles = move || {
        messages
            .get()
            .into_iter()
            .map(|m| {
                let mine = Some(m.sender_id) == my_id;
                let time = m.sent_at.as_deref().map(format_time).unwrap_or_default();
                view! {
                    <div class=if mine { "chat chat-end" } else { "chat chat-start" }>
                        <div class="chat-footer opacity-50 text-xs">{time}</div>
                        <div class=if mine { "chat-bubble chat-bubble-primary" } else { "chat-bubble" }>
                            {m.content}
                        </div>
                    </div>
                }
            })
            .collect_view()
    };

    let empty_hint = match role {
        Role::Advertiser => "Conversations open once a creator accepts an agreement.",
        Role::ContentCreator => "Conversations open once an advertiser accepts your application.",
    };

    view! {
        <NoticeToast notifier=notifier />
        <div class="max-w-6xl mx-auto p-4 md:p-8">
            <PageTitle title="Messages" />
            <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                <Show
                    when=move || threads.with(|t| !t.is_empty())
                    fallback=move || view! { <EmptyState message=empty_hint /> }
                >
                    <div class="grid gap-4 md:grid-cols-3 h-[calc(100vh-16rem)]">
                        <ul class="menu bg-base-100 rounded-box shadow w-full overflow-y-auto flex-nowrap">
                            {thread_list}
                        </ul>
                        <div class="md:col-span-2 card bg-base-100 shadow flex flex-col">
                            <div class="card-body flex-1 overflow-y-auto">
                                <Show
                                    when=move || messages.with(|m| !m.is_empty())
                                    fallback=|| {
                                        view! {
                                            <p class="text-center text-base-content/50 my-auto">
                                                "No messages yet. Say hello!"
                                            </p>
                                        }
                                    }
                                >
                                    {bubbles}
                                </Show>
                            </div>
                            <form class="flex gap-2 p-4 border-t border-base-200" on:submit=on_submit>
                                <input
                                    type="text"
                                    placeholder="Write a message..."
                                    class="input input-bordered flex-1"
                                    prop:value=draft
                                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                                />
                                <button
                                    class="btn btn-primary"
                                    disabled=move || is_sending.get() || draft.with(|d| d.trim().is_empty())
                                >
                                    "Send"
                                </button>
                            </form>
                        </div>
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agreement(id: i64, creator: i64, advertiser: i64, title: &str) -> Agreement {
        Agreement {
            id,
            campaign_id: id,
            content_creator_id: creator,
            advertiser_id: advertiser,
            status: 0,
            currency: "TRY".into(),
            budget: 0.0,
            title: title.into(),
            description: String::new(),
            agreement_date: None,
        }
    }

    #[test]
    fn agreements_with_same_counterpart_share_a_conversation() {
        let agreements = [
            agreement(1, 10, 20, "Spring launch"),
            agreement(2, 11, 20, "Spring launch"),
            agreement(3, 10, 21, "Summer"),
            agreement(4, 10, 20, "Autumn"),
        ];

        let creator_view = conversations(&agreements, Role::ContentCreator);
        assert_eq!(creator_view.len(), 2);
        assert_eq!(creator_view[0].counterpart_id, 20);
        assert_eq!(creator_view[0].campaigns, ["Spring launch", "Autumn"]);
        assert_eq!(creator_view[1].counterpart_id, 21);

        let advertiser_view = conversations(&agreements, Role::Advertiser);
        let ids: Vec<_> = advertiser_view.iter().map(|c| c.counterpart_id).collect();
        assert_eq!(ids, [10, 11]);
    }

    #[test]
    fn pushed_messages_only_join_the_open_conversation() {
        let message = incoming_message(Some(20), Some(10), 20, "hi".into()).unwrap();
        assert_eq!(message.sender_id, 20);
        assert_eq!(message.receiver_id, 10);
        assert_eq!(message.content, "hi");
        assert!(message.sent_at.is_some());

        assert_eq!(incoming_message(Some(21), Some(10), 20, "hi".into()), None);
        assert_eq!(incoming_message(None, Some(10), 20, "hi".into()), None);
        assert_eq!(incoming_message(Some(20), None, 20, "hi".into()), None);
    }
}
