use leptos::prelude::*;
use std::time::Duration;

use crate::config::NOTICE_TIMEOUT_SECS;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// 用于判断定时器触发时提示是否已被替换
    id: u64,
    pub message: String,
    pub is_error: bool,
}

/// 页面内的短暂提示，3 秒后自动消失
#[derive(Clone, Copy)]
pub struct Notifier {
    notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
    next_id: StoredValue<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        let (notice, set_notice) = signal(Option::<Notice>::None);
        Self {
            notice,
            set_notice,
            next_id: StoredValue::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    fn show(&self, message: String, is_error: bool) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.set_notice.set(Some(Notice {
            id,
            message,
            is_error,
        }));

        let notice = self.notice;
        let set_notice = self.set_notice;
        set_timeout(
            move || {
                // 页面可能已被卸载
                let current = notice.try_with_untracked(|n| n.as_ref().map(|n| n.id));
                if current == Some(Some(id)) {
                    set_notice.set(None);
                }
            },
            Duration::from_secs(NOTICE_TIMEOUT_SECS),
        );
    }
}

#[component]
pub fn NoticeToast(notifier: Notifier) -> impl IntoView {
    let notice = notifier.notice;

    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = if n.is_error {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class=class>
                                <span>{n.message}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
