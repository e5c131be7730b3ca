//! 全局通知
//!
//! 页面和路由守卫通过 `Notifier` 发出提示，由根组件中的 `Toast` 统一展示。

use leptos::prelude::*;

const NOTICE_TTL: std::time::Duration = std::time::Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    seq: u64,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    current: RwSignal<Option<Notice>>,
    next_seq: StoredValue<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            next_seq: StoredValue::new(0),
        }
    }

    fn show(&self, text: String, is_error: bool) {
        let seq = self.next_seq.get_value();
        self.next_seq.set_value(seq + 1);
        self.current.set(Some(Notice { text, is_error, seq }));
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text.into(), false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text.into(), true);
    }

    /// 只清除仍在显示的那一条，较早的定时器不会清掉新通知
    fn clear(&self, seq: u64) {
        if self.current.with_untracked(|n| n.as_ref().map(|n| n.seq)) == Some(seq) {
            self.current.set(None);
        }
    }
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

/// 通知提示框，3 秒后自动清除
#[component]
pub fn Toast() -> impl IntoView {
    let notifier = use_notifier();
    let current = notifier.current;

    Effect::new(move |_| {
        if let Some(seq) = current.with(|n| n.as_ref().map(|n| n.seq)) {
            set_timeout(move || notifier.clear(seq), NOTICE_TTL);
        }
    });

    move || {
        current.get().map(|notice| {
            let class = if notice.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{notice.text}</span>
                    </div>
                </div>
            }
        })
    }
}
