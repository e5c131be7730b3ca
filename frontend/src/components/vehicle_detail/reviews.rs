use easyrent_shared::model::{Comment, RecordId};
use easyrent_shared::protocol::{ListCommentsRequest, SubmitCommentRequest, SubmitRatingRequest};
use easyrent_shared::validate::{require, validate_rating};
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::notify::use_notifier;

/// 评分与评论
#[component]
pub fn Reviews(
    vehicle_id: RecordId,
    identity: Identity,
    /// 评分提交后刷新平均分
    on_rated: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();
    let identity = StoredValue::new(identity);

    let (comments, set_comments) = signal(LoadState::<Vec<Comment>>::Loading);
    let rating = RwSignal::new(0u8);
    let draft = RwSignal::new(String::new());
    let (rating_error, set_rating_error) = signal(Option::<String>::None);
    let (comment_error, set_comment_error) = signal(Option::<String>::None);
    let (busy, set_busy) = signal(false);

    let load_comments = move || {
        let api = identity.with_value(|id| auth.api_for(id));
        scope.spawn(
            async move { api.send(&ListCommentsRequest { vehicle_id }).await },
            move |result| set_comments.set(auth.load_state(Role::User, result)),
        );
    };

    load_comments();

    let submit_rating = move |_| {
        let value = rating.get();
        if let Err(e) = validate_rating(value) {
            set_rating_error.set(Some(e.to_string()));
            return;
        }
        set_rating_error.set(None);
        set_busy.set(true);

        let api = identity.with_value(|id| auth.api_for(id));
        scope.spawn(
            async move {
                api.send(&SubmitRatingRequest {
                    vehicle_id,
                    rating: value,
                })
                .await
            },
            move |result| {
                set_busy.set(false);
                match result {
                    Ok(_) => {
                        notifier.success("Thanks for rating this vehicle");
                        on_rated.run(());
                    }
                    Err(e) => set_rating_error.set(Some(auth.describe_error(Role::User, &e))),
                }
            },
        );
    };

    let submit_comment = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = draft.get().trim().to_string();
        if let Err(e) = require("Comment", &text) {
            set_comment_error.set(Some(e.to_string()));
            return;
        }
        set_comment_error.set(None);
        set_busy.set(true);

        let api = identity.with_value(|id| auth.api_for(id));
        scope.spawn(
            async move {
                api.send(&SubmitCommentRequest {
                    vehicle_id,
                    comment: text,
                })
                .await
            },
            move |result| {
                set_busy.set(false);
                match result {
                    Ok(_) => {
                        draft.set(String::new());
                        load_comments();
                    }
                    // 保留草稿，方便重试
                    Err(e) => set_comment_error.set(Some(auth.describe_error(Role::User, &e))),
                }
            },
        );
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4 space-y-4">
                <h3 class="card-title">"Reviews"</h3>

                <div class="flex items-center gap-2">
                    <div class="rating">
                        {(1..=5u8)
                            .map(|star| view! {
                                <input
                                    type="radio"
                                    name="rating"
                                    class="mask mask-star-2 bg-orange-400"
                                    prop:checked=move || rating.get() == star
                                    on:change=move |_| rating.set(star)
                                />
                            })
                            .collect_view()}
                    </div>
                    <button class="btn btn-sm" disabled=move || busy.get() on:click=submit_rating>
                        "Rate"
                    </button>
                </div>
                {move || rating_error.get().map(|msg| view! { <p class="text-sm text-error">{msg}</p> })}

                <form class="space-y-2" on:submit=submit_comment>
                    <textarea
                        class="textarea textarea-bordered w-full"
                        placeholder="Share your experience"
                        prop:value=draft
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    ></textarea>
                    {move || comment_error.get().map(|msg| view! { <p class="text-sm text-error">{msg}</p> })}
                    <button class="btn btn-primary btn-sm" disabled=move || busy.get()>"Post comment"</button>
                </form>

                {move || match comments.get() {
                    LoadState::Loading => view! { <span class="loading loading-dots"></span> }.into_any(),
                    LoadState::Failed(msg) => view! { <p class="text-error text-sm">{msg}</p> }.into_any(),
                    LoadState::Loaded(list) if list.is_empty() => {
                        view! { <p class="text-sm opacity-60">"No comments yet."</p> }.into_any()
                    }
                    LoadState::Loaded(list) => view! {
                        <ul class="space-y-3">
                            <For
                                each=move || list.clone()
                                key=|c| c.id
                                children=|comment| view! {
                                    <li class="border-b border-base-200 pb-2">
                                        <p class="text-sm font-semibold">
                                            {comment.author.unwrap_or_else(|| "Anonymous".to_string())}
                                        </p>
                                        <p>{comment.comment}</p>
                                        <p class="text-xs opacity-50">{comment.created_at.unwrap_or_default()}</p>
                                    </li>
                                }
                            />
                        </ul>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
