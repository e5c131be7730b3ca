use easyrent_shared::protocol::ChangePasswordRequest;
use easyrent_shared::validate::validate_password_change;
use easyrent_shared::{ApiError, Identity};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::notify::use_notifier;

/// 修改密码表单，用户和车主共用
#[component]
pub fn ChangePasswordForm(identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();
    let identity = StoredValue::new(identity);

    let current = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Err(e) = validate_password_change(&current.get(), &new_password.get(), &confirm.get()) {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let (api, req, role) = identity.with_value(|id| {
            (
                auth.api_for(id),
                ChangePasswordRequest {
                    role: id.role,
                    account_id: id.account_id.clone(),
                    current_password: current.get(),
                    new_password: new_password.get(),
                },
                id.role,
            )
        });

        scope.spawn(async move { api.send(&req).await }, move |result| {
            set_is_submitting.set(false);
            match result {
                Ok(ack) => {
                    notifier.success(ack.message.unwrap_or_else(|| "Password updated".to_string()));
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                // 401/403 在这里表示当前密码不对，会话保持不变，表单保留
                Err(e @ ApiError::Unauthorized(_)) => set_error_msg.set(Some(e.server_message())),
                Err(e) => set_error_msg.set(Some(auth.describe_error(role, &e))),
            }
        });
    };

    let field = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="form-control">
                <span class="label-text">{label}</span>
                <input
                    type="password"
                    class="input input-bordered"
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <form class="card bg-base-100 shadow max-w-md" on:submit=on_submit>
            <div class="card-body space-y-2">
                <h2 class="card-title">"Change password"</h2>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>
                {field("Current password", current)}
                {field("New password", new_password)}
                {field("Confirm new password", confirm)}
                <button class="btn btn-primary mt-2" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Saving..." } else { "Update password" }}
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn AccountPage(identity: Identity) -> impl IntoView {
    let name = identity.display_name();
    let email = identity.email.clone().unwrap_or_default();

    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8 space-y-6">
            <div>
                <h1 class="text-3xl font-bold">{name}</h1>
                <p class="opacity-70">{email}</p>
            </div>
            <ChangePasswordForm identity=identity />
        </div>
    }
}
