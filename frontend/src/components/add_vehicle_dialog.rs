//! 添加车辆对话框
//!
//! 表单校验通过后读取图片，以 multipart 上传到后端。

mod details_form;
mod form_state;

use details_form::DetailsForm;
use form_state::FormState;

use easyrent_shared::protocol::CreateVehicleRequest;
use easyrent_shared::{Identity, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::web::file::read_selected_file;

#[component]
pub fn AddVehicleDialog(
    identity: Identity,
    /// 车辆添加成功后回调
    #[prop(into)]
    on_added: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();
    let identity = StoredValue::new(identity);

    let (open, set_open) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();
    let file_ref = NodeRef::<leptos::html::Input>::new();

    let state = FormState::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();

        let draft = match state.snapshot().to_draft() {
            Ok(draft) => draft,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_loading.set(true);
        set_error_msg.set(None);
        let input = file_ref.get();

        spawn_local(async move {
            let image = match input {
                Some(input) => match read_selected_file(&input).await {
                    Ok(image) => image,
                    Err(e) => {
                        set_loading.set(false);
                        set_error_msg.set(Some(e));
                        return;
                    }
                },
                None => None,
            };

            let api = identity.with_value(|id| auth.api_for(id));
            let req = CreateVehicleRequest { draft, image };
            scope.spawn(async move { api.send(&req).await }, move |result| {
                set_loading.set(false);
                match result {
                    Ok(_) => {
                        on_added.run(());
                        set_open.set(false);
                        state.reset();
                        if let Some(input) = file_ref.get() {
                            input.set_value("");
                        }
                    }
                    // 保留表单，方便修改后重试
                    Err(e) => set_error_msg.set(Some(auth.describe_error(Role::Owner, &e))),
                }
            });
        });
    };

    view! {
        // 触发按钮
        <button class="btn btn-primary gap-2" on:click=move |_| set_open.set(true)>
            "+ Add vehicle"
        </button>

        // 模态框内容
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Add a new vehicle"</h3>
                <p class="py-2 text-base-content/70">"Renters will see these details in the catalogue."</p>

                <form on:submit=on_submit class="space-y-4">
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>

                    <DetailsForm state=state />

                    <div class="form-control">
                        <label for="v_image" class="label">
                            <span class="label-text">"Photo"</span>
                        </label>
                        <input
                            id="v_image"
                            type="file"
                            accept="image/*"
                            node_ref=file_ref
                            class="file-input file-input-bordered w-full"
                        />
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary" disabled=move || loading.get()>
                            {move || if loading.get() { "Saving..." } else { "Save vehicle" }}
                        </button>
                    </div>
                </form>
            </div>
        </dialog>
    }
}
