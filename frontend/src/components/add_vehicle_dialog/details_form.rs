//! 车辆信息表单组件
//!
//! 纯粹的表单输入渲染，职责单一。

use leptos::prelude::*;

use super::form_state::FormState;

const CATEGORIES: [&str; 5] = ["Car", "SUV", "Jeep", "Van", "Bike"];

#[component]
fn Field(
    id: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
    #[prop(default = "")] placeholder: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=id class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                placeholder=placeholder
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
                class="input input-bordered w-full"
            />
        </div>
    }
}

/// 车辆信息表单组件
#[component]
pub fn DetailsForm(state: FormState) -> impl IntoView {
    view! {
        <Field id="v_name" label="Vehicle name" value=state.name placeholder="Hyundai Creta" />

        <div class="grid grid-cols-2 gap-4">
            <div class="form-control">
                <label for="v_category" class="label">
                    <span class="label-text">"Type"</span>
                </label>
                <select
                    id="v_category"
                    class="select select-bordered w-full"
                    on:change=move |ev| state.category.set(event_target_value(&ev))
                    prop:value=move || state.category.get()
                >
                    {CATEGORIES
                        .into_iter()
                        .map(|c| view! { <option value=c>{c}</option> })
                        .collect_view()}
                </select>
            </div>
            <Field id="v_location" label="Location" value=state.location placeholder="Kathmandu" />
        </div>

        <div class="grid grid-cols-2 gap-4">
            <Field id="v_brand" label="Brand" value=state.brand placeholder="Hyundai" />
            <Field id="v_model" label="Model" value=state.model placeholder="2022" />
        </div>

        <div class="grid grid-cols-2 gap-4">
            <Field id="v_price" label="Price per day (NPR)" value=state.price_per_day kind="number" />
            <Field id="v_seats" label="Seats" value=state.seats kind="number" />
        </div>

        <div class="form-control">
            <label for="v_description" class="label">
                <span class="label-text">"Description"</span>
            </label>
            <textarea
                id="v_description"
                class="textarea textarea-bordered w-full"
                on:input=move |ev| state.description.set(event_target_value(&ev))
                prop:value=move || state.description.get()
            ></textarea>
        </div>
    }
}
