use easyrent_shared::LoadState;
use easyrent_shared::booking::format_npr;
use easyrent_shared::model::Vehicle;
use easyrent_shared::protocol::ListVehiclesRequest;
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 公开的车辆列表
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();

    let (vehicles, set_vehicles) = signal(LoadState::<Vec<Vehicle>>::Loading);
    let (query, set_query) = signal(String::new());

    let load_vehicles = move || {
        let api = auth.public_api();
        set_vehicles.set(LoadState::Loading);
        scope.spawn(async move { api.send(&ListVehiclesRequest).await }, move |result| {
            set_vehicles.set(LoadState::from_result(result));
        });
    };

    // 初始加载
    load_vehicles();

    let filtered = move || {
        let query = query.get();
        vehicles.with(|state| {
            state
                .data()
                .map(|list| list.iter().filter(|v| v.matches(&query)).cloned().collect::<Vec<_>>())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="hero bg-base-100 rounded-box shadow-xl">
                <div class="hero-content text-center py-10">
                    <div class="max-w-xl">
                        <h1 class="text-4xl font-bold">"Rent a ride anywhere in Nepal"</h1>
                        <p class="py-4 text-base-content/70">
                            "Cars, jeeps and bikes from trusted local owners."
                        </p>
                        <input
                            type="search"
                            placeholder="Search by name, type, brand or city"
                            class="input input-bordered w-full"
                            prop:value=query
                            on:input=move |ev| set_query.set(event_target_value(&ev))
                        />
                    </div>
                </div>
            </div>

            {move || match vehicles.get() {
                LoadState::Loading => view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any(),
                LoadState::Failed(msg) => view! {
                    <div role="alert" class="alert alert-error">
                        <span>{format!("Could not load vehicles: {msg}")}</span>
                        <button class="btn btn-sm" on:click=move |_| load_vehicles()>"Retry"</button>
                    </div>
                }
                .into_any(),
                LoadState::Loaded(_) => view! {
                    <Show
                        when=move || !filtered().is_empty()
                        fallback=|| view! {
                            <p class="text-center py-16 text-base-content/50">"No vehicles match your search."</p>
                        }
                    >
                        <div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            <For
                                each=filtered
                                key=|v| v.id
                                children=move |vehicle| view! { <VehicleCard vehicle=vehicle /> }
                            />
                        </div>
                    </Show>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
fn VehicleCard(vehicle: Vehicle) -> impl IntoView {
    let auth = use_auth();
    let image = vehicle.image.as_deref().map(|path| auth.public_api().asset_url(path));
    let subtitle = [vehicle.category.clone(), vehicle.location.clone()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" · ");

    view! {
        <div class="card bg-base-100 shadow-xl">
            {image.map(|src| view! {
                <figure class="h-48 overflow-hidden">
                    <img src=src alt=vehicle.name.clone() class="w-full object-cover" />
                </figure>
            })}
            <div class="card-body">
                <h2 class="card-title">{vehicle.name.clone()}</h2>
                <p class="text-sm text-base-content/70">{subtitle}</p>
                <div class="flex items-center justify-between">
                    <span class="font-bold text-primary">
                        {format_npr(vehicle.price_per_day)} " / day"
                    </span>
                    <span class="badge badge-outline">{vehicle.rating_label()}</span>
                </div>
                <div class="card-actions justify-end">
                    <Link to=AppRoute::VehicleDetail(vehicle.id) class="btn btn-primary btn-sm">
                        "View & book"
                    </Link>
                </div>
            </div>
        </div>
    }
}
