use easyrent_shared::booking::{EarningsSummary, format_npr};
use easyrent_shared::model::{Order, RevenueRecord, Vehicle};
use easyrent_shared::protocol::{
    DeleteVehicleRequest, OwnerBookingsRequest, OwnerRevenueRequest, OwnerVehiclesRequest,
};
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::components::account::ChangePasswordForm;
use crate::components::add_vehicle_dialog::AddVehicleDialog;
use crate::components::earnings::{EarningsStats, RevenueTable};
use crate::notify::use_notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Vehicles,
    Bookings,
    Earnings,
    Account,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Vehicles, Tab::Bookings, Tab::Earnings, Tab::Account];

    fn label(&self) -> &'static str {
        match self {
            Tab::Vehicles => "My vehicles",
            Tab::Bookings => "Bookings",
            Tab::Earnings => "Earnings",
            Tab::Account => "Account",
        }
    }
}

#[component]
pub fn OwnerDashboardPage(identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();
    let owner_id = StoredValue::new(identity.account_id.clone());
    let api = StoredValue::new(auth.api_for(&identity));
    let account = StoredValue::new(identity);

    let tab = RwSignal::new(Tab::Vehicles);
    let (vehicles, set_vehicles) = signal(LoadState::<Vec<Vehicle>>::Loading);
    let (orders, set_orders) = signal(LoadState::<Vec<Order>>::Loading);
    let (revenue, set_revenue) = signal(LoadState::<Vec<RevenueRecord>>::Loading);

    let load_vehicles = move || {
        let api = api.get_value();
        let owner_id = owner_id.get_value();
        scope.spawn(
            async move { api.send(&OwnerVehiclesRequest { owner_id }).await },
            move |result| set_vehicles.set(auth.load_state(Role::Owner, result)),
        );
    };

    let load_orders = move || {
        let api = api.get_value();
        let owner_id = owner_id.get_value();
        scope.spawn(
            async move { api.send(&OwnerBookingsRequest { owner_id }).await },
            move |result| set_orders.set(auth.load_state(Role::Owner, result)),
        );
    };

    let load_revenue = move || {
        let api = api.get_value();
        let owner_id = owner_id.get_value();
        scope.spawn(
            async move { api.send(&OwnerRevenueRequest { owner_id }).await },
            move |result| set_revenue.set(auth.load_state(Role::Owner, result)),
        );
    };

    // 初始加载
    load_vehicles();
    load_orders();
    load_revenue();

    let handle_delete = move |id: i64| {
        let api = api.get_value();
        scope.spawn(async move { api.send(&DeleteVehicleRequest { id }).await }, move |result| match result {
            Ok(_) => {
                notifier.success("Vehicle removed");
                set_vehicles.update(|state| {
                    if let Some(list) = state.data_mut() {
                        list.retain(|v| v.id != id);
                    }
                });
            }
            Err(e) => notifier.error(format!("Could not delete vehicle: {}", auth.describe_error(Role::Owner, &e))),
        });
    };

    let summary = Signal::derive(move || {
        revenue.with(|state| state.data().map(|r| EarningsSummary::from_records(r)).unwrap_or_default())
    });

    let vehicles_view = move || match vehicles.get() {
        LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
        LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
        LoadState::Loaded(list) if list.is_empty() => view! {
            <p class="text-center py-8 opacity-60">"You have not listed any vehicles yet."</p>
        }
        .into_any(),
        LoadState::Loaded(list) => view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Type"</th>
                        <th>"Location"</th>
                        <th>"Price / day"</th>
                        <th>"Rating"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.clone()
                        key=|v| v.id
                        children=move |vehicle| {
                            let id = vehicle.id;
                            view! {
                                <tr>
                                    <td class="font-semibold">{vehicle.name.clone()}</td>
                                    <td>{vehicle.category.clone().unwrap_or_default()}</td>
                                    <td>{vehicle.location.clone().unwrap_or_default()}</td>
                                    <td>{format_npr(vehicle.price_per_day)}</td>
                                    <td>{vehicle.rating_label()}</td>
                                    <td>
                                        <button class="btn btn-ghost btn-xs text-error" on:click=move |_| handle_delete(id)>
                                            "Delete"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        }
        .into_any(),
    };

    let orders_view = move || match orders.get() {
        LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
        LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
        LoadState::Loaded(list) if list.is_empty() => view! {
            <p class="text-center py-8 opacity-60">"No bookings on your vehicles yet."</p>
        }
        .into_any(),
        LoadState::Loaded(list) => view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Vehicle"</th>
                        <th>"Renter"</th>
                        <th>"Dates"</th>
                        <th>"Total"</th>
                        <th>"Payment"</th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.clone()
                        key=|o| o.id
                        children=|order| view! {
                            <tr>
                                <td>{order.vehicle_name.clone().unwrap_or_else(|| format!("#{}", order.vehicle_id))}</td>
                                <td>{order.user_name.clone().unwrap_or_default()}</td>
                                <td class="font-mono text-sm">
                                    {format!("{} → {}", order.interval.start, order.interval.end)}
                                </td>
                                <td>{format_npr(order.total_price)}</td>
                                <td>{order.payment_status.label()}</td>
                            </tr>
                        }
                    />
                </tbody>
            </table>
        }
        .into_any(),
    };

    let earnings_view = move || match revenue.get() {
        LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
        LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
        LoadState::Loaded(records) => view! { <RevenueTable records=records /> }.into_any(),
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-3xl font-bold">"Owner dashboard"</h1>
                <AddVehicleDialog identity=account.get_value() on_added=Callback::new(move |_: ()| load_vehicles()) />
            </div>

            <EarningsStats summary=summary highlight_owner=true />

            <div role="tablist" class="tabs tabs-boxed">
                {Tab::ALL
                    .into_iter()
                    .map(|t| view! {
                        <a
                            role="tab"
                            class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                            on:click=move |_| tab.set(t)
                        >
                            {t.label()}
                        </a>
                    })
                    .collect_view()}
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body overflow-x-auto">
                    {move || match tab.get() {
                        Tab::Vehicles => vehicles_view.into_any(),
                        Tab::Bookings => orders_view.into_any(),
                        Tab::Earnings => earnings_view.into_any(),
                        Tab::Account => view! { <ChangePasswordForm identity=account.get_value() /> }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}
