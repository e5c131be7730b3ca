//! 管理员面板
//!
//! 全站收入、用户、车主和车辆管理。

use easyrent_shared::booking::{EarningsSummary, format_npr};
use easyrent_shared::model::{AccountRecord, RecordId, RevenueRecord, Vehicle};
use easyrent_shared::protocol::{
    AdminRevenueRequest, DeleteAccountRequest, DeleteVehicleRequest, ListAccountsRequest,
    ListVehiclesRequest,
};
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::{Api, use_auth};
use crate::components::earnings::{EarningsStats, RevenueTable};
use crate::notify::use_notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Revenue,
    Users,
    Owners,
    Vehicles,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Revenue, Tab::Users, Tab::Owners, Tab::Vehicles];

    fn label(&self) -> &'static str {
        match self {
            Tab::Revenue => "Revenue",
            Tab::Users => "Users",
            Tab::Owners => "Owners",
            Tab::Vehicles => "Vehicles",
        }
    }
}

#[component]
pub fn AdminDashboardPage(identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();
    let api = StoredValue::new(auth.api_for(&identity));

    let tab = RwSignal::new(Tab::Revenue);
    let (revenue, set_revenue) = signal(LoadState::<Vec<RevenueRecord>>::Loading);

    scope.spawn(
        {
            let api = api.get_value();
            async move { api.send(&AdminRevenueRequest).await }
        },
        move |result| set_revenue.set(auth.load_state(Role::Admin, result)),
    );

    let summary = Signal::derive(move || {
        revenue.with(|state| state.data().map(|r| EarningsSummary::from_records(r)).unwrap_or_default())
    });

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <h1 class="text-3xl font-bold">"Administration"</h1>

            <EarningsStats summary=summary highlight_owner=false />

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
                        Tab::Revenue => match revenue.get() {
                            LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
                            LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
                            LoadState::Loaded(records) => view! { <RevenueTable records=records /> }.into_any(),
                        },
                        Tab::Users => view! { <AccountsPanel api=api.get_value() role=Role::User /> }.into_any(),
                        Tab::Owners => view! { <AccountsPanel api=api.get_value() role=Role::Owner /> }.into_any(),
                        Tab::Vehicles => view! { <VehiclesPanel api=api.get_value() /> }.into_any(),
                    }}
                </div>
            </div>
        </div>
    }
}

/// 用户或车主列表
#[component]
fn AccountsPanel(api: Api, role: Role) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();
    let api = StoredValue::new(api);

    let (accounts, set_accounts) = signal(LoadState::<Vec<AccountRecord>>::Loading);

    scope.spawn(
        {
            let api = api.get_value();
            async move { api.send(&ListAccountsRequest { role }).await }
        },
        move |result| set_accounts.set(auth.load_state(Role::Admin, result)),
    );

    let handle_delete = move |id: RecordId| {
        let api = api.get_value();
        scope.spawn(
            async move { api.send(&DeleteAccountRequest { role, id }).await },
            move |result| match result {
                Ok(_) => {
                    notifier.success(format!("Deleted {role} #{id}"));
                    set_accounts.update(|state| {
                        if let Some(list) = state.data_mut() {
                            list.retain(|a| a.id != id);
                        }
                    });
                }
                Err(e) => notifier.error(auth.describe_error(Role::Admin, &e)),
            },
        );
    };

    move || match accounts.get() {
        LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
        LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
        LoadState::Loaded(list) if list.is_empty() => {
            view! { <p class="text-center py-8 opacity-60">{format!("No {role}s registered.")}</p> }.into_any()
        }
        LoadState::Loaded(list) => view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Phone"</th>
                        <th>"Address"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=move || list.clone()
                        key=|a| a.id
                        children=move |account| {
                            let id = account.id;
                            view! {
                                <tr>
                                    <td class="font-mono">{id}</td>
                                    <td>{account.name}</td>
                                    <td>{account.email}</td>
                                    <td>{account.phone.unwrap_or_default()}</td>
                                    <td>{account.address.unwrap_or_default()}</td>
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
    }
}

/// 全站车辆
#[component]
fn VehiclesPanel(api: Api) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();
    let api = StoredValue::new(api);

    let (vehicles, set_vehicles) = signal(LoadState::<Vec<Vehicle>>::Loading);

    scope.spawn(
        {
            let api = api.get_value();
            async move { api.send(&ListVehiclesRequest).await }
        },
        move |result| set_vehicles.set(auth.load_state(Role::Admin, result)),
    );

    let handle_delete = move |id: RecordId| {
        let api = api.get_value();
        scope.spawn(
            async move { api.send(&DeleteVehicleRequest { id }).await },
            move |result| match result {
                Ok(_) => {
                    notifier.success("Vehicle removed");
                    set_vehicles.update(|state| {
                        if let Some(list) = state.data_mut() {
                            list.retain(|v| v.id != id);
                        }
                    });
                }
                Err(e) => notifier.error(auth.describe_error(Role::Admin, &e)),
            },
        );
    };

    move || match vehicles.get() {
        LoadState::Loading => view! { <span class="loading loading-spinner loading-md"></span> }.into_any(),
        LoadState::Failed(msg) => view! { <p class="text-error">{msg}</p> }.into_any(),
        LoadState::Loaded(list) => view! {
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Owner"</th>
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
                                    <td class="font-mono">
                                        {vehicle.owner_id.map(|o| format!("#{o}")).unwrap_or_default()}
                                    </td>
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
    }
}
