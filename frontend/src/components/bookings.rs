use easyrent_shared::booking::format_npr;
use easyrent_shared::model::{Order, PaymentStatus};
use easyrent_shared::protocol::UserBookingsRequest;
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::components::payment::begin_checkout;

fn status_badge(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "badge badge-success",
        PaymentStatus::Pending => "badge badge-warning",
        PaymentStatus::Failed => "badge badge-error",
        PaymentStatus::Unknown => "badge badge-ghost",
    }
}

/// 用户的订单列表
#[component]
pub fn MyBookingsPage(identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();
    let identity = StoredValue::new(identity);

    let (orders, set_orders) = signal(LoadState::<Vec<Order>>::Loading);
    let (pay_error, set_pay_error) = signal(Option::<String>::None);
    let (paying, set_paying) = signal(Option::<i64>::None);

    let load_orders = move || {
        let (api, user_id) = identity.with_value(|id| (auth.api_for(id), id.account_id.clone()));
        set_orders.set(LoadState::Loading);
        scope.spawn(
            async move { api.send(&UserBookingsRequest { user_id }).await },
            move |result| set_orders.set(auth.load_state(Role::User, result)),
        );
    };

    load_orders();

    let pay = move |order: &Order| {
        set_pay_error.set(None);
        set_paying.set(Some(order.id));
        identity.with_value(|id| {
            begin_checkout(scope, auth, id, order.id, order.total_price, move |msg| {
                set_paying.set(None);
                set_pay_error.set(Some(msg));
            })
        });
    };

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"My bookings"</h1>
                <button class="btn btn-ghost btn-sm" on:click=move |_| load_orders()>"Refresh"</button>
            </div>

            {move || pay_error.get().map(|msg| view! {
                <div role="alert" class="alert alert-error"><span>{msg}</span></div>
            })}

            {move || match orders.get() {
                LoadState::Loading => view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any(),
                LoadState::Failed(msg) => view! {
                    <div role="alert" class="alert alert-error"><span>{msg}</span></div>
                }
                .into_any(),
                LoadState::Loaded(list) if list.is_empty() => view! {
                    <p class="text-center py-16 opacity-60">"You have no bookings yet."</p>
                }
                .into_any(),
                LoadState::Loaded(list) => view! {
                    <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Vehicle"</th>
                                    <th>"Dates"</th>
                                    <th>"Total"</th>
                                    <th>"Payment"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || list.clone()
                                    key=|o| o.id
                                    children=move |order| {
                                        let order_id = order.id;
                                        let pending = !order.is_paid();
                                        let interval = order.interval;
                                        let checkout = order.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    {order
                                                        .vehicle_name
                                                        .clone()
                                                        .unwrap_or_else(|| format!("Vehicle #{}", order.vehicle_id))}
                                                </td>
                                                <td class="font-mono text-sm">
                                                    {format!(
                                                        "{} → {} ({} days)",
                                                        interval.start,
                                                        interval.end,
                                                        interval.days()
                                                    )}
                                                </td>
                                                <td>{format_npr(order.total_price)}</td>
                                                <td>
                                                    <span class=status_badge(order.payment_status)>
                                                        {order.payment_status.label()}
                                                    </span>
                                                </td>
                                                <td>
                                                    {pending.then(move || view! {
                                                        <button
                                                            class="btn btn-primary btn-xs"
                                                            disabled=move || paying.get() == Some(order_id)
                                                            on:click=move |_| pay(&checkout)
                                                        >
                                                            "Pay with Khalti"
                                                        </button>
                                                    })}
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
