use chrono::NaiveDate;
use easyrent_shared::booking::{BookingQuote, format_npr};
use easyrent_shared::date::{RentalInterval, flexible_date};
use easyrent_shared::model::Vehicle;
use easyrent_shared::protocol::CreateBookingRequest;
use easyrent_shared::validate::{ValidationError, validate_booking_range};
use easyrent_shared::{Identity, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::components::payment::begin_checkout;
use crate::notify::use_notifier;

/// 校验所选日期并计算报价
fn quote_for(
    start: &str,
    end: &str,
    price_per_day: f64,
    today: NaiveDate,
    rentals: &[RentalInterval],
) -> Result<BookingQuote, ValidationError> {
    let start = flexible_date::parse(start).ok_or(ValidationError::Required("Start date"))?;
    let end = flexible_date::parse(end).ok_or(ValidationError::Required("End date"))?;
    validate_booking_range(start, end, today, rentals)?;
    BookingQuote::new(start, end, price_per_day).ok_or(ValidationError::DateOrder)
}

#[component]
pub fn BookingForm(
    vehicle: Vehicle,
    identity: Identity,
    #[prop(into)] rentals: Signal<Vec<RentalInterval>>,
    today: NaiveDate,
    /// 订单创建后刷新日历
    on_booked: Callback<()>,
) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let scope = use_page_scope();

    let identity = StoredValue::new(identity);
    let vehicle_id = vehicle.id;
    let price_per_day = vehicle.price_per_day;

    let start = RwSignal::new(String::new());
    let end = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let quote = move || {
        let (start, end) = (start.get(), end.get());
        if start.is_empty() || end.is_empty() {
            return None;
        }
        Some(rentals.with(|r| quote_for(&start, &end, price_per_day, today, r)))
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let quote = match rentals.with(|r| quote_for(&start.get(), &end.get(), price_per_day, today, r)) {
            Ok(quote) => quote,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let identity = identity.get_value();
        let api = auth.api_for(&identity);
        let req = CreateBookingRequest {
            vehicle_id,
            rent_start_date: quote.interval.start,
            rent_end_date: quote.interval.end,
            total_price: quote.total,
        };

        scope.spawn(async move { api.send(&req).await }, move |result| match result {
            Ok(created) => {
                notifier.success(
                    created
                        .message
                        .unwrap_or_else(|| "Booking created. Redirecting to Khalti...".to_string()),
                );
                on_booked.run(());
                begin_checkout(scope, auth, &identity, created.order_id, quote.total, move |msg| {
                    set_is_submitting.set(false);
                    set_error_msg.set(Some(format!(
                        "Your booking is saved but payment could not start: {msg}. You can pay later from My bookings."
                    )));
                });
            }
            Err(e) => {
                set_is_submitting.set(false);
                set_error_msg.set(Some(auth.describe_error(Role::User, &e)));
            }
        });
    };

    let min_date = today.format("%Y-%m-%d").to_string();

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body p-4 space-y-2">
                <h3 class="card-title">"Book this vehicle"</h3>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <div class="grid grid-cols-2 gap-2">
                    <label class="form-control">
                        <span class="label-text">"From"</span>
                        <input
                            type="date"
                            min=min_date.clone()
                            class="input input-bordered"
                            prop:value=start
                            on:input=move |ev| start.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"To"</span>
                        <input
                            type="date"
                            min=min_date
                            class="input input-bordered"
                            prop:value=end
                            on:input=move |ev| end.set(event_target_value(&ev))
                        />
                    </label>
                </div>

                {move || quote().map(|q| match q {
                    Ok(q) => view! {
                        <p class="text-sm">
                            {format!("{} day(s) × {} = ", q.days, format_npr(q.price_per_day))}
                            <span class="font-bold">{format_npr(q.total)}</span>
                        </p>
                    }
                    .into_any(),
                    Err(e) => view! { <p class="text-sm text-warning">{e.to_string()}</p> }.into_any(),
                })}

                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                    {move || if is_submitting.get() { "Booking..." } else { "Book & pay with Khalti" }}
                </button>
            </div>
        </form>
    }
}
