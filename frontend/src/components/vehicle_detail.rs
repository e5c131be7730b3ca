//! 车辆详情页
//!
//! 组合车辆信息、可租日历、预订表单和评价四个部分。

mod booking_form;
mod calendar;
mod reviews;

use booking_form::BookingForm;
use calendar::AvailabilityCalendar;
use reviews::Reviews;

use easyrent_shared::booking::format_npr;
use easyrent_shared::date::{Clock, RentalInterval};
use easyrent_shared::model::{RecordId, Vehicle};
use easyrent_shared::protocol::{GetVehicleRequest, VehicleRentalsRequest};
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;

#[component]
pub fn VehicleDetailPage(vehicle_id: RecordId, identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();
    let today = auth.session.clock().today();
    let api = StoredValue::new(auth.api_for(&identity));

    let (vehicle, set_vehicle) = signal(LoadState::<Vehicle>::Loading);
    let (rentals, set_rentals) = signal(Vec::<RentalInterval>::new());
    let (rentals_error, set_rentals_error) = signal(Option::<String>::None);

    let load_vehicle = move || {
        let api = api.get_value();
        scope.spawn(
            async move { api.send(&GetVehicleRequest { id: vehicle_id }).await },
            move |result| set_vehicle.set(auth.load_state(Role::User, result)),
        );
    };

    let load_rentals = move || {
        let api = api.get_value();
        scope.spawn(
            async move { api.send(&VehicleRentalsRequest { vehicle_id }).await },
            move |result| match result {
                Ok(list) => {
                    set_rentals_error.set(None);
                    set_rentals.set(list);
                }
                Err(e) => set_rentals_error.set(Some(auth.describe_error(Role::User, &e))),
            },
        );
    };

    // 初始加载
    load_vehicle();
    load_rentals();

    let on_booked = Callback::new(move |_: ()| load_rentals());
    // 只刷新评分，避免重建表单
    let (rating, set_rating) = signal(Option::<String>::None);
    let on_rated = Callback::new(move |_: ()| {
        let api = api.get_value();
        scope.spawn(
            async move { api.send(&GetVehicleRequest { id: vehicle_id }).await },
            move |result| {
                if let Ok(updated) = result {
                    set_rating.set(Some(updated.rating_label()));
                }
            },
        );
    });
    let identity = StoredValue::new(identity);

    view! {
        <div class="max-w-6xl mx-auto p-4 md:p-8">
            {move || match vehicle.get() {
                LoadState::Loading => view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any(),
                LoadState::Failed(msg) => view! {
                    <div role="alert" class="alert alert-error">
                        <span>{format!("Could not load this vehicle: {msg}")}</span>
                        <button class="btn btn-sm" on:click=move |_| load_vehicle()>"Retry"</button>
                    </div>
                }
                .into_any(),
                LoadState::Loaded(vehicle) => {
                    let image = vehicle.image.as_deref().map(|p| api.with_value(|api| api.asset_url(p)));
                    let details = [
                        ("Type", vehicle.category.clone()),
                        ("Brand", vehicle.brand.clone()),
                        ("Model", vehicle.model.clone()),
                        ("Location", vehicle.location.clone()),
                        ("Seats", vehicle.seats.map(|s| s.to_string())),
                    ];
                    view! {
                        <div class="grid gap-6 lg:grid-cols-3">
                            <div class="lg:col-span-2 space-y-6">
                                <div class="card bg-base-100 shadow-xl">
                                    {image.map(|src| view! {
                                        <figure class="max-h-96 overflow-hidden">
                                            <img src=src alt=vehicle.name.clone() class="w-full object-cover" />
                                        </figure>
                                    })}
                                    <div class="card-body">
                                        <h1 class="card-title text-3xl">{vehicle.name.clone()}</h1>
                                        <div class="flex gap-4 items-center">
                                            <span class="text-xl font-bold text-primary">
                                                {format_npr(vehicle.price_per_day)} " / day"
                                            </span>
                                            <span class="badge badge-outline">
                                                {
                                                    let initial = vehicle.rating_label();
                                                    move || rating.get().unwrap_or_else(|| initial.clone())
                                                }
                                            </span>
                                        </div>
                                        <dl class="grid grid-cols-2 gap-2 text-sm">
                                            {details
                                                .into_iter()
                                                .filter_map(|(label, value)| value.map(|v| view! {
                                                    <dt class="opacity-60">{label}</dt>
                                                    <dd>{v}</dd>
                                                }))
                                                .collect_view()}
                                        </dl>
                                        <p>{vehicle.description.clone().unwrap_or_default()}</p>
                                    </div>
                                </div>
                                <Reviews
                                    vehicle_id=vehicle.id
                                    identity=identity.get_value()
                                    on_rated=on_rated
                                />
                            </div>
                            <div class="space-y-6">
                                <AvailabilityCalendar rentals=rentals today=today />
                                {move || rentals_error.get().map(|msg| view! {
                                    <p class="text-sm text-error">{format!("Availability unavailable: {msg}")}</p>
                                })}
                                <BookingForm
                                    vehicle=vehicle.clone()
                                    identity=identity.get_value()
                                    rentals=rentals
                                    today=today
                                    on_booked=on_booked
                                />
                            </div>
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
