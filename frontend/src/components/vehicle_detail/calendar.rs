//! 可租日历
//!
//! 按月展示，已被租用的日期用区间匹配标出。

use chrono::{Datelike, NaiveDate};
use easyrent_shared::date::{RentalInterval, is_date_rented, month_grid, next_month, prev_month};
use leptos::prelude::*;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn cell_class(date: NaiveDate, today: NaiveDate, rented: bool) -> &'static str {
    if rented {
        "p-2 rounded bg-error/20 text-error line-through"
    } else if date < today {
        "p-2 rounded opacity-40"
    } else if date == today {
        "p-2 rounded ring ring-primary"
    } else {
        "p-2 rounded bg-success/10"
    }
}

#[component]
pub fn AvailabilityCalendar(
    /// 该车辆已被租用的区间
    #[prop(into)]
    rentals: Signal<Vec<RentalInterval>>,
    today: NaiveDate,
) -> impl IntoView {
    let month = RwSignal::new((today.year(), today.month()));

    let title = move || {
        let (year, m) = month.get();
        NaiveDate::from_ymd_opt(year, m, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default()
    };

    let cells = move || {
        let (year, m) = month.get();
        rentals.with(|rentals| {
            month_grid(year, m)
                .into_iter()
                .map(|cell| match cell {
                    None => view! { <div></div> }.into_any(),
                    Some(date) => {
                        let class = cell_class(date, today, is_date_rented(date, rentals));
                        view! { <div class=class>{date.day()}</div> }.into_any()
                    }
                })
                .collect_view()
        })
    };

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4">
                <div class="flex items-center justify-between">
                    <button
                        class="btn btn-ghost btn-sm"
                        on:click=move |_| month.update(|(y, m)| (*y, *m) = prev_month(*y, *m))
                    >
                        "‹"
                    </button>
                    <h3 class="font-semibold">{title}</h3>
                    <button
                        class="btn btn-ghost btn-sm"
                        on:click=move |_| month.update(|(y, m)| (*y, *m) = next_month(*y, *m))
                    >
                        "›"
                    </button>
                </div>
                <div class="grid grid-cols-7 gap-1 text-center text-sm">
                    {WEEKDAYS
                        .into_iter()
                        .map(|d| view! { <div class="font-bold opacity-60">{d}</div> })
                        .collect_view()}
                    {cells}
                </div>
                <div class="flex gap-4 text-xs mt-2">
                    <span class="flex items-center gap-1">
                        <span class="w-3 h-3 rounded bg-error/20"></span> "Booked"
                    </span>
                    <span class="flex items-center gap-1">
                        <span class="w-3 h-3 rounded bg-success/10"></span> "Available"
                    </span>
                </div>
            </div>
        </div>
    }
}
