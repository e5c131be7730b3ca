use easyrent_shared::booking::{EarningsSummary, format_npr};
use easyrent_shared::model::RevenueRecord;
use leptos::prelude::*;

/// 收入统计卡片
#[component]
pub fn EarningsStats(
    #[prop(into)] summary: Signal<EarningsSummary>,
    /// 车主视角突出车主收入，管理员视角突出平台抽成
    highlight_owner: bool,
) -> impl IntoView {
    let primary = move || {
        let s = summary.get();
        if highlight_owner { s.owner_earning } else { s.admin_earning }
    };
    let primary_title = if highlight_owner { "Your earnings" } else { "Platform commission" };

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Paid orders"</div>
                <div class="stat-value">{move || summary.get().orders}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Gross revenue"</div>
                <div class="stat-value text-2xl">{move || format_npr(summary.get().gross)}</div>
            </div>
            <div class="stat">
                <div class="stat-title">{primary_title}</div>
                <div class="stat-value text-primary text-2xl">{move || format_npr(primary())}</div>
                <div class="stat-desc">
                    {move || format!("Commission {:.1}%", summary.get().commission_percent())}
                </div>
            </div>
        </div>
    }
}

/// 单笔收入明细
#[component]
pub fn RevenueTable(records: Vec<RevenueRecord>) -> impl IntoView {
    if records.is_empty() {
        return view! { <p class="text-center py-8 opacity-60">"No revenue recorded yet."</p> }.into_any();
    }

    view! {
        <div class="overflow-x-auto">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"Order"</th>
                        <th>"Vehicle"</th>
                        <th>"Total"</th>
                        <th>"Owner"</th>
                        <th>"Commission"</th>
                    </tr>
                </thead>
                <tbody>
                    {records
                        .into_iter()
                        .map(|r| view! {
                            <tr>
                                <td class="font-mono">{format!("#{}", r.id)}</td>
                                <td>{r.vehicle_name.unwrap_or_default()}</td>
                                <td>{format_npr(r.total_amount)}</td>
                                <td>{format_npr(r.owner_earning)}</td>
                                <td>{format_npr(r.admin_earning)}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}
