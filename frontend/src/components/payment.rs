//! Khalti 支付
//!
//! 发起：后端创建支付并返回 `payment_url`，浏览器整页跳转到 Khalti。
//! 回跳：Khalti 带着 `pidx` 回到 `/payment/verify`，由后端查询最终状态。

use easyrent_shared::booking::to_paisa;
use easyrent_shared::model::RecordId;
use easyrent_shared::protocol::{InitiatePaymentRequest, PaymentVerification, VerifyPaymentRequest};
use easyrent_shared::{Identity, LoadState, Role};
use leptos::prelude::*;

use crate::api::{PageScope, use_page_scope};
use crate::auth::{AuthContext, use_auth};
use crate::web::location;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 为订单发起 Khalti 支付，成功时离开当前页面
///
/// `total` 以卢比计，发送给后端时换算为 paisa。
pub fn begin_checkout(
    scope: PageScope,
    auth: AuthContext,
    identity: &Identity,
    order_id: RecordId,
    total: f64,
    on_failed: impl FnOnce(String) + 'static,
) {
    let origin = location::origin();
    let req = InitiatePaymentRequest {
        order_id,
        amount: to_paisa(total),
        return_url: format!("{origin}{}", AppRoute::PaymentVerify(None).to_path()),
        website_url: origin,
    };
    let api = auth.api_for(identity);
    let role = identity.role;

    scope.spawn(async move { api.send(&req).await }, move |result| match result {
        Ok(checkout) => {
            log::info!("[Payment] order {order_id} checkout started ({})", checkout.pidx);
            if !location::redirect_to(&checkout.payment_url) {
                on_failed("Could not open the Khalti payment page.".to_string());
            }
        }
        Err(e) => on_failed(auth.describe_error(role, &e)),
    });
}

/// Khalti 回跳页
///
/// `pidx` 来自路由，仍是查询串中的编码形式。
#[component]
pub fn PaymentVerifyPage(pidx: Option<String>, identity: Identity) -> impl IntoView {
    let auth = use_auth();
    let scope = use_page_scope();

    let (state, set_state) = signal(LoadState::<PaymentVerification>::Loading);

    match pidx.map(|raw| location::decode_query_value(&raw)) {
        Some(pidx) => {
            let api = auth.api_for(&identity);
            scope.spawn(
                async move { api.send(&VerifyPaymentRequest { pidx }).await },
                move |result| set_state.set(auth.load_state(Role::User, result)),
            );
        }
        None => set_state.set(LoadState::Failed("Missing payment reference.".to_string())),
    }

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content">
                <div class="card w-full max-w-md bg-base-100 shadow-xl">
                    <div class="card-body items-center text-center">
                        {move || match state.get() {
                            LoadState::Loading => view! {
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                                <p>"Confirming your payment with Khalti..."</p>
                            }
                            .into_any(),
                            LoadState::Failed(msg) => view! {
                                <h2 class="card-title text-error">"Payment could not be verified"</h2>
                                <p>{msg}</p>
                            }
                            .into_any(),
                            LoadState::Loaded(result) if result.is_completed() => view! {
                                <h2 class="card-title text-success">"Payment successful"</h2>
                                <p>
                                    {result
                                        .transaction_id
                                        .map(|id| format!("Transaction ID: {id}"))
                                        .unwrap_or_default()}
                                </p>
                            }
                            .into_any(),
                            LoadState::Loaded(result) => view! {
                                <h2 class="card-title text-warning">
                                    {format!("Payment {}", result.status.to_lowercase())}
                                </h2>
                                <p>
                                    {result
                                        .message
                                        .unwrap_or_else(|| "You can retry from your bookings.".to_string())}
                                </p>
                            }
                            .into_any(),
                        }}
                        <div class="card-actions mt-4">
                            <Link to=AppRoute::MyBookings class="btn btn-primary">"My bookings"</Link>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
