use easyrent_shared::Role;
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 顶部导航栏，按当前登录的角色显示入口
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let identity = Memo::new(move |_| auth.identity());

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl">
                    "Easy Rent Nepal"
                </Link>
            </div>
            <div class="flex-none gap-2">
                {move || match identity.get() {
                    None => view! {
                        <Link to=AppRoute::Login(Role::User) class="btn btn-ghost btn-sm">"Login"</Link>
                        <Link to=AppRoute::Register(Role::User) class="btn btn-primary btn-sm">"Sign up"</Link>
                        <Link to=AppRoute::Login(Role::Owner) class="btn btn-ghost btn-sm">"For owners"</Link>
                    }
                    .into_any(),
                    Some(identity) => {
                        let role = identity.role;
                        let links = match role {
                            Role::User => view! {
                                <Link to=AppRoute::MyBookings class="btn btn-ghost btn-sm">"My bookings"</Link>
                                <Link to=AppRoute::Account class="btn btn-ghost btn-sm">"Account"</Link>
                            }
                            .into_any(),
                            Role::Owner => view! {
                                <Link to=AppRoute::OwnerDashboard class="btn btn-ghost btn-sm">"Dashboard"</Link>
                            }
                            .into_any(),
                            Role::Admin => view! {
                                <Link to=AppRoute::AdminDashboard class="btn btn-ghost btn-sm">"Admin"</Link>
                            }
                            .into_any(),
                        };
                        view! {
                            {links}
                            <span class="badge badge-neutral hidden md:inline-flex">
                                {identity.display_name()}
                            </span>
                            <button
                                class="btn btn-outline btn-error btn-sm"
                                on:click=move |_| auth.logout(role)
                            >
                                "Logout"
                            </button>
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}
