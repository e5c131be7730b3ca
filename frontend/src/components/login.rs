use easyrent_shared::Role;
use easyrent_shared::validate::{require, validate_email};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{login, use_auth};
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

fn heading(role: Role) -> &'static str {
    match role {
        Role::User => "Welcome back",
        Role::Owner => "Owner sign in",
        Role::Admin => "Administrator sign in",
    }
}

#[component]
pub fn LoginPage(role: Role) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());

        if let Err(e) = validate_email(&email).and_then(|_| require("Password", &password)) {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(auth, role, email, password).await {
                Ok(identity) => {
                    notifier.success(format!("Signed in as {}", identity.display_name()));
                    router.finish_login(role);
                }
                Err(msg) => {
                    set_error_msg.set(Some(msg));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">{heading(role)}</h1>
                    <p class="text-base-content/70">"Sign in to continue to Easy Rent Nepal"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>

                        {(role != Role::Admin).then(|| view! {
                            <p class="text-sm text-center mt-2">
                                "No account yet? "
                                <Link to=AppRoute::Register(role) class="link link-primary">"Register"</Link>
                            </p>
                        })}
                    </form>
                </div>
            </div>
        </div>
    }
}
