use easyrent_shared::Role;
use easyrent_shared::protocol::RegisterRequest;
use easyrent_shared::validate::{
    ValidationError, require, validate_email, validate_password, validate_password_confirmation,
    validate_phone,
};
use leptos::prelude::*;

use crate::api::use_page_scope;
use crate::auth::use_auth;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 注册表单的字段
#[derive(Clone, Copy)]
struct RegisterForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    address: RwSignal<String>,
    password: RwSignal<String>,
    confirm: RwSignal<String>,
}

impl RegisterForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm: RwSignal::new(String::new()),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name.get())?;
        validate_email(&self.email.get())?;
        validate_phone(&self.phone.get())?;
        validate_password(&self.password.get())?;
        validate_password_confirmation(&self.password.get(), &self.confirm.get())
    }

    fn to_request(&self, role: Role) -> RegisterRequest {
        let address = self.address.get().trim().to_string();
        RegisterRequest {
            role,
            name: self.name.get().trim().to_string(),
            email: self.email.get().trim().to_string(),
            phone: self.phone.get().trim().to_string(),
            password: self.password.get(),
            address: (!address.is_empty()).then_some(address),
        }
    }
}

#[component]
fn TextField(
    label: &'static str,
    value: RwSignal<String>,
    #[prop(default = "text")] kind: &'static str,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=kind
                class="input input-bordered"
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </div>
    }
}

#[component]
pub fn RegisterPage(role: Role) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let scope = use_page_scope();

    let form = RegisterForm::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if let Err(e) = form.validate() {
            set_error_msg.set(Some(e.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = auth.public_api();
        let req = form.to_request(role);
        scope.spawn(async move { api.send(&req).await }, move |result| {
            set_is_submitting.set(false);
            match result {
                Ok(ack) => {
                    notifier.success(
                        ack.message
                            .unwrap_or_else(|| "Registration successful. Please sign in.".to_string()),
                    );
                    router.go(AppRoute::Login(role));
                }
                // 保留表单内容，方便修改后重试
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
        });
    };

    let title = match role {
        Role::Owner => "List your vehicles",
        _ => "Create your account",
    };

    view! {
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <h1 class="text-3xl font-bold">{title}</h1>
                <div class="card w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <TextField label="Full name" value=form.name />
                        <TextField label="Email" value=form.email kind="email" />
                        <TextField label="Mobile number" value=form.phone kind="tel" />
                        <TextField label="Address" value=form.address />
                        <TextField label="Password" value=form.password kind="password" />
                        <TextField label="Confirm password" value=form.confirm kind="password" />

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login(role) class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
