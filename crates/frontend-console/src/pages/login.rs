use panel_core::api::{LoginOutcome, LoginRequest};
use panel_core::Notice;
use panel_frontend_common::{use_console, use_notices, FrontendConfig, NoticeAction, Spinner};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let console = use_console();
    let notices = use_notices();

    let username = {
        let console = console.clone();
        use_state(move || {
            console
                .cookies()
                .get(FrontendConfig::USERNAME_COOKIE)
                .unwrap_or_default()
        })
    };
    let password = use_state(String::new);
    let error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);

    let on_username_input = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            username.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let request = LoginRequest {
                username: (*username).clone(),
                password: (*password).clone(),
            };
            if request.username.is_empty() || request.password.is_empty() {
                error.set(Some("Please enter your username and password.".to_string()));
                return;
            }

            submitting.set(true);
            error.set(None);
            let console = console.clone();
            let notices = notices.clone();
            let error = error.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                let outcome = console.client().login(&request).await;
                submitting.set(false);
                let notice = match outcome {
                    Ok(LoginOutcome::LoggedIn { .. }) => None,
                    Ok(LoginOutcome::LoggedInWeakPassword { message }) => Some(Notice::warning(message)),
                    Ok(LoginOutcome::Rejected { message }) => {
                        error.set(Some(if message.is_empty() {
                            "Login failed.".to_string()
                        } else {
                            message
                        }));
                        return;
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "login request failed");
                        error.set(Some(err.to_string()));
                        return;
                    }
                };

                if let Err(err) = console
                    .cookies()
                    .set(FrontendConfig::USERNAME_COOKIE, &request.username)
                {
                    tracing::debug!(error = %err, "could not remember username");
                }
                notices.dispatch(NoticeAction::ClearDismissible);
                if let Some(notice) = notice {
                    notices.dispatch(NoticeAction::Push(notice));
                }
                tracing::info!(username = %request.username, "logged in");
                console.navigate(&console.routes().config().home_path);
            });
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-gray-50 dark:bg-gray-900">
            <form onsubmit={on_submit} class="bg-white dark:bg-gray-800 rounded-lg p-8 w-full max-w-sm shadow-xl">
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white mb-6 text-center">{"Panel login"}</h1>

                if let Some(error) = &*error {
                    <div class="mb-4 p-3 bg-red-50 dark:bg-red-900/30 text-red-700 dark:text-red-300 rounded text-sm">
                        {error}
                    </div>
                }

                <label class="block text-sm text-gray-700 dark:text-gray-300 mb-1" for="username">{"Username"}</label>
                <input
                    id="username"
                    type="text"
                    autocomplete="username"
                    value={(*username).clone()}
                    oninput={on_username_input}
                    class="w-full mb-4 px-3 py-2 border rounded dark:bg-gray-700 dark:text-white"
                />

                <label class="block text-sm text-gray-700 dark:text-gray-300 mb-1" for="password">{"Password"}</label>
                <input
                    id="password"
                    type="password"
                    autocomplete="current-password"
                    value={(*password).clone()}
                    oninput={on_password_input}
                    class="w-full mb-6 px-3 py-2 border rounded dark:bg-gray-700 dark:text-white"
                />

                if *submitting {
                    <Spinner text="Signing in..." />
                } else {
                    <button
                        type="submit"
                        class="w-full bg-blue-600 hover:bg-blue-700 text-white font-medium py-3 px-4 rounded-lg transition-colors"
                    >
                        {"Log in"}
                    </button>
                }
            </form>
        </div>
    }
}
