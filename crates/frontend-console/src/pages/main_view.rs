use panel_frontend_common::{use_console, use_session_watchdog};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum Virt {
    Loading,
    Known(String),
    Unknown,
    Failed(String),
}

#[function_component(MainPage)]
pub fn main_page() -> Html {
    let console = use_console();
    let virt = use_state(|| Virt::Loading);

    use_session_watchdog();

    {
        let console = console.clone();
        let virt = virt.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match console.client().server_virt().await {
                    Ok(Some(name)) => virt.set(Virt::Known(name)),
                    Ok(None) => virt.set(Virt::Unknown),
                    Err(err) => {
                        tracing::warn!(error = %err, "virtualisation query failed");
                        virt.set(Virt::Failed(err.to_string()));
                    }
                }
            });
        });
    }

    let on_logout = {
        let console = console.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            console.navigate("/logout");
        })
    };

    html! {
        <div class="p-6">
            <div class="flex justify-between items-center mb-6">
                <h1 class="text-2xl font-bold text-gray-900 dark:text-white">{"Server overview"}</h1>
                <a href="/logout" onclick={on_logout} class="text-sm text-blue-600 hover:underline">{"Log out"}</a>
            </div>
            <p class="text-gray-700 dark:text-gray-300">
                {"Virtualisation: "}
                {match &*virt {
                    Virt::Loading => html! { <span class="text-gray-400">{"checking..."}</span> },
                    Virt::Known(name) => html! { <strong>{name}</strong> },
                    Virt::Unknown => html! { <span>{"none detected"}</span> },
                    Virt::Failed(err) => html! { <span class="text-red-600">{err}</span> },
                }}
            </p>
        </div>
    }
}
