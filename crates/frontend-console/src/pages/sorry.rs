use panel_frontend_common::use_console;
use yew::prelude::*;

#[function_component(SorryPage)]
pub fn sorry_page() -> Html {
    let console = use_console();
    let on_home = {
        let console = console.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            console.navigate(&console.routes().config().home_path);
        })
    };

    html! {
        <div class="max-w-md mx-auto mt-24 text-center">
            <h1 class="text-2xl font-bold text-gray-900 dark:text-white mb-4">{"Page not found"}</h1>
            <p class="text-gray-600 dark:text-gray-300 mb-6">
                {"The page you asked for does not exist."}
            </p>
            <a href="#" onclick={on_home} class="text-blue-600 hover:underline">{"Back to the console"}</a>
        </div>
    }
}
