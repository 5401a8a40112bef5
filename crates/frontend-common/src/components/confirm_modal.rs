//! Idle-session confirmation modal

use crate::config::FrontendConfig;
use crate::session::use_session;
use yew::prelude::*;

/// Blocking dialog shown once the server agrees the session has gone idle
#[function_component(ConfirmModal)]
pub fn confirm_modal() -> Html {
    let session = use_session();

    let on_confirm = {
        let session = session.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            session.confirm();
        })
    };

    if !session.dialog_open {
        return html! {};
    }

    html! {
        <div
            id={FrontendConfig::CONFIRM_DIALOG_ID}
            role="dialog"
            aria-modal="true"
            class="fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center z-50"
        >
            <div class="bg-white dark:bg-gray-800 rounded-lg p-6 max-w-md w-full mx-4 shadow-xl">
                <div class="flex items-center mb-4">
                    <svg class="w-8 h-8 text-yellow-500 mr-3" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2"
                            d="M12 8v4l3 3m6-3a9 9 0 11-18 0 9 9 0 0118 0z" />
                    </svg>
                    <h2 class="text-xl font-bold text-gray-900 dark:text-white">
                        {"Are you still there?"}
                    </h2>
                </div>

                <p class="text-gray-600 dark:text-gray-300 mb-6">
                    {"You have been inactive for a long time. Confirm to keep your session open."}
                </p>

                <button
                    onclick={on_confirm}
                    class="w-full bg-blue-600 hover:bg-blue-700
                           text-white font-medium py-3 px-4 rounded-lg transition-colors"
                >
                    {"I'm still here"}
                </button>
            </div>
        </div>
    }
}
