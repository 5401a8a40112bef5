use panel_core::api::XSRF_COOKIE;
use panel_core::Notice;
use panel_frontend_common::{use_console, use_notices, use_session, NoticeAction, Spinner};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[function_component(LogoutPage)]
pub fn logout_page() -> Html {
    let console = use_console();
    let notices = use_notices();
    let session = use_session();

    use_effect_with((), move |_| {
        session.stop();
        spawn_local(async move {
            if let Err(err) = console.client().logout().await {
                tracing::warn!(error = %err, "logout request failed");
            }
            if let Err(err) = console.cookies().delete(XSRF_COOKIE) {
                tracing::debug!(error = %err, "could not clear xsrf cookie");
            }
            notices.dispatch(NoticeAction::Clear);
            notices.dispatch(NoticeAction::Push(Notice::info("You have been logged out.")));
            console.redirect(&console.routes().config().login_path);
        });
    });

    html! { <Spinner text="Logging out..." /> }
}
