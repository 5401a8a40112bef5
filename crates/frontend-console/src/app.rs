use crate::pages::{ControllerView, LoginPage, LogoutPage, MainPage, SorryPage};
use panel_core::{Navigation, RouteMatch};
use panel_frontend_common::{
    use_console, AuthGate, ConsoleProvider, NoticeProvider, SessionProvider, Spinner,
};
use yew::prelude::*;
use yew_router::hooks::use_location;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ConsoleProvider>
            <NoticeProvider>
                <SessionProvider>
                    <RouteSwitch />
                </SessionProvider>
            </NoticeProvider>
        </ConsoleProvider>
    }
}

#[function_component(RouteSwitch)]
fn route_switch() -> Html {
    let console = use_console();
    let path = use_location().map_or_else(|| "/".to_string(), |location| location.path().to_string());

    let navigation = console.routes().navigate(&path);
    let redirect = match &navigation {
        Navigation::Redirect(target) => Some(target.clone()),
        Navigation::Render(_) => None,
    };

    {
        let console = console.clone();
        use_effect_with(redirect, move |redirect| {
            if let Some(target) = redirect {
                console.redirect(target);
            }
        });
    }

    match navigation {
        Navigation::Render(found) => html! {
            <AuthGate key={path.clone()} entry={*found.entry} path={AttrValue::from(path.clone())}>
                {render(&found)}
            </AuthGate>
        },
        Navigation::Redirect(_) => html! { <Spinner /> },
    }
}

fn render(found: &RouteMatch<'_>) -> Html {
    match found.entry.controller {
        "LoginCtrl" => html! { <LoginPage /> },
        "LogoutCtrl" => html! { <LogoutPage /> },
        "SorryCtrl" => html! { <SorryPage /> },
        "MainCtrl" => html! { <MainPage /> },
        _ => html! { <ControllerView entry={*found.entry} params={found.params.clone()} /> },
    }
}
