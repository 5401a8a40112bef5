//! Session watchdog provider

use super::runner::WatchdogRunner;
use super::surface::DocumentSurface;
use crate::components::ConfirmModal;
use crate::context::use_console;
use panel_core::{SessionApi, SessionWatchdog, SystemClock};
use std::rc::Rc;
use yew::prelude::*;

/// Watchdog handle plus whether its confirmation dialog is open
#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub runner: WatchdogRunner,
    pub dialog_open: bool,
}

impl SessionContext {
    pub fn start(&self) {
        self.runner.start();
    }

    pub fn stop(&self) {
        self.runner.stop();
    }

    pub fn confirm(&self) {
        self.runner.confirm();
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let console = use_console();
    let dialog_open = use_state(|| false);

    let runner = {
        let set_dialog_open = {
            let dialog_open = dialog_open.setter();
            Callback::from(move |open: bool| dialog_open.set(open))
        };
        use_memo(console.clone(), move |console| {
            let api: Rc<dyn SessionApi> = Rc::new(console.client().clone());
            let watchdog = SessionWatchdog::new(
                console.config().watchdog.clone(),
                api,
                Rc::new(SystemClock),
                Rc::new(DocumentSurface::new(set_dialog_open)),
            );
            WatchdogRunner::new(watchdog)
        })
    };

    // Timers and listeners die with the provider
    {
        let runner = (*runner).clone();
        use_effect_with((), move |_| move || runner.stop());
    }

    let context = SessionContext {
        runner: (*runner).clone(),
        dialog_open: *dialog_open,
    };

    html! {
        <ContextProvider<SessionContext> context={context}>
            <ConfirmModal />
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

/// Hook to use the session context
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("SessionContext not found. Make sure to wrap your component with SessionProvider")
}

/// Run the watchdog while the calling component is mounted
#[hook]
pub fn use_session_watchdog() {
    let session = use_session();
    use_effect_with(session.runner.clone(), move |runner| {
        runner.start();
        let runner = runner.clone();
        move || runner.stop()
    });
}
