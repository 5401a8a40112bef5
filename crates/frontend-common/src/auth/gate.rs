use crate::components::Spinner;
use crate::context::use_console;
use crate::notice::{use_notices, NoticeAction};
use panel_core::auth::guard;
use panel_core::{GateOutcome, RouteEntry};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AuthGateProps {
    pub entry: RouteEntry,
    /// Concrete path being entered; a change re-runs the check
    pub path: AttrValue,
    pub children: Children,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateView {
    Checking,
    Allowed,
    Blocked,
}

/// Gate result together with the path it was decided for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateDecision {
    pub path: AttrValue,
    pub view: GateView,
}

/// What to show for `path`; a decision made for another path never applies
pub fn visible_view(decision: Option<&GateDecision>, entry: &RouteEntry, path: &str) -> GateView {
    if !entry.requires_auth {
        return GateView::Allowed;
    }
    match decision {
        Some(decision) if decision.path.as_str() == path => decision.view,
        _ => GateView::Checking,
    }
}

/// Renders its children only once the session may enter `entry`
#[function_component(AuthGate)]
pub fn auth_gate(props: &AuthGateProps) -> Html {
    let console = use_console();
    let notices = use_notices();
    let decision = use_state(|| Option::<GateDecision>::None);
    let current = use_mut_ref(AttrValue::default);

    {
        let decision = decision.clone();
        use_effect_with((props.entry, props.path.clone()), move |(entry, path)| {
            let (entry, path) = (*entry, path.clone());
            *current.borrow_mut() = path.clone();
            if !entry.requires_auth {
                return;
            }
            spawn_local(async move {
                let routes = console.routes().config().clone();
                let outcome = guard(console.client(), &entry, &routes).await;
                if *current.borrow() != path {
                    tracing::debug!(path = %path, "discarding stale gate result");
                    return;
                }
                let view = match outcome {
                    GateOutcome::Proceed => GateView::Allowed,
                    GateOutcome::RedirectToLogin { target, notice } => {
                        notices.dispatch(NoticeAction::Push(notice));
                        console.redirect(&target);
                        return;
                    }
                    GateOutcome::Blocked { notice } => {
                        notices.dispatch(NoticeAction::Push(notice));
                        GateView::Blocked
                    }
                };
                decision.set(Some(GateDecision { path, view }));
            });
        });
    }

    match visible_view((*decision).as_ref(), &props.entry, &props.path) {
        GateView::Allowed => html! { <>{props.children.clone()}</> },
        GateView::Checking => html! { <Spinner text="Checking session..." /> },
        GateView::Blocked => html! {},
    }
}
