//! Messages shown above the current view

use panel_core::{Notice, NoticeLevel};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct NoticeState {
    next_id: u32,
    pub notices: Vec<(u32, Notice)>,
}

pub enum NoticeAction {
    /// Show a notice; a persistent one replaces any earlier persistent one
    Push(Notice),
    Dismiss(u32),
    /// Drop dismissible notices, e.g. after a successful navigation
    ClearDismissible,
    Clear,
}

impl Reducible for NoticeState {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NoticeAction::Push(notice) => {
                if !notice.dismissible {
                    next.notices.retain(|(_, existing)| existing.dismissible);
                }
                next.notices.retain(|(_, existing)| existing != &notice);
                next.notices.push((next.next_id, notice));
                next.next_id = next.next_id.wrapping_add(1);
            }
            NoticeAction::Dismiss(id) => {
                next.notices
                    .retain(|(existing, notice)| *existing != id || !notice.dismissible);
            }
            NoticeAction::ClearDismissible => {
                next.notices.retain(|(_, notice)| !notice.dismissible);
            }
            NoticeAction::Clear => next.notices.clear(),
        }
        Rc::new(next)
    }
}

pub type NoticeContext = UseReducerHandle<NoticeState>;

#[derive(Properties, PartialEq)]
pub struct NoticeProviderProps {
    pub children: Children,
}

#[function_component(NoticeProvider)]
pub fn notice_provider(props: &NoticeProviderProps) -> Html {
    let notices = use_reducer(NoticeState::default);

    html! {
        <ContextProvider<NoticeContext> context={notices}>
            <NoticeBar />
            {props.children.clone()}
        </ContextProvider<NoticeContext>>
    }
}

/// Hook to use the notice context
#[hook]
pub fn use_notices() -> NoticeContext {
    use_context::<NoticeContext>()
        .expect("NoticeContext not found. Make sure to wrap your component with NoticeProvider")
}

#[function_component(NoticeBar)]
pub fn notice_bar() -> Html {
    let notices = use_notices();

    if notices.notices.is_empty() {
        return html! {};
    }

    html! {
        <div class="fixed top-4 inset-x-0 flex flex-col items-center gap-2 z-40">
            { for notices.notices.iter().map(|(id, notice)| {
                let on_dismiss = {
                    let notices = notices.clone();
                    let id = *id;
                    Callback::from(move |_: MouseEvent| notices.dispatch(NoticeAction::Dismiss(id)))
                };
                html! {
                    <div key={*id} class={classes!("max-w-xl", "w-full", "mx-4", "p-3", "rounded", "text-sm", "flex", "justify-between", level_class(notice.level))}>
                        <span>{&notice.text}</span>
                        if notice.dismissible {
                            <button onclick={on_dismiss} class="ml-4 font-bold" aria-label="Dismiss">{"×"}</button>
                        }
                    </div>
                }
            }) }
        </div>
    }
}

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "bg-blue-50 dark:bg-blue-900/30 text-blue-700 dark:text-blue-300",
        NoticeLevel::Warning => "bg-yellow-50 dark:bg-yellow-900/30 text-yellow-800 dark:text-yellow-200",
        NoticeLevel::Error => "bg-red-50 dark:bg-red-900/30 text-red-700 dark:text-red-300",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: NoticeState, action: NoticeAction) -> NoticeState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn persistent_error_replaces_previous_one() {
        let state = reduce(NoticeState::default(), NoticeAction::Push(Notice::persistent_error("first")));
        let state = reduce(state, NoticeAction::Push(Notice::warning("login")));
        let state = reduce(state, NoticeAction::Push(Notice::persistent_error("second")));
        let texts: Vec<&str> = state.notices.iter().map(|(_, n)| n.text.as_str()).collect();
        assert_eq!(texts, ["login", "second"]);
    }

    #[test]
    fn persistent_notices_ignore_dismiss() {
        let state = reduce(NoticeState::default(), NoticeAction::Push(Notice::persistent_error("down")));
        let id = state.notices[0].0;
        let state = reduce(state, NoticeAction::Dismiss(id));
        assert_eq!(state.notices.len(), 1);
        let state = reduce(state, NoticeAction::ClearDismissible);
        assert_eq!(state.notices.len(), 1);
        assert!(reduce(state, NoticeAction::Clear).notices.is_empty());
    }
}
