//! Stand-in for page controllers served outside this crate

use panel_core::RouteEntry;
use std::collections::BTreeMap;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ControllerViewProps {
    pub entry: RouteEntry,
    #[prop_or_default]
    pub params: BTreeMap<String, String>,
}

#[function_component(ControllerView)]
pub fn controller_view(props: &ControllerViewProps) -> Html {
    html! {
        <div
            class="p-6"
            data-controller={props.entry.controller}
            data-template={props.entry.template}
        >
            <h2 class="text-lg font-semibold text-gray-900 dark:text-white">{props.entry.controller}</h2>
            if !props.params.is_empty() {
                <dl class="mt-4 text-sm text-gray-600 dark:text-gray-300">
                    { for props.params.iter().map(|(name, value)| html! {
                        <>
                            <dt class="font-medium">{name}</dt>
                            <dd class="ml-4">{value}</dd>
                        </>
                    }) }
                </dl>
            }
        </div>
    }
}
