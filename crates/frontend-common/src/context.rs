//! Console-wide context: configuration, routes, HTTP client and navigation

use crate::client::PanelClient;
use crate::config::load_console_config;
use crate::cookies::{browser_cookies, BrowserCookies};
use panel_core::{ConsoleConfig, RouteTable};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::history::{AnyHistory, BrowserHistory, History};
use yew_router::Router;

struct ConsoleInner {
    config: ConsoleConfig,
    routes: RouteTable,
    client: PanelClient,
    cookies: Rc<BrowserCookies>,
    history: AnyHistory,
}

/// Shared handle; clones compare equal when they point at the same console
#[derive(Clone)]
pub struct ConsoleContext {
    inner: Rc<ConsoleInner>,
}

impl PartialEq for ConsoleContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ConsoleContext {
    pub fn new(config: ConsoleConfig, routes: RouteTable, history: AnyHistory) -> Self {
        let cookies = Rc::new(browser_cookies(config.cookies.clone()));
        let client = PanelClient::same_origin(cookies.clone());
        Self {
            inner: Rc::new(ConsoleInner {
                config,
                routes,
                client,
                cookies,
                history,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.inner.routes
    }

    pub fn client(&self) -> &PanelClient {
        &self.inner.client
    }

    pub fn cookies(&self) -> &BrowserCookies {
        &self.inner.cookies
    }

    pub fn history(&self) -> &AnyHistory {
        &self.inner.history
    }

    /// Push a new entry onto the browser history
    pub fn navigate(&self, path: &str) {
        self.inner.history.push(path.to_string());
    }

    /// Replace the current entry, used for gate and fallback redirects
    pub fn redirect(&self, path: &str) {
        self.inner.history.replace(path.to_string());
    }
}

#[derive(Properties, PartialEq)]
pub struct ConsoleProviderProps {
    pub children: Children,
}

/// Loads configuration, builds the route table and mounts the router
#[function_component(ConsoleProvider)]
pub fn console_provider(props: &ConsoleProviderProps) -> Html {
    let console = use_memo((), |_| {
        let config = load_console_config();
        let routes = RouteTable::standard(config.routes.clone()).or_else(|err| {
            tracing::warn!(error = %err, "route configuration rejected, using defaults");
            RouteTable::standard(Default::default())
        });
        routes.map(|routes| {
            ConsoleContext::new(config, routes, AnyHistory::from(BrowserHistory::new()))
        })
    });

    match &*console {
        Ok(console) => html! {
            <ContextProvider<ConsoleContext> context={console.clone()}>
                <Router history={console.history().clone()}>
                    {props.children.clone()}
                </Router>
            </ContextProvider<ConsoleContext>>
        },
        Err(err) => html! {
            <div class="p-6 text-red-700">{format!("Console failed to start: {err}")}</div>
        },
    }
}

/// Hook to use the console context
#[hook]
pub fn use_console() -> ConsoleContext {
    use_context::<ConsoleContext>()
        .expect("ConsoleContext not found. Make sure to wrap your component with ConsoleProvider")
}
