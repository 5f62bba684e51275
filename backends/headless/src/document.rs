use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::Rc,
};

use elementa_core::{CustomEvent, FetchError};
use futures::channel::oneshot;

use crate::{host::HeadlessHost, markup::parse_fragment, dom::Node};

pub(crate) type Listener = Rc<dyn Fn(&CustomEvent)>;

/// Completes a deferred response registered with [`HeadlessDocument::defer`].
pub type Responder = oneshot::Sender<Result<String, FetchError>>;

enum Route {
    Body(String),
    Status(u16),
    Fail(String),
    Deferred(Option<oneshot::Receiver<Result<String, FetchError>>>),
}

struct Entry {
    tag: String,
    content: Vec<Node>,
}

#[derive(Default)]
struct DocumentState {
    elements: HashMap<String, Entry>,
    routes: HashMap<String, Route>,
    requests: Vec<String>,
    listeners: Vec<(String, Listener)>,
}

/// An in-memory document: elements addressable by id, a table of URL
/// responses, and listeners attached at the document level.
///
/// Cloning is cheap and every clone refers to the same document.
#[derive(Clone, Default)]
pub struct HeadlessDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl fmt::Debug for HeadlessDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessDocument")
            .field("elements", &state.elements.len())
            .field("routes", &state.routes.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl HeadlessDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the host for a new element instance in the light DOM of the
    /// document.
    #[must_use]
    pub fn create_host(&self, tag: &str) -> HeadlessHost {
        HeadlessHost::new(self.clone(), tag, false)
    }

    /// Creates the host for an element living inside another element's
    /// shadow tree. Only composed events reach document listeners from it.
    #[must_use]
    pub fn create_nested_host(&self, tag: &str) -> HeadlessHost {
        HeadlessHost::new(self.clone(), tag, true)
    }

    /// Adds `<template id="{id}">{markup}</template>`.
    pub fn add_template(&self, id: &str, markup: &str) {
        self.add_element(id, "template", markup);
    }

    /// Adds an arbitrary element with an id.
    pub fn add_element(&self, id: &str, tag: &str, markup: &str) {
        self.state.borrow_mut().elements.insert(
            id.to_string(),
            Entry {
                tag: tag.to_ascii_lowercase(),
                content: parse_fragment(markup),
            },
        );
    }

    /// Serves `body` with status 200 at `url`.
    pub fn serve(&self, url: &str, body: &str) {
        self.route(url, Route::Body(body.to_string()));
    }

    /// Answers requests to `url` with `status` and an empty body.
    pub fn serve_status(&self, url: &str, status: u16) {
        self.route(url, Route::Status(status));
    }

    /// Makes requests to `url` fail before a response is produced.
    pub fn fail(&self, url: &str, reason: &str) {
        self.route(url, Route::Fail(reason.to_string()));
    }

    /// Holds the next request to `url` until the returned responder is used.
    #[must_use]
    pub fn defer(&self, url: &str) -> Responder {
        let (sender, receiver) = oneshot::channel();
        self.route(url, Route::Deferred(Some(receiver)));
        sender
    }

    fn route(&self, url: &str, route: Route) {
        self.state.borrow_mut().routes.insert(url.to_string(), route);
    }

    /// Every URL requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }

    /// Listens for events named `name` that reach the document.
    pub fn add_event_listener(&self, name: &str, listener: impl Fn(&CustomEvent) + 'static) {
        self.state
            .borrow_mut()
            .listeners
            .push((name.to_string(), Rc::new(listener)));
    }

    pub(crate) fn listeners_for(&self, name: &str) -> Vec<Listener> {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|(event, _)| event == name)
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn template_content(&self, id: &str) -> Option<Vec<Node>> {
        let state = self.state.borrow();
        let entry = state.elements.get(id)?;
        (entry.tag == "template").then(|| entry.content.clone())
    }

    pub(crate) async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        enum Pending {
            Ready(Result<String, FetchError>),
            Wait(Option<oneshot::Receiver<Result<String, FetchError>>>),
        }

        let pending = {
            let mut state = self.state.borrow_mut();
            state.requests.push(url.to_string());
            match state.routes.get_mut(url) {
                Some(Route::Body(body)) => Pending::Ready(Ok(body.clone())),
                Some(Route::Status(status)) if (200..300).contains(&*status) => {
                    Pending::Ready(Ok(String::new()))
                }
                Some(Route::Status(status)) => Pending::Ready(Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                })),
                Some(Route::Fail(reason)) => {
                    Pending::Ready(Err(FetchError::Transport(reason.clone())))
                }
                Some(Route::Deferred(receiver)) => Pending::Wait(receiver.take()),
                None => Pending::Ready(Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })),
            }
        };

        tracing::debug!(url, "headless fetch");
        match pending {
            Pending::Ready(result) => result,
            Pending::Wait(Some(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("request was dropped".into()))),
            Pending::Wait(None) => Err(FetchError::Transport(format!(
                "deferred response for `{url}` was already consumed"
            ))),
        }
    }
}
