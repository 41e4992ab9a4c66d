//! Coordinator: routes notifications between the state components.
//!
//! Components never call each other. Each one leaves notifications in its
//! outbox; after every command the coordinator drains them into a FIFO queue
//! and runs the handlers registered for each notification's source, in
//! registration order. Whatever a handler causes is appended to the queue and
//! dispatched in turn, so one command settles completely before it returns.
//!
//! Three rules keep that loop well-behaved:
//!
//! - a handler may not mutate the component whose notification it is
//!   handling (`CoordinationError::Reentrancy`);
//! - a single command may dispatch at most [`DISPATCH_LIMIT`] notifications;
//! - search requests made during a command are coalesced and submitted once,
//!   after dispatch settles.
//!
//! Handler failures are logged and collected (see
//! [`Coordinator::take_errors`]); they never abort the remaining handlers.

mod collaborators;
mod commands;
mod context;
mod notification;
mod wiring;

pub use collaborators::{
    SearchKind, SearchOutcome, SearchRequest, SearchService, UiSink, UiUpdate,
    TINT_STYLE_ATTRIBUTE,
};
pub use commands::Activation;
pub use context::Context;
pub use notification::Notification;

use crate::config::ConfigGroups;
use crate::model::{Component, CoordinationError};
use crate::state::{ActiveFilterSet, NavigationState, SelectionState};
use std::collections::VecDeque;
use tracing::{debug_span, error, trace, warn};

/// Default cap on notifications dispatched by one command.
pub const DISPATCH_LIMIT: usize = 256;

/// A registered reaction.
pub type Handler<S, U> =
    Box<dyn FnMut(&Notification, &mut Context<S, U>) -> Result<(), CoordinationError>>;

struct Registration<S, U> {
    topic: Component,
    name: &'static str,
    handler: Handler<S, U>,
}

/// Owns the components and the collaborators and wires them together.
pub struct Coordinator<S, U> {
    ctx: Context<S, U>,
    handlers: Vec<Registration<S, U>>,
    dispatch_limit: usize,
    errors: Vec<CoordinationError>,
}

impl<S: SearchService, U: UiSink> Coordinator<S, U> {
    /// Coordinator with no handlers registered.
    pub fn new(
        navigation: NavigationState,
        selection: SelectionState,
        filters: ActiveFilterSet,
        config_groups: ConfigGroups,
        search: S,
        ui: U,
    ) -> Self {
        Self {
            ctx: Context::new(navigation, selection, filters, config_groups, search, ui),
            handlers: Vec::new(),
            dispatch_limit: DISPATCH_LIMIT,
            errors: Vec::new(),
        }
    }

    /// Coordinator with the standard reactions installed.
    pub fn with_default_wiring(
        navigation: NavigationState,
        selection: SelectionState,
        filters: ActiveFilterSet,
        config_groups: ConfigGroups,
        search: S,
        ui: U,
    ) -> Self
    where
        S: 'static,
        U: 'static,
    {
        let mut coordinator = Self::new(navigation, selection, filters, config_groups, search, ui);
        wiring::install(&mut coordinator);
        coordinator
    }

    /// Builder: change the per-command dispatch cap.
    pub fn with_dispatch_limit(mut self, limit: usize) -> Self {
        self.dispatch_limit = limit;
        self
    }

    /// Subscribe `handler` to notifications from `topic`.
    pub fn on<F>(&mut self, topic: Component, name: &'static str, handler: F)
    where
        F: FnMut(&Notification, &mut Context<S, U>) -> Result<(), CoordinationError> + 'static,
    {
        trace!(%topic, name, "Handler registered");
        self.handlers.push(Registration {
            topic,
            name,
            handler: Box::new(handler),
        });
    }

    /// Registered handlers as `(topic, name)`, in dispatch order.
    pub fn handlers(&self) -> Vec<(Component, &'static str)> {
        self.handlers.iter().map(|r| (r.topic, r.name)).collect()
    }

    // ===== Access =====

    /// Read-only view of everything coordinated.
    pub fn context(&self) -> &Context<S, U> {
        &self.ctx
    }

    /// Navigation state.
    pub fn navigation(&self) -> &NavigationState {
        self.ctx.navigation()
    }

    /// Generic selection ledger.
    pub fn selection(&self) -> &SelectionState {
        self.ctx.selection()
    }

    /// Active filter set.
    pub fn filters(&self) -> &ActiveFilterSet {
        self.ctx.filters()
    }

    /// The search collaborator.
    pub fn search(&self) -> &S {
        self.ctx.search()
    }

    /// The search collaborator, mutably (e.g. to collect finished work).
    pub fn search_mut(&mut self) -> &mut S {
        self.ctx.search_mut()
    }

    /// The UI collaborator.
    pub fn ui(&self) -> &U {
        self.ctx.ui()
    }

    /// The UI collaborator, mutably.
    pub fn ui_mut(&mut self) -> &mut U {
        self.ctx.ui_mut()
    }

    /// Handler failures collected since the last call.
    pub fn take_errors(&mut self) -> Vec<CoordinationError> {
        std::mem::take(&mut self.errors)
    }

    // ===== Dispatch =====

    /// Report a finished search. The count is recorded and a
    /// `SearchCompleted` notification is dispatched.
    pub fn complete_search(&mut self, outcome: SearchOutcome) -> Result<(), CoordinationError> {
        self.ctx.set_last_result_count(outcome.count);
        let mut queue = VecDeque::from([Notification::SearchCompleted(outcome)]);
        self.settle(&mut queue)
    }

    /// Run `command` against the context, then dispatch what it caused.
    ///
    /// The command's own error wins over a dispatch overflow.
    pub(crate) fn execute<T>(
        &mut self,
        name: &'static str,
        command: impl FnOnce(&mut Context<S, U>) -> Result<T, CoordinationError>,
    ) -> Result<T, CoordinationError> {
        let span = debug_span!("command", name);
        let _enter = span.enter();

        let result = command(&mut self.ctx);
        if let Err(e) = &result {
            warn!(error = %e, "Command failed");
        }
        let mut queue = VecDeque::new();
        let settled = self.settle(&mut queue);
        let value = result?;
        settled.map(|()| value)
    }

    fn settle(&mut self, queue: &mut VecDeque<Notification>) -> Result<(), CoordinationError> {
        let dispatched = self.dispatch(queue);
        self.ctx.flush_search();
        dispatched
    }

    fn dispatch(&mut self, queue: &mut VecDeque<Notification>) -> Result<(), CoordinationError> {
        self.ctx.drain_notifications(queue);
        let mut processed = 0usize;

        while let Some(notification) = queue.pop_front() {
            processed += 1;
            if processed > self.dispatch_limit {
                let limit = self.dispatch_limit;
                error!(limit, pending = queue.len() + 1, "Notification cascade exceeded limit");
                queue.clear();
                self.ctx.discard_notifications();
                self.ctx.discard_search();
                self.ctx.set_dispatching(None);
                let overflow = CoordinationError::DispatchOverflow { limit };
                self.errors.push(overflow.clone());
                return Err(overflow);
            }

            let source = notification.source();
            trace!(%source, "Dispatching notification");
            self.ctx.set_dispatching(Some(source));
            for registration in self.handlers.iter_mut().filter(|r| r.topic == source) {
                if let Err(e) = (registration.handler)(&notification, &mut self.ctx) {
                    error!(handler = registration.name, %source, error = %e, "Handler failed");
                    self.errors.push(e);
                }
                self.ctx.drain_notifications(queue);
            }
            self.ctx.set_dispatching(None);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mediator_tests.rs"]
mod tests;
