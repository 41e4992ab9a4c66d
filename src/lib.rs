//! Catalog Navigator (catnav)
//!
//! Breadcrumb navigation over a hierarchical product catalog, a generic
//! selection ledger, and the active filter set derived from both, kept in
//! step by a coordinator that routes every change notification.
//!
//! The library is a pure core: [`state`] holds the three state machines,
//! [`mediator`] wires them together behind search and UI traits. The shell
//! pieces ([`source`], [`command`], [`search`], [`store`],
//! [`integration`]) drive that core from a line-oriented command stream.

pub mod command;
pub mod config;
pub mod logging;
pub mod mediator;
pub mod model;
pub mod parser;
pub mod search;
pub mod source;
pub mod state;
pub mod store;

// Shell loop
pub mod integration;

#[cfg(test)]
mod test_harness;
