#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
#![allow(unexpected_cfgs)]

//! Internal lifecycle event bus for the NRF process.
//!
//! The registry manager publishes [`Event`] values as NF instances register,
//! update their profile, or deregister; the subscription/notifier worker and
//! the discovery cache both subscribe to react to them. The bus is built on
//! `tokio::broadcast` with a bounded replay ring so a late subscriber can
//! request everything emitted after a known event id instead of missing it.

mod error;
mod payloads;
mod routing;

pub use error::{EventBusError, EventBusResult};
pub use payloads::{DEFAULT_REPLAY_CAPACITY, Event, EventEnvelope, EventId};
pub use routing::{EventBus, EventStream};
