//! Warden: client library for the data-access-control admin API.
//!
//! [`AdminClient`] hands out one repository per entity kind plus the
//! [`LinkResolver`](links::LinkResolver) for policy attachments, all sharing a
//! single [`Transport`](transport::Transport).

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;
pub mod links;
pub mod models;
pub mod repo;
pub mod secret;
pub mod transport;

pub use client::AdminClient;
pub use errors::{AdminError, Result};
pub use models::link::{LinkTarget, NewPolicyLink, PolicyLink, TargetKind};
pub use secret::Secret;
