//! OpenCTI platform client and per-entity calls.
//!
//! The entity modules speak the platform's vocabulary (typed inputs,
//! GraphQL documents); the host-facing parameter names are translated in
//! [`crate::operations`].

pub mod client;
pub mod config;
pub mod external_reference;
pub mod filters;
pub mod identity;
pub mod label;
pub mod marking_definition;
pub mod observable;
mod queries;

pub use client::OpenCtiClient;
pub use config::{normalize_server_url, OpenCtiConfig};
pub use filters::{Filter, FilterBuilder, FilterGroup, FilterMode, FilterOperator};
pub use identity::OrganizationInput;
pub use observable::ObservableInput;
