//! # octi-connector
//!
//! OpenCTI operations for connector hosts.
//!
//! Each host operation (create/list organizations, labels, external
//! references, marking definitions; create/list/delete/update observables;
//! attach and detach markings or labels; health check) takes an
//! [`OpenCtiConfig`] and a JSON parameter mapping, and returns the platform's
//! answer as JSON.
//!
//! ```no_run
//! use octi_connector::{operations, OpenCtiConfig};
//! use serde_json::json;
//!
//! # async fn run() -> octi_connector::ConnectorResult<()> {
//! let config = OpenCtiConfig::new("opencti.example.org", "api-token");
//! let labels = operations::execute(&config, "get_labels", json!({"limit": 10})).await?;
//! println!("{}", labels["pagination"]["globalCount"]);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod graphql;
pub mod http;
pub mod opencti;
pub mod operations;
pub mod params;
pub mod secure_string;
pub mod testing;
pub mod traits;

pub use constants::{IndicatorKind, Reliability, UpdateField};
pub use opencti::{OpenCtiClient, OpenCtiConfig};
pub use operations::{execute, Operation, OperationRegistry, ParameterDef, ParameterType};
pub use params::Params;
pub use secure_string::SecureString;
pub use traits::{
    AuthConfig, Connector, ConnectorConfig, ConnectorError, ConnectorHealth, ConnectorResult,
};
