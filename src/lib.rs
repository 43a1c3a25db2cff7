pub mod catalog;
pub mod config;
pub mod errors;
pub mod external;
pub mod http_client;
pub mod output;
pub mod probe;
pub mod request;
pub mod session;
pub mod utils;
pub mod waf;

// re-export the types most callers need
pub use crate::catalog::{Catalog, VendorProfile};
pub use crate::config::ProbeConfig;
pub use crate::session::{ProbeResult, ProbeSession, SessionReport};
