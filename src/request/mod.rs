pub mod builder;
pub mod loader;
pub mod raw;

pub use builder::{build, OutboundRequest, PayloadSpec};
pub use loader::load_request_file;
pub use raw::{parse_raw_request, RawRequest};
