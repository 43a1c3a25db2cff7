pub mod dispatcher;
pub mod encoding;
pub mod throttle;
pub mod transport;

pub use dispatcher::{Dispatcher, ProbeResponse};
pub use throttle::Pacer;
pub use transport::{RawResponse, ReqwestTransport, Transport};
