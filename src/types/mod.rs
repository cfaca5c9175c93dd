mod extension;
mod request;
mod timestamp;

pub use extension::Container;
pub use request::Request;
pub use timestamp::{CanonicalTime, ParseTimeError};
