mod cut;
mod download;

pub use cut::cut;
pub use download::{fetch, Fetched};
