pub mod relevance;
pub mod emergency;

pub use relevance::*;
pub use emergency::*;
