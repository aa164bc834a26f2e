pub mod analyzers;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod schema;
pub mod stats;

pub use error::RaterError;
