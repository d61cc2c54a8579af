//! API request handlers.

mod diff;
mod ingest;
mod rows;
mod schema;
mod submit;

pub use diff::*;
pub use ingest::*;
pub use rows::*;
pub use schema::*;
pub use submit::*;
