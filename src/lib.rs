// Crate root library declaration and module exports.
pub mod cli;
pub mod clock;
pub mod config;
pub mod context;
pub mod model;
pub mod server;
pub mod source;

pub use model::{TaskCollection, parse_collection, parse_line};
