// File: ./src/model/mod.rs
pub mod adapter;
pub mod assembler;
pub mod item;
pub mod parser;
pub mod tags;

pub use assembler::{
    ParseReport, TaskCollection, TaskParser, compute_uid, parse_collection, parse_line,
};
pub use item::{DateType, Task, TaskStatus};
pub use parser::{
    Diagnostic, Grammar, ParseError, RawFieldSet, Rejection, classify, parse_date, parse_status,
};
pub use tags::{Normalized, TagKind, TagValue, TypedTag, normalize};
