#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::uninlined_format_args)]

pub mod engine;
pub mod report;
pub mod text;
