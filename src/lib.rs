pub mod aggregate;
pub mod cli;
pub mod convert;
pub mod error;
pub mod model;
pub mod parsers;
pub mod report;
