// src/lib.rs

pub mod collect;
pub mod error;
pub mod headers;
pub mod table;

pub use collect::{fetch_mortality, fetch_occurrences, fetch_reserves};
pub use error::ScrapeError;
pub use table::Frame;
