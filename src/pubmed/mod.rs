//! PubMed E-utilities client for the proxy
//!
//! The client functionality is split across focused modules under [`client`]:
//! - `client/mod.rs` - Core client struct, request helper, search and the combined pipeline
//! - `client/summary` - ESummary API for record metadata
//! - `client/abstracts` - EFetch API for titles and abstracts
//!
//! [`parser`] scans EFetch XML and [`merge`] joins the two record sets.

pub mod client;
pub mod merge;
pub mod models;
pub mod parser;
pub(crate) mod responses;

// Re-export public types
pub use client::PubMedClient;
pub use merge::merge_records;
pub use models::{
    AbstractRecord, AbstractResult, MergedRecord, MergedResult, SearchParams, SearchResult,
    SummaryRecord, SummaryResult,
};
pub use parser::parse_abstracts;
