//! # PubMed Proxy
//!
//! A small HTTP service that forwards requests to the NCBI E-utilities API and
//! reshapes the responses into simplified JSON.
//!
//! ## Features
//!
//! - **Search**: ESearch count and PMID page for a free-text query
//! - **Summaries**: ESummary records normalised to title, journal, date, authors and DOI
//! - **Abstracts**: EFetch XML scanned for per-article title and abstract text
//! - **Search and fetch**: search, then summaries and abstracts in parallel, joined by PMID
//! - **Retry**: bounded exponential backoff on transient upstream failures
//!
//! ## Quick Start
//!
//! ```no_run
//! use pubmed_proxy::{ClientConfig, PubMedClient, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_email("researcher@university.edu");
//!     let client = PubMedClient::with_config(config)?;
//!
//!     let merged = client
//!         .search_and_fetch(&SearchParams::new("covid-19 treatment").with_retmax(5))
//!         .await?;
//!
//!     println!("{} total matches", merged.count);
//!     for record in merged.records {
//!         println!("{}: {}", record.summary.pmid, record.abstract_text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Serving
//!
//! ```no_run
//! use pubmed_proxy::{PubMedClient, server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PubMedClient::new()?;
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     server::serve(listener, client, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod pubmed;
pub mod retry;
pub mod server;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use error::{PubMedError, Result};
pub use pubmed::{
    AbstractRecord, AbstractResult, MergedRecord, MergedResult, PubMedClient, SearchParams,
    SearchResult, SummaryRecord, SummaryResult,
};
pub use retry::RetryConfig;
