//! EFetch abstract retrieval

use crate::error::{PubMedError, Result};
use crate::pubmed::models::AbstractResult;
use crate::pubmed::parser::parse_abstracts;
use tracing::{debug, info, instrument};

use super::PubMedClient;

impl PubMedClient {
    /// Fetch titles and abstracts for a batch of PMIDs in one EFetch request
    ///
    /// The abstract rendition is only available as XML, so the body is scanned
    /// with [`parse_abstracts`]. Blocks with missing fields degrade to empty
    /// strings.
    ///
    /// # Errors
    ///
    /// * `PubMedError::AbstractsNotFound` - If no article block could be parsed
    /// * `PubMedError::RequestError` / `PubMedError::ApiError` - If the upstream call fails
    #[instrument(skip(self), fields(pmids_count = pmids.len()))]
    pub async fn fetch_abstracts(&self, pmids: &[&str]) -> Result<AbstractResult> {
        let id_list = Self::join_ids(pmids);
        if id_list.is_empty() {
            return Err(PubMedError::AbstractsNotFound { ids: id_list });
        }

        let url = format!(
            "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml&rettype=abstract",
            self.base_url, id_list
        );

        debug!("Making batch EFetch API request");
        let response = self.make_request(&url).await?;
        let xml_text = response.text().await?;

        let records = parse_abstracts(&xml_text, &id_list)?;
        info!(
            requested = pmids.len(),
            parsed = records.len(),
            "EFetch abstract batch completed"
        );

        Ok(AbstractResult { records })
    }
}
