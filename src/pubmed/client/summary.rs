//! ESummary API operations for fetching normalised record metadata

use crate::error::Result;
use crate::pubmed::models::{SummaryRecord, SummaryResult};
use crate::pubmed::responses::{ESummaryDocSum, ESummaryResponse};
use tracing::{debug, info, instrument, warn};

use super::PubMedClient;

impl PubMedClient {
    /// Fetch summaries for a batch of PMIDs in one ESummary request
    ///
    /// Records come back in the order of the upstream `uids` list.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_proxy::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let summaries = client.fetch_summaries(&["31978945", "33515491"]).await?;
    ///     for record in &summaries.records {
    ///         println!("{}: {:?} ({:?})", record.pmid, record.title, record.journal);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(pmids_count = pmids.len()))]
    pub async fn fetch_summaries(&self, pmids: &[&str]) -> Result<SummaryResult> {
        let id_list = Self::join_ids(pmids);
        if id_list.is_empty() {
            return Ok(SummaryResult {
                records: Vec::new(),
            });
        }

        let url = format!(
            "{}/esummary.fcgi?db=pubmed&id={}&retmode=json",
            self.base_url, id_list
        );

        debug!("Making batch ESummary API request");
        let response = self.make_request(&url).await?;
        let json_text = response.text().await?;

        let records = Self::parse_esummary_response(&json_text)?;
        info!(
            requested = pmids.len(),
            parsed = records.len(),
            "ESummary batch completed"
        );

        Ok(SummaryResult { records })
    }

    /// Parse ESummary JSON into summary records
    ///
    /// A uid listed without a usable detail object yields a record with every
    /// optional field empty instead of an error.
    pub(crate) fn parse_esummary_response(json_text: &str) -> Result<Vec<SummaryRecord>> {
        let response: ESummaryResponse = serde_json::from_str(json_text)?;
        let result = &response.result;

        let uids = result
            .get("uids")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let records = uids
            .into_iter()
            .map(|uid| {
                let doc = match result.get(&uid) {
                    Some(value) => {
                        serde_json::from_value::<ESummaryDocSum>(value.clone()).unwrap_or_else(|e| {
                            warn!(uid = %uid, error = %e, "Unreadable ESummary document");
                            ESummaryDocSum::default()
                        })
                    }
                    None => {
                        warn!(uid = %uid, "UID not found in ESummary response");
                        ESummaryDocSum::default()
                    }
                };
                to_summary_record(uid, doc)
            })
            .collect();

        Ok(records)
    }
}

fn to_summary_record(pmid: String, doc: ESummaryDocSum) -> SummaryRecord {
    let journal = non_empty(doc.fulljournalname).or_else(|| non_empty(doc.source));

    let authors = doc
        .authors
        .into_iter()
        .filter_map(|author| non_empty(author.name))
        .collect();

    SummaryRecord {
        pmid,
        title: doc.title,
        journal,
        pubdate: doc.pubdate,
        authors,
        doi: doc.elocationid.unwrap_or_default(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
