mod abstracts;
mod summary;

use crate::config::ClientConfig;
use crate::error::{PubMedError, Result};
use crate::pubmed::merge::merge_records;
use crate::pubmed::models::{MergedResult, SearchParams, SearchResult};
use crate::pubmed::responses::ESearchResult;
use crate::retry::with_retry;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

/// Client for the three E-utilities operations the proxy consumes
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    pub(crate) base_url: String,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_proxy::PubMedClient;
    ///
    /// let client = PubMedClient::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new client with custom configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Identification, endpoint, timeout and retry settings
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_proxy::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@university.edu");
    ///
    /// let client = PubMedClient::with_config(config).unwrap();
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a new client around an existing reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        let base_url = config.effective_base_url().to_string();

        Self {
            client,
            base_url,
            config,
        }
    }

    /// Get a reference to the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search PubMed and return the total count plus one page of PMIDs
    ///
    /// `mindate`/`maxdate` are only sent when set.
    ///
    /// # Errors
    ///
    /// * `PubMedError::InvalidQuery` - If the query is blank
    /// * `PubMedError::RequestError` - If the HTTP request fails
    /// * `PubMedError::ApiError` - If NCBI rejects the request
    /// * `PubMedError::JsonError` - If JSON parsing fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_proxy::{PubMedClient, SearchParams};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let result = client
    ///         .search_articles(&SearchParams::new("covid-19 treatment").with_retmax(5))
    ///         .await?;
    ///     println!("{} matches, first page: {:?}", result.count, result.pmids);
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, params), fields(query = %params.query, retmax = params.retmax, retstart = params.retstart))]
    pub async fn search_articles(&self, params: &SearchParams) -> Result<SearchResult> {
        if params.query.trim().is_empty() {
            return Err(PubMedError::InvalidQuery(
                "query must not be empty".to_string(),
            ));
        }

        let url = self.build_search_url(params);

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let json_text = response.text().await?;

        let result = Self::parse_esearch_response(&json_text, &params.query)?;
        info!(
            count = result.count,
            returned = result.pmids.len(),
            "Search completed successfully"
        );

        Ok(result)
    }

    /// Search, then fetch summaries and abstracts for the hits and join them by PMID
    ///
    /// The summary and abstract requests are issued concurrently. Summary order is
    /// kept; a summary without a matching abstract gets an empty one. A failure on
    /// either leg fails the whole call.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pubmed_proxy::{PubMedClient, SearchParams};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new()?;
    ///     let merged = client
    ///         .search_and_fetch(&SearchParams::new("crispr").with_retmax(10))
    ///         .await?;
    ///     for record in &merged.records {
    ///         println!("{}: {:?}", record.summary.pmid, record.summary.title);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, params), fields(query = %params.query, retmax = params.retmax))]
    pub async fn search_and_fetch(&self, params: &SearchParams) -> Result<MergedResult> {
        let search = self.search_articles(params).await?;

        if search.pmids.is_empty() {
            debug!("Search returned no ids, skipping summary and abstract requests");
            return Ok(MergedResult {
                count: search.count,
                records: Vec::new(),
                query: search.query,
            });
        }

        let pmid_refs: Vec<&str> = search.pmids.iter().map(String::as_str).collect();
        let (summaries, abstracts) = tokio::try_join!(
            self.fetch_summaries(&pmid_refs),
            self.fetch_abstracts(&pmid_refs)
        )?;

        let records = merge_records(summaries.records, abstracts.records);
        info!(merged = records.len(), "Search and fetch completed");

        Ok(MergedResult {
            count: search.count,
            records,
            query: search.query,
        })
    }

    fn build_search_url(&self, params: &SearchParams) -> String {
        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmode=json&retmax={}&retstart={}&sort={}&datetype={}",
            self.base_url,
            urlencoding::encode(&params.query),
            params.retmax,
            params.retstart,
            urlencoding::encode(&params.sort),
            urlencoding::encode(&params.datetype),
        );

        if let Some(mindate) = &params.mindate {
            url.push_str(&format!("&mindate={}", urlencoding::encode(mindate)));
        }
        if let Some(maxdate) = &params.maxdate {
            url.push_str(&format!("&maxdate={}", urlencoding::encode(maxdate)));
        }

        url
    }

    /// Parse an ESearch JSON body. A missing wrapper or count means 0, a missing
    /// idlist means no ids.
    pub(crate) fn parse_esearch_response(json_text: &str, query: &str) -> Result<SearchResult> {
        let search_result: ESearchResult = serde_json::from_str(json_text)?;

        // NCBI sometimes returns 200 OK with an ERROR field; whatever ids came back still count
        if let Some(error_msg) = &search_result.esearchresult.error {
            warn!(error = %error_msg, "NCBI ESearch reported an in-band error");
        }

        let count = search_result
            .esearchresult
            .count
            .as_deref()
            .and_then(|c| c.trim().parse().ok())
            .unwrap_or(0);

        Ok(SearchResult {
            count,
            pmids: search_result.esearchresult.idlist,
            query: query.to_string(),
        })
    }

    /// Join ids into the comma-separated batch parameter NCBI expects
    pub(crate) fn join_ids(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Internal helper method for making HTTP requests with retry logic.
    /// Automatically appends API parameters (api_key, email, tool) to the URL.
    pub(crate) async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        let response = with_retry(
            || async {
                debug!("Making API request to: {}", url);
                let response = self
                    .client
                    .get(&final_url)
                    .send()
                    .await
                    .map_err(PubMedError::from)?;

                // Server errors and throttling are surfaced as retryable errors
                if response.status().is_server_error() || response.status().as_u16() == 429 {
                    return Err(PubMedError::ApiError {
                        status: response.status().as_u16(),
                        message: response
                            .status()
                            .canonical_reason()
                            .unwrap_or("Unknown error")
                            .to_string(),
                    });
                }

                Ok(response)
            },
            &self.config.retry_config,
            "NCBI API request",
        )
        .await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PubMedError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}
