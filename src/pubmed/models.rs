use serde::{Deserialize, Serialize};

pub const DEFAULT_SEARCH_RETMAX: u32 = 20;
pub const DEFAULT_SEARCH_AND_FETCH_RETMAX: u32 = 10;
pub const DEFAULT_SORT: &str = "relevance";
pub const DEFAULT_DATETYPE: &str = "edat";

/// Parameters for an ESearch call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Free-text search expression
    pub query: String,
    /// Page size
    pub retmax: u32,
    /// Page offset
    pub retstart: u32,
    /// Sort key, passed through to the upstream
    pub sort: String,
    /// Date field the date bounds apply to (e.g. `edat`, `pdat`)
    pub datetype: String,
    /// Lower date bound; omitted from the request when unset
    pub mindate: Option<String>,
    /// Upper date bound; omitted from the request when unset
    pub maxdate: Option<String>,
}

impl SearchParams {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            retmax: DEFAULT_SEARCH_RETMAX,
            retstart: 0,
            sort: DEFAULT_SORT.to_string(),
            datetype: DEFAULT_DATETYPE.to_string(),
            mindate: None,
            maxdate: None,
        }
    }

    pub fn with_retmax(mut self, retmax: u32) -> Self {
        self.retmax = retmax;
        self
    }

    pub fn with_retstart(mut self, retstart: u32) -> Self {
        self.retstart = retstart;
        self
    }

    pub fn with_sort<S: Into<String>>(mut self, sort: S) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_datetype<S: Into<String>>(mut self, datetype: S) -> Self {
        self.datetype = datetype.into();
        self
    }

    pub fn with_mindate<S: Into<String>>(mut self, mindate: S) -> Self {
        self.mindate = Some(mindate.into());
        self
    }

    pub fn with_maxdate<S: Into<String>>(mut self, maxdate: S) -> Self {
        self.maxdate = Some(maxdate.into());
        self
    }
}

/// Result of an ESearch call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matches reported upstream (not the page size)
    pub count: u64,
    /// PMIDs of this page, in upstream order
    pub pmids: Vec<String>,
    /// The query as submitted
    pub query: String,
}

/// Normalised ESummary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub pmid: String,
    pub title: Option<String>,
    /// Full journal name, falling back to the source abbreviation
    pub journal: Option<String>,
    /// Free-form publication date as reported upstream
    pub pubdate: Option<String>,
    pub authors: Vec<String>,
    /// ELocationID; empty when absent
    pub doi: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub records: Vec<SummaryRecord>,
}

/// Title and abstract scanned out of one EFetch article block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractRecord {
    /// Empty when the block carried no PMID
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractResult {
    pub records: Vec<AbstractRecord>,
}

/// Summary record joined with its abstract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(flatten)]
    pub summary: SummaryRecord,
    /// Empty when no abstract was found for this PMID
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// Result of the combined search, summary and abstract pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedResult {
    /// Total match count from the search step
    pub count: u64,
    pub records: Vec<MergedRecord>,
    pub query: String,
}
