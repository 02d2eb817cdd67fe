use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchResult {
    #[serde(default)]
    pub esearchresult: ESearchData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
}

// ESummary API response structures

/// ESummary returns a JSON object with "result" containing "uids" array and per-UID objects.
/// We use serde_json::Value to handle the dynamic per-UID keys, then parse manually.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESummaryResponse {
    #[serde(default)]
    pub result: serde_json::Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESummaryAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESummaryDocSum {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub fulljournalname: Option<String>,
    #[serde(default)]
    pub pubdate: Option<String>,
    #[serde(default)]
    pub authors: Vec<ESummaryAuthor>,
    #[serde(default)]
    pub elocationid: Option<String>,
}
