//! Join of summary and abstract records by PMID

use std::collections::HashMap;

use crate::pubmed::models::{AbstractRecord, MergedRecord, SummaryRecord};

/// Attach abstracts to summaries.
///
/// Output order is summary order. Abstracts act as a lookup table keyed by PMID
/// (a later duplicate replaces an earlier one); a summary with no matching
/// abstract gets an empty string.
pub fn merge_records(
    summaries: Vec<SummaryRecord>,
    abstracts: Vec<AbstractRecord>,
) -> Vec<MergedRecord> {
    let by_pmid: HashMap<String, String> = abstracts
        .into_iter()
        .map(|record| (record.pmid, record.abstract_text))
        .collect();

    summaries
        .into_iter()
        .map(|summary| {
            let abstract_text = by_pmid.get(&summary.pmid).cloned().unwrap_or_default();
            MergedRecord {
                summary,
                abstract_text,
            }
        })
        .collect()
}
