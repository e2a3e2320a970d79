//! NDJSON `_msearch` body construction.
//!
//! Each container id contributes a metadata line naming the index and a
//! query line with a `term` on `container_id.keyword` plus a half-open
//! `range` on `last_updated`. Keeping one sub-query per container is what
//! makes `size` a per-container limit.

use chrono::{DateTime, SecondsFormat, Utc};

use vigil_core::SortOrder;

/// Build the `_msearch` request body for a window query.
pub fn build_msearch_body(
    index: &str,
    container_ids: &[String],
    from: DateTime<Utc>,
    till: DateTime<Utc>,
    limit: usize,
    order: SortOrder,
) -> String {
    let mut body = String::new();

    for id in container_ids {
        let meta = serde_json::json!({ "index": index });
        body.push_str(&meta.to_string());
        body.push('\n');

        let query = serde_json::json!({
            "query": {
                "bool": {
                    "must": [
                        { "term": { "container_id.keyword": id } },
                        {
                            "range": {
                                "last_updated": {
                                    "gte": from.to_rfc3339_opts(SecondsFormat::Secs, true),
                                    "lt": till.to_rfc3339_opts(SecondsFormat::Secs, true),
                                }
                            }
                        }
                    ]
                }
            },
            "size": limit,
            "sort": [
                { "counter": { "order": order.as_str() } }
            ]
        });
        body.push_str(&query.to_string());
        body.push('\n');
    }

    body
}
