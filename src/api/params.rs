//! Query-string parameters shared by the listing endpoints.

use serde::Deserialize;

use crate::config::{clamp_limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MAX_OFFSET};

/// `skip`/`limit`/`ordering` as accepted by every paged listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub ordering: Option<String>,
}

impl ListParams {
    pub fn offset(&self) -> u64 {
        self.skip.unwrap_or(0).min(MAX_OFFSET)
    }

    pub fn limit(&self) -> u64 {
        clamp_limit(self.limit.unwrap_or(DEFAULT_LIST_LIMIT), MAX_LIST_LIMIT)
    }

    pub fn ordering(&self, default: &str) -> Vec<String> {
        parse_ordering(self.ordering.as_deref().unwrap_or(default))
    }
}

/// Splits `"popular, -id"` into `["popular", "-id"]`. Whitespace is dropped and
/// empty segments are ignored; unknown keys are left for the registry to reject.
pub fn parse_ordering(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|segment| segment.split_whitespace().collect::<String>())
        .filter(|segment| !segment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_split_and_stripped() {
        assert_eq!(parse_ordering("popular, -id"), vec!["popular", "-id"]);
        assert_eq!(parse_ordering(" - price ,,"), vec!["-price"]);
        assert!(parse_ordering("").is_empty());
        assert_eq!(parse_ordering("colour"), vec!["colour"]);
    }

    #[test]
    fn paging_defaults_and_ceiling() {
        let params = ListParams::default();
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), DEFAULT_LIST_LIMIT);
        assert_eq!(params.ordering("id"), vec!["id"]);

        let params = ListParams {
            skip: Some(40),
            limit: Some(500),
            ordering: Some("-new".into()),
        };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), MAX_LIST_LIMIT);
        assert_eq!(params.ordering("id"), vec!["-new"]);
    }

    #[test]
    fn huge_skip_is_capped_to_bigint() {
        let params = ListParams {
            skip: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(params.offset(), MAX_OFFSET);
        assert_eq!(params.offset(), i64::MAX as u64);
    }
}
