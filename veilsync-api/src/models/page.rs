use serde::{Deserialize, Serialize};

/// Query string accepted by the history listing.
#[cfg_attr(feature = "docs", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "docs", into_params(parameter_in = Query))]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Restrict the listing to one device
    pub device_id: Option<String>,
    /// One-based page number
    pub page: Option<i64>,
    /// Page size
    pub limit: Option<i64>,
}

/// Pagination envelope, newest first.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub page: u64,
    pub total_pages: u64,
    pub total_docs: u64,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, page: u64, limit: u64, total_docs: u64) -> Self {
        Self {
            docs,
            page,
            total_pages: total_docs.div_ceil(limit.max(1)),
            total_docs,
        }
    }

    /// Converts every document, keeping the envelope.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            docs: self.docs.into_iter().map(f).collect::<Result<_, _>>()?,
            page: self.page,
            total_pages: self.total_pages,
            total_docs: self.total_docs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<u8> = Page::new(vec![], 4, 10, 23);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_docs, 23);
        assert!(page.docs.is_empty());
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 0);

        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_try_map_keeps_envelope() {
        let page = Page::new(vec!["1", "2"], 2, 2, 4);
        let parsed: Page<u8> = page.try_map(|s| s.parse::<u8>()).unwrap();

        assert_eq!(parsed.docs, vec![1, 2]);
        assert_eq!(parsed.page, 2);
        assert_eq!(parsed.total_pages, 2);

        let broken = Page::new(vec!["x"], 1, 1, 1);
        assert!(broken.try_map(|s| s.parse::<u8>()).is_err());
    }

    #[test]
    fn test_envelope_field_names() {
        let page = Page::new(vec![1u8], 1, 10, 1);
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["totalPages"], 1);
        assert_eq!(value["totalDocs"], 1);
        assert_eq!(value["docs"][0], 1);
    }
}
