//! Select handler request and response models
//!
//! These are the wire shapes of the index's JSON select API, kept apart from
//! the domain records they carry.

use crate::domain::RawDocument;
use serde::Deserialize;
use serde_json::Value;

/// One page request against the select handler
#[derive(Debug, Clone, PartialEq)]
pub struct SelectRequest {
    /// Main query (`q`)
    pub query: String,

    /// Optional filter query (`fq`)
    pub filter: Option<String>,

    /// Optional sort expression
    pub sort: Option<String>,

    /// Field list (`fl`), may contain `alias:field` entries
    pub fields: Vec<String>,

    /// Offset of the first document
    pub start: u64,

    /// Page size
    pub rows: usize,
}

impl SelectRequest {
    /// Query parameters in the order they are sent
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", self.query.clone()),
            ("rows", self.rows.to_string()),
            ("start", self.start.to_string()),
            ("fl", self.fields.join(",")),
            ("wt", "json".to_string()),
        ];
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(filter) = &self.filter {
            params.push(("fq", filter.clone()));
        }
        params
    }
}

/// One page of documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectPage {
    pub docs: Vec<RawDocument>,

    /// Total number of matches reported by the index
    pub num_found: u64,
}

/// Top-level select response body
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    pub response: SelectResponseBody,
}

/// `response` member of the select body
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponseBody {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,

    /// Documents are decoded one at a time so a malformed one cannot fail the page
    #[serde(default)]
    pub docs: Vec<Value>,
}

impl From<SelectResponse> for SelectPage {
    /// A document that is not a JSON object becomes an empty document, which
    /// the transformer rejects for its missing identifier.
    fn from(body: SelectResponse) -> Self {
        let docs = body
            .response
            .docs
            .into_iter()
            .map(|value| {
                RawDocument::from_value(value).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Undecodable document in select response");
                    RawDocument::default()
                })
            })
            .collect();

        Self {
            docs,
            num_found: body.response.num_found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_without_filter() {
        let request = SelectRequest {
            query: "*:*".to_string(),
            filter: None,
            sort: None,
            fields: vec!["id".to_string(), "XY:producedBy_samplingSite_location_ll".to_string()],
            start: 20,
            rows: 10,
        };
        let params = request.to_params();
        assert!(params.contains(&("fl", "id,XY:producedBy_samplingSite_location_ll".to_string())));
        assert!(params.contains(&("start", "20".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "fq" || *k == "sort"));
    }

    #[test]
    fn test_params_with_filter_and_sort() {
        let request = SelectRequest {
            query: "*:*".to_string(),
            filter: Some("indexUpdatedTime:[2023-01-01T00:00:00.000Z TO *]".to_string()),
            sort: Some("indexUpdatedTime asc".to_string()),
            fields: vec!["id".to_string()],
            start: 0,
            rows: 10,
        };
        let params = request.to_params();
        assert!(params.contains(&("sort", "indexUpdatedTime asc".to_string())));
        assert!(params.contains(&(
            "fq",
            "indexUpdatedTime:[2023-01-01T00:00:00.000Z TO *]".to_string()
        )));
    }

    #[test]
    fn test_response_deserialization() {
        let body: SelectResponse = serde_json::from_str(
            r#"{"responseHeader":{"status":0},"response":{"numFound":2,"start":0,"docs":[{"id":"a"},{"id":"b","XY":"1.0,2.0"}]}}"#,
        )
        .unwrap();
        let page = SelectPage::from(body);
        assert_eq!(page.num_found, 2);
        assert_eq!(page.docs.len(), 2);
        assert_eq!(page.docs[1].xy.as_deref(), Some("1.0,2.0"));
    }

    #[test]
    fn test_odd_document_does_not_fail_page() {
        let body: SelectResponse = serde_json::from_str(
            r#"{"response":{"numFound":3,"docs":[{"id":"a","source":["SESAR"]},42,{"id":"c","XY":"1.0,2.0"}]}}"#,
        )
        .unwrap();
        let page = SelectPage::from(body);
        assert_eq!(page.docs.len(), 3);
        assert_eq!(page.docs[0].id.as_deref(), Some("a"));
        assert!(page.docs[0].source.is_none());
        assert_eq!(page.docs[1], RawDocument::default());
        assert_eq!(page.docs[2].id.as_deref(), Some("c"));
    }
}
