use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw row as returned by the CRM: field name to JSON value. Salesforce adds an `attributes`
/// object to each row, which nothing here reads.
pub type Record = Map<String, Value>;

/// The body of a Salesforce `query` response.
///
/// ```json
/// {
///   "totalSize": 2,
///   "done": true,
///   "records": [
///     {"attributes": {"type": "Contact"}, "AccountId": "0013t00001abcDE", "Name": "Jane Doe"},
///     {"attributes": {"type": "Contact"}, "AccountId": "0013t00001abcDE", "Name": "John Doe"}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub total_size: u64,
    pub done: bool,
    /// Present when `done` is false. A path, relative to the instance URL, for the next batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
    pub records: Vec<Record>,
}

impl QueryResponse {
    /// A complete, single-batch response holding `records`.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            total_size: records.len() as u64,
            done: true,
            next_records_url: None,
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_query_response() {
        let json = r#"{
            "totalSize": 3,
            "done": false,
            "nextRecordsUrl": "/services/data/v59.0/query/01gD0000002HU6KIAW-2000",
            "records": [
                {"attributes": {"type": "Opportunity"}, "Amount": 50.0, "CloseDate": "2016-10-31", "AccountId": "1"}
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_size, 3);
        assert!(!response.done);
        assert_eq!(
            response.next_records_url.as_deref(),
            Some("/services/data/v59.0/query/01gD0000002HU6KIAW-2000")
        );
        assert_eq!(response.records.len(), 1);
        assert_eq!(response.records[0]["CloseDate"], "2016-10-31");
    }

    #[test]
    fn test_deserialize_last_batch() {
        let json = r#"{"totalSize": 0, "done": true, "records": []}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response, QueryResponse::new(Vec::new()));
    }
}
