use serde_json::Value;

pub const CONTINUATION_TOKEN_KEY: &str = "continuationToken";

/// One archive response, split into its records and paging cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchivePage {
    pub records: Vec<Value>,
    pub continuation_token: Option<String>,
}

impl ArchivePage {
    /// Takes the records stored under `key`. A missing key, or one that is
    /// not an array, is an empty page.
    pub fn from_payload(mut payload: Value, key: &str) -> Self {
        let continuation_token = payload
            .get(CONTINUATION_TOKEN_KEY)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let records = match payload.get_mut(key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        Self {
            records,
            continuation_token,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
