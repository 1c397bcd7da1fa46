use std::fmt;

/// Fully composed archive request, minus the continuation cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTarget {
    /// `<archive>/api/archive/<instance>`, no trailing slash.
    pub base: String,
    /// Entity sub-path starting with `/`, e.g. `/parameters/sat/voltage/samples`.
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl WireTarget {
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn url(&self) -> String {
        self.page_url(None)
    }

    /// URL of the page following `continuation`, or of the first page.
    pub fn page_url(&self, continuation: Option<&str>) -> String {
        let mut url = format!("{}{}", self.base, self.path);
        let mut sep = '?';

        for (key, value) in &self.query {
            url.push(sep);
            url.push_str(key);
            url.push('=');
            url.push_str(value);
            sep = '&';
        }

        if let Some(token) = continuation {
            url.push(sep);
            url.push_str("next=");
            url.push_str(&urlencoding::encode(token));
        }

        url
    }
}

impl fmt::Display for WireTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}
