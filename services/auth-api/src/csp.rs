//! Content-Security-Policy header construction

use axum::http::HeaderValue;

/// Ordered set of CSP directives
#[derive(Debug, Clone, Default)]
pub struct ContentSecurityPolicy {
    directives: Vec<(String, Vec<String>)>,
}

impl ContentSecurityPolicy {
    /// Empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for a JSON API that never serves renderable content
    pub fn strict() -> Self {
        Self::new()
            .directive("default-src", ["'none'"])
            .directive("frame-ancestors", ["'none'"])
    }

    /// Add a directive. Adding an existing directive replaces its sources.
    pub fn directive<I, S>(mut self, name: &str, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources: Vec<String> = sources.into_iter().map(Into::into).collect();
        match self.directives.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = sources,
            None => self.directives.push((name.to_string(), sources)),
        }
        self
    }

    /// Serialized header value, e.g. `default-src 'none'; frame-ancestors 'none'`
    pub fn render(&self) -> String {
        self.directives
            .iter()
            .map(|(name, sources)| {
                if sources.is_empty() {
                    name.clone()
                } else {
                    format!("{} {}", name, sources.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Header value for the response layer
    pub fn header_value(&self) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
        HeaderValue::from_str(&self.render())
    }
}
