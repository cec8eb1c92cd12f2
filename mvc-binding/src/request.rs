//! Request snapshot
//!
//! The hosting layer captures everything binding may look at into one
//! immutable [`RequestContext`] before binding starts. Nothing here reads
//! from a socket; body bytes are already buffered.

/// Content types that make the form a binding source
const FORM_CONTENT_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];

/// Immutable per-request input for binding
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    query: Vec<(String, String)>,
    route_values: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append pairs parsed from a raw query string (leading `?` allowed)
    pub fn with_query_string(mut self, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        self.query.extend(parse_urlencoded(query.as_bytes()));
        self
    }

    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_route_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_values.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(value.clone());
        }
        self.headers.push((name, value));
        self
    }

    /// Set the content type without recording a header pair
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Form fields already parsed by the host (multipart, for instance)
    ///
    /// The fields only take part in binding when the request carries a
    /// form content type.
    pub fn with_form<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.form = Some(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn route_values(&self) -> &[(String, String)] {
        &self.route_values
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// All values of a header, matched case-insensitively, in arrival order
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Media type without parameters, lowercased
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    pub fn has_form_content_type(&self) -> bool {
        self.media_type()
            .map(|mt| FORM_CONTENT_TYPES.contains(&mt.as_str()))
            .unwrap_or(false)
    }

    pub fn has_json_content_type(&self) -> bool {
        self.media_type()
            .map(|mt| mt == "application/json" || mt.ends_with("+json"))
            .unwrap_or(false)
    }

    /// Form fields visible to binding
    ///
    /// `None` unless the request has a form content type. Explicit fields
    /// win; otherwise a url-encoded body is parsed.
    pub fn form_pairs(&self) -> Option<Vec<(String, String)>> {
        if !self.has_form_content_type() {
            return None;
        }

        if let Some(form) = &self.form {
            return Some(form.clone());
        }

        match (self.media_type().as_deref(), &self.body) {
            (Some("application/x-www-form-urlencoded"), Some(body)) => {
                Some(parse_urlencoded(body).collect())
            }
            _ => Some(Vec::new()),
        }
    }
}

fn parse_urlencoded(input: &[u8]) -> impl Iterator<Item = (String, String)> + '_ {
    form_urlencoded::parse(input).map(|(k, v)| (k.into_owned(), v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_parsing() {
        let request = RequestContext::new().with_query_string("?parameter=&name=Billy+Bob&tag=a%26b");

        assert_eq!(
            request.query_pairs(),
            &[
                ("parameter".to_string(), String::new()),
                ("name".to_string(), "Billy Bob".to_string()),
                ("tag".to_string(), "a&b".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_key_without_equals() {
        let request = RequestContext::new().with_query_string("flag");
        assert_eq!(request.query_pairs(), &[("flag".to_string(), String::new())]);
    }

    #[test]
    fn test_form_requires_form_content_type() {
        let request = RequestContext::new().with_form(vec![("Name", "Billy")]);
        assert!(request.form_pairs().is_none());

        let request = request.with_content_type("application/x-www-form-urlencoded; charset=utf-8");
        assert_eq!(
            request.form_pairs().unwrap(),
            vec![("Name".to_string(), "Billy".to_string())]
        );
    }

    #[test]
    fn test_form_parsed_from_urlencoded_body() {
        let request = RequestContext::new()
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body("Name=Billy&Age=12");

        assert_eq!(
            request.form_pairs().unwrap(),
            vec![
                ("Name".to_string(), "Billy".to_string()),
                ("Age".to_string(), "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_header_values_case_insensitive() {
        let request = RequestContext::new()
            .with_header("X-Tag", "one")
            .with_header("x-tag", "two");

        assert_eq!(request.header_values("X-TAG"), vec!["one", "two"]);
        assert!(request.header_values("missing").is_empty());
    }

    #[test]
    fn test_json_content_type() {
        let request = RequestContext::new().with_content_type("application/problem+json");
        assert!(request.has_json_content_type());
        assert!(!request.has_form_content_type());
    }
}
