//! Endpoint URL templates and query strings.

use url::Url;

use crate::error::{BoxError, Result};

/// A relative endpoint path with `%s` placeholders, e.g. `legal_hold_policies/%s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate(&'static str);

impl UrlTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn template(&self) -> &'static str {
        self.0
    }

    /// Substitute `args` in order and resolve against `base`.
    ///
    /// Each argument fills exactly one path segment: `/`, `?` and `#` are
    /// percent-encoded and the dot segments `.` and `..` are refused.
    pub fn build(&self, base: &Url, args: &[&str]) -> Result<Url> {
        let mut path = String::with_capacity(self.0.len() + 16);
        let mut args = args.iter();
        let mut rest = self.0;
        while let Some(pos) = rest.find("%s") {
            path.push_str(&rest[..pos]);
            if let Some(arg) = args.next() {
                if matches!(*arg, "." | "..") {
                    return Err(BoxError::InvalidArgument(format!("{arg:?} is not a valid path segment")));
                }
                path.push_str(&urlencoding::encode(arg));
            }
            rest = &rest[pos + 2..];
        }
        path.push_str(rest);
        Ok(base.join(&path)?)
    }

    /// Like [`build`](Self::build), then attach `query` (already encoded).
    pub fn build_with_query(&self, base: &Url, query: &str, args: &[&str]) -> Result<Url> {
        let mut url = self.build(base, args)?;
        let query = query.trim_start_matches('?');
        if !query.is_empty() {
            url.set_query(Some(query));
        }
        Ok(url)
    }
}

/// Accumulates `name=value` pairs and encodes them form-style, so
/// `fields=a,b` goes out as `fields=a%2Cb`.
#[derive(Debug, Clone, Default)]
pub struct QueryStringBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryStringBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_param(&mut self, name: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((name.to_owned(), value.to_string()));
        self
    }

    /// Append `value` only when present.
    pub fn append_opt(&mut self, name: &str, value: Option<impl ToString>) -> &mut Self {
        if let Some(v) = value {
            self.append_param(name, v);
        }
        self
    }

    /// Append `fields=a,b,c`. Nothing is appended for an empty list.
    pub fn append_fields<S: AsRef<str>>(&mut self, fields: &[S]) -> &mut Self {
        if !fields.is_empty() {
            let joined = fields.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
            self.append_param("fields", joined);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://api.box.com/2.0/").unwrap()
    }

    #[test]
    fn substitutes_placeholders_in_order() {
        let t = UrlTemplate::new("legal_hold_policies/%s/assignments");
        let url = t.build(&base(), &["166921"]).unwrap();
        assert_eq!(url.as_str(), "https://api.box.com/2.0/legal_hold_policies/166921/assignments");

        let t = UrlTemplate::new("files/%s/metadata/%s/%s");
        let url = t.build(&base(), &["5010739061", "enterprise", "marketing"]).unwrap();
        assert_eq!(url.path(), "/2.0/files/5010739061/metadata/enterprise/marketing");
    }

    #[test]
    fn arguments_stay_inside_their_segment() {
        let t = UrlTemplate::new("files/%s");
        let url = t.build(&base(), &["../users/me"]).unwrap();
        assert_eq!(url.path(), "/2.0/files/..%2Fusers%2Fme");

        let url = t.build(&base(), &["1?recursive=true#top"]).unwrap();
        assert_eq!(url.path(), "/2.0/files/1%3Frecursive%3Dtrue%23top");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = UrlTemplate::new("files/%s/metadata/%s/%s")
            .build(&base(), &["1", "enterprise_12345", "contract terms"])
            .unwrap();
        assert_eq!(url.path(), "/2.0/files/1/metadata/enterprise_12345/contract%20terms");
    }

    #[test]
    fn dot_segments_are_refused() {
        let t = UrlTemplate::new("folders/%s");
        assert!(matches!(t.build(&base(), &[".."]), Err(BoxError::InvalidArgument(_))));
        assert!(matches!(t.build(&base(), &["."]), Err(BoxError::InvalidArgument(_))));
    }

    #[test]
    fn attaches_encoded_query() {
        let mut q = QueryStringBuilder::new();
        q.append_fields(&["file", "applied_at"]).append_param("limit", 100);
        assert_eq!(q.to_query(), "fields=file%2Capplied_at&limit=100");

        let url = UrlTemplate::new("file_version_retentions")
            .build_with_query(&base(), &q.to_query(), &[])
            .unwrap();
        assert_eq!(url.query(), Some("fields=file%2Capplied_at&limit=100"));
    }

    #[test]
    fn empty_query_leaves_url_bare() {
        let q = QueryStringBuilder::new();
        assert!(q.is_empty());
        let url = UrlTemplate::new("tasks/%s").build_with_query(&base(), &q.to_query(), &["1"]).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn skips_missing_optional_params() {
        let mut q = QueryStringBuilder::new();
        q.append_opt("policy_name", Some("Trial Documents"))
            .append_opt("policy_type", None::<&str>);
        assert_eq!(q.to_query(), "policy_name=Trial+Documents");
    }
}
