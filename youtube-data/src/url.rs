//! Query-string construction for API and token endpoint URLs.

use std::borrow::Cow;

/// An enum that can be rendered as a query parameter.
pub trait QueryEnum {
    /// The wire value, e.g. `contentDetails`.
    fn query_value(&self) -> &'static str;

    /// The Rust-side variant name, used when enum values are not unwrapped.
    fn variant_name(&self) -> &'static str;
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// No value. Rendered as a bare key, or dropped with [`UrlOptions::remove_none`].
    Null,
    /// A plain string value.
    Text(String),
    /// An enum value; see [`UrlOptions::enum_value`].
    Enum {
        value: &'static str,
        variant: &'static str,
    },
    /// A list of values; see [`UrlOptions::split_lists`].
    List(Vec<QueryValue>),
}

impl QueryValue {
    /// Wraps an enum implementing [`QueryEnum`].
    pub fn enumerated<E: QueryEnum>(e: E) -> Self {
        Self::Enum {
            value: e.query_value(),
            variant: e.variant_name(),
        }
    }

    /// Builds a list value from anything string-like.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(|v| Self::Text(v.into())).collect())
    }

    /// Renders the value into a single text value, so a list is comma-joined and never split.
    pub(crate) fn joined(&self, opts: &UrlOptions) -> Self {
        match self.render(opts) {
            Some(text) => Self::Text(text.into_owned()),
            None => Self::Null,
        }
    }

    fn render(&self, opts: &UrlOptions) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(Cow::Borrowed(s)),
            Self::Enum { value, variant } => {
                Some(Cow::Borrowed(if opts.enum_value { value } else { variant }))
            }
            Self::List(values) => Some(Cow::Owned(
                values
                    .iter()
                    .filter_map(|v| v.render(opts))
                    .collect::<Vec<_>>()
                    .join(","),
            )),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Text(b.to_string())
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Text(n.to_string())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Switches controlling how [`build_url`] renders parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlOptions {
    /// Drop parameters whose value is [`QueryValue::Null`].
    pub remove_none: bool,
    /// Render list values as one repeated key per element instead of a comma-joined value.
    pub split_lists: bool,
    /// Render enums by their wire value rather than their variant name.
    pub enum_value: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            remove_none: false,
            split_lists: false,
            enum_value: true,
        }
    }
}

/// Ordered query parameters.
pub type QueryParams = Vec<(&'static str, QueryValue)>;

/// Renders `base` plus `params` into a URL.
///
/// Parameters keep their given order. Values are form-urlencoded. If no parameter survives, the
/// URL has no `?`.
pub fn build_url(base: &str, params: &[(&str, QueryValue)], opts: UrlOptions) -> String {
    let mut query = String::new();
    let mut push = |key: &str, value: Option<&str>| {
        if !query.is_empty() {
            query.push('&');
        }
        query.extend(form_urlencoded::byte_serialize(key.as_bytes()));
        if let Some(value) = value {
            query.push('=');
            query.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }
    };

    for (key, value) in params {
        match value {
            QueryValue::Null if opts.remove_none => continue,
            QueryValue::List(values) if opts.split_lists => {
                for v in values {
                    if matches!(v, QueryValue::Null) && opts.remove_none {
                        continue;
                    }
                    push(key, v.render(&opts).as_deref());
                }
            }
            _ => push(key, value.render(&opts).as_deref()),
        }
    }

    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy)]
    enum Order {
        Relevance,
    }

    impl QueryEnum for Order {
        fn query_value(&self) -> &'static str {
            "relevance"
        }

        fn variant_name(&self) -> &'static str {
            match self {
                Self::Relevance => "Relevance",
            }
        }
    }

    const BASE: &str = "https://example.com/api";

    #[test]
    fn test_remove_none() {
        let params = [("a", QueryValue::from("1")), ("b", QueryValue::Null)];
        let opts = UrlOptions {
            remove_none: true,
            ..Default::default()
        };
        assert_eq!(build_url(BASE, &params, opts), format!("{BASE}?a=1"));

        let opts = UrlOptions {
            remove_none: false,
            ..Default::default()
        };
        assert_eq!(build_url(BASE, &params, opts), format!("{BASE}?a=1&b"));
    }

    #[test]
    fn test_only_none_yields_bare_url() {
        let params = [("pageToken", QueryValue::Null)];
        let opts = UrlOptions {
            remove_none: true,
            ..Default::default()
        };
        assert_eq!(build_url(BASE, &params, opts), BASE);
        assert_eq!(build_url(BASE, &[], UrlOptions::default()), BASE);
    }

    #[test]
    fn test_split_lists() {
        let params = [
            ("id", QueryValue::list(["x", "y", "z"])),
            ("part", QueryValue::from("snippet")),
        ];
        let opts = UrlOptions {
            split_lists: true,
            ..Default::default()
        };
        assert_eq!(
            build_url(BASE, &params, opts),
            format!("{BASE}?id=x&id=y&id=z&part=snippet")
        );

        let opts = UrlOptions {
            split_lists: false,
            ..Default::default()
        };
        assert_eq!(
            build_url(BASE, &params, opts),
            format!("{BASE}?id=x%2Cy%2Cz&part=snippet")
        );
    }

    #[test]
    fn test_enum_value() {
        let params = [("order", QueryValue::enumerated(Order::Relevance))];
        assert_eq!(
            build_url(BASE, &params, UrlOptions::default()),
            format!("{BASE}?order=relevance")
        );
        let opts = UrlOptions {
            enum_value: false,
            ..Default::default()
        };
        assert_eq!(
            build_url(BASE, &params, opts),
            format!("{BASE}?order=Relevance")
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let params = [("q", QueryValue::from("a b&c=d"))];
        assert_eq!(
            build_url(BASE, &params, UrlOptions::default()),
            format!("{BASE}?q=a+b%26c%3Dd")
        );
    }
}
