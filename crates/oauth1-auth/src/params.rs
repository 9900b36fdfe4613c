//! Request parameters and their normalization.
//!
//! Callers hand over request parameters either as a structured mapping or as
//! a raw query string. Both end up as [`RequestParams`], a mapping from name
//! to a scalar or a sequence of scalars. Top-level `null` and boolean values
//! are turned into the literal strings `"null"`, `"true"` and `"false"`;
//! scalars nested in sequences are stringified when they are flattened for
//! encoding.

use std::collections::BTreeMap;
use std::fmt;

/// A single request parameter value.
///
/// Deserializes from the matching JSON value, so a JSON object can be used
/// directly as a parameter set.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit null.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text value.
    Text(String),
    /// Repeated or bracketed parameter (`tag=a&tag=b`, `ids[]=1`).
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Collect the string form of every scalar in this value, depth first.
    #[must_use]
    pub fn scalars(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars(&self, out: &mut Vec<String>) {
        match self {
            Self::List(items) => {
                for item in items {
                    item.collect_scalars(out);
                }
            }
            scalar => out.push(scalar.to_string()),
        }
    }

    /// Replace a top-level `null` or boolean with its literal string.
    fn stringify_null_bool(self) -> Self {
        match self {
            Self::Null | Self::Bool(_) => Self::Text(self.to_string()),
            other => other,
        }
    }

    /// Append a value, turning a scalar into a two-element list.
    fn push(&mut self, value: Self) {
        match self {
            Self::List(items) => items.push(value),
            scalar => {
                let first = std::mem::replace(scalar, Self::Null);
                *scalar = Self::List(vec![first, value]);
            }
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(","))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Normalized request parameters, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, ParamValue>);

/// The empty parameter set, used when a body is excluded from signing.
pub(crate) static EMPTY_PARAMS: RequestParams = RequestParams(BTreeMap::new());

impl RequestParams {
    /// Create an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Iterate over the parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode a URL query string (`a=1&b=2`) into parameters.
    ///
    /// `+` decodes to a space. Keys with a bracket suffix (`ids[]`, `ids[0]`)
    /// are collected under the bare name as a sequence, and so are repeated
    /// keys. Pairs with an empty name are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use oauth1_auth::params::{ParamValue, RequestParams};
    ///
    /// let params = RequestParams::from_query("q=rust+lang&ids[]=1&ids[]=2");
    /// assert_eq!(params.get("q"), Some(&ParamValue::from("rust lang")));
    /// assert_eq!(params.get("ids"), Some(&ParamValue::from(vec!["1", "2"])));
    /// ```
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params: BTreeMap<String, ParamValue> = BTreeMap::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let (name, bracketed) = split_bracket_suffix(&key);
            if name.is_empty() {
                continue;
            }
            let value = ParamValue::Text(value.into_owned());

            match params.get_mut(name) {
                Some(existing) => existing.push(value),
                None if bracketed => {
                    params.insert(name.to_owned(), ParamValue::List(vec![value]));
                }
                None => {
                    params.insert(name.to_owned(), value);
                }
            }
        }

        Self(params)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Split `name[...]` into `name` and whether a bracket suffix was present.
fn split_bracket_suffix(key: &str) -> (&str, bool) {
    match key.find('[') {
        Some(idx) if idx > 0 && key.ends_with(']') => (&key[..idx], true),
        _ => (key, false),
    }
}

/// Parameters as supplied by the caller, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawParams {
    /// Already-structured parameters.
    Map(RequestParams),
    /// A query-string shaped value such as `a=1&b=2`.
    Query(String),
}

impl Default for RawParams {
    fn default() -> Self {
        Self::Map(RequestParams::new())
    }
}

impl From<RequestParams> for RawParams {
    fn from(params: RequestParams) -> Self {
        Self::Map(params)
    }
}

impl From<BTreeMap<String, ParamValue>> for RawParams {
    fn from(params: BTreeMap<String, ParamValue>) -> Self {
        Self::Map(RequestParams(params))
    }
}

impl From<&str> for RawParams {
    fn from(query: &str) -> Self {
        Self::Query(query.to_owned())
    }
}

impl From<String> for RawParams {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

/// Turn caller-supplied parameters into their canonical form.
///
/// Structured parameters are kept as they are apart from replacing top-level
/// `null` and boolean values with `"null"`, `"true"` or `"false"`. Query
/// strings are decoded first; an empty query yields no parameters.
#[must_use]
pub fn normalize(raw: RawParams) -> RequestParams {
    let params = match raw {
        RawParams::Map(params) => params,
        RawParams::Query(query) => RequestParams::from_query(&query),
    };

    RequestParams(
        params
            .0
            .into_iter()
            .map(|(k, v)| (k, v.stringify_null_bool()))
            .collect(),
    )
}
