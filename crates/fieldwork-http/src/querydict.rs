//! Submitted form parameters.
//!
//! A [`QueryDict`] is what every validation entry point reads. Parsed
//! submissions are frozen; edits go through [`QueryDict::copy`].

use fieldwork_core::utils::MultiValueDict;
use fieldwork_core::{FieldworkError, FieldworkResult};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

/// The parameters of one submission: keys in first-submitted order, each
/// with one or more values.
///
/// ```
/// use fieldwork_http::QueryDict;
///
/// let qd = QueryDict::parse("row-0-name=Ann&row-1-name=Bo&tags=a&tags=b");
/// assert_eq!(qd.get("row-1-name"), Some("Bo"));
/// assert_eq!(qd.get_list("tags"), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(qd.keys().collect::<Vec<_>>(), ["row-0-name", "row-1-name", "tags"]);
///
/// let mut edited = qd.copy();
/// edited.set("tags", "c").unwrap();
/// assert_eq!(edited.get("tags"), Some("c"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDict {
    params: MultiValueDict<String, String>,
    mutable: bool,
}

impl QueryDict {
    /// An empty, frozen dict: a submission with nothing in it.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty dict that accepts writes.
    pub fn new_mutable() -> Self {
        Self {
            mutable: true,
            ..Self::default()
        }
    }

    /// Decodes `application/x-www-form-urlencoded` text.
    ///
    /// `+` is a space, and a pair without `=` has an empty value. Empty
    /// pairs (`a=1&&b=2`) are skipped.
    pub fn parse(encoded: &str) -> Self {
        let params = encoded
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self {
            params,
            mutable: false,
        }
    }

    /// A frozen dict from already-decoded pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            params: pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            mutable: false,
        }
    }

    /// The last value submitted under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.params.get_list(key)
    }

    /// The non-empty values under `key`. Empty when the field was left
    /// blank or never sent.
    pub fn submitted(&self, key: &str) -> Vec<&str> {
        self.get_list(key)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect()
    }

    pub fn has_value(&self, key: &str) -> bool {
        !self.submitted(key).is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// A writable duplicate.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            params: self.params.clone(),
            mutable: true,
        }
    }

    /// Replaces every value under `key` with `value`.
    ///
    /// # Errors
    ///
    /// [`FieldworkError::SuspiciousOperation`] on a frozen dict.
    pub fn set(&mut self, key: &str, value: &str) -> FieldworkResult<()> {
        self.writable()?.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// # Errors
    ///
    /// [`FieldworkError::SuspiciousOperation`] on a frozen dict.
    pub fn append(&mut self, key: &str, value: &str) -> FieldworkResult<()> {
        self.writable()?.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// # Errors
    ///
    /// [`FieldworkError::SuspiciousOperation`] on a frozen dict.
    pub fn remove(&mut self, key: &str) -> FieldworkResult<Option<Vec<String>>> {
        Ok(self.writable()?.remove(key))
    }

    fn writable(&mut self) -> FieldworkResult<&mut MultiValueDict<String, String>> {
        if !self.mutable {
            return Err(FieldworkError::SuspiciousOperation(
                "submitted parameters are read-only; edit a copy()".to_string(),
            ));
        }
        Ok(&mut self.params)
    }

    /// Re-encodes the dict, key by key in order.
    pub fn urlencode(&self) -> String {
        let mut pairs = Vec::new();
        for (key, values) in &self.params {
            let key = utf8_percent_encode(key, NON_ALPHANUMERIC);
            pairs.extend(
                values
                    .iter()
                    .map(|value| format!("{key}={}", utf8_percent_encode(value, NON_ALPHANUMERIC))),
            );
        }
        pairs.join("&")
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
