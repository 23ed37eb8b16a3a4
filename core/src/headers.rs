use std::collections::HashMap;

use http::header::HeaderName;
use http::HeaderMap;
use http::HeaderValue;

use crate::Error;
use crate::Result;

/// Header input in any of the supported representations.
///
/// All three shapes normalize to the same lowercase-keyed, unique
/// [`HeaderMap`]; nothing downstream ever discriminates on the shape again.
#[derive(Debug, Clone)]
pub enum Headers {
    /// A list of `(name, value)` pairs.
    Pairs(Vec<(String, String)>),
    /// A string-keyed mapping.
    Map(HashMap<String, String>),
    /// An already-built header collection.
    Collection(HeaderMap),
}

impl Headers {
    /// Normalize into a lowercase-keyed, unique header map.
    ///
    /// Later entries win on duplicate names. Multi-valued collection entries
    /// are collapsed into a single `", "`-joined value.
    pub fn into_header_map(self) -> Result<HeaderMap> {
        match self {
            Headers::Pairs(pairs) => build_unique(pairs.into_iter()),
            Headers::Map(map) => build_unique(map.into_iter()),
            Headers::Collection(map) => collapse(map),
        }
    }
}

fn build_unique(entries: impl Iterator<Item = (String, String)>) -> Result<HeaderMap> {
    let mut out = HeaderMap::new();
    for (name, value) in entries {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::headers_invalid(format!("invalid header name: {name}")).with_source(e))?;
        let value = HeaderValue::try_from(value.as_str()).map_err(|e| {
            Error::headers_invalid(format!("invalid value for header {name}")).with_source(e)
        })?;
        // Insert replaces: the last write for a name wins.
        out.insert(name, value);
    }
    Ok(out)
}

fn collapse(map: HeaderMap) -> Result<HeaderMap> {
    let mut out = HeaderMap::with_capacity(map.keys_len());
    for name in map.keys() {
        let values: Vec<&HeaderValue> = map.get_all(name).iter().collect();
        let value = if values.len() == 1 {
            values[0].clone()
        } else {
            let mut joined = Vec::new();
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    joined.extend_from_slice(b", ");
                }
                joined.extend_from_slice(v.as_bytes());
            }
            HeaderValue::from_bytes(&joined).map_err(|e| {
                Error::headers_invalid(format!("invalid combined value for header {name}"))
                    .with_source(e)
            })?
        };
        out.insert(name.clone(), value);
    }
    Ok(out)
}

impl From<Vec<(String, String)>> for Headers {
    fn from(value: Vec<(String, String)>) -> Self {
        Headers::Pairs(value)
    }
}

impl From<Vec<(&str, &str)>> for Headers {
    fn from(value: Vec<(&str, &str)>) -> Self {
        Headers::Pairs(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Headers {
    fn from(value: [(&str, &str); N]) -> Self {
        Headers::Pairs(
            value
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(value: HashMap<String, String>) -> Self {
        Headers::Map(value)
    }
}

impl From<HeaderMap> for Headers {
    fn from(value: HeaderMap) -> Self {
        Headers::Collection(value)
    }
}
