//! Path templating and query-string construction.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::LambdogError;
use crate::options::Params;

/// Characters left untouched by `encodeURIComponent`.
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT_ENCODE_SET).to_string()
}

/// Fill `:name` segments of `path` from `params` and append the rest as a
/// query string.
///
/// Each placeholder consumes the first remaining parameter with its name, so
/// that entry does not show up in the query. Remaining parameters keep their
/// order. A placeholder without a parameter is an error.
pub fn build_url(path: &str, params: &Params) -> Result<String, LambdogError> {
    let mut remaining = params.clone();

    let segments = path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => remaining
                .take(name)
                .map(|value| encode(&value))
                .ok_or_else(|| LambdogError::MissingParam {
                    name: name.to_string(),
                }),
            None => Ok(segment.to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut url = segments.join("/");
    if !remaining.is_empty() {
        let query = remaining
            .iter()
            .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    Ok(url)
}
