//! Request URL construction - pure functions, no I/O

use crate::ingestion::error::FetchError;
use crate::ingestion::types::{CensusQuery, Query};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;
use url::Url;

pub const CENSUS_BASE_URL: &str = "https://api.census.gov/data";

/// Characters escaped in any query component. `:`, `*`, `,`, `(` and `)`
/// stay literal since geography and group syntax relies on them. `%` and `+`
/// are left alone so pre-encoded input passes through; see `escape_stray_percent`.
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'\'')
    .add(b';')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Variables are joined with commas, so a comma inside a name must be escaped
const LIST_ITEM: &AsciiSet = &COMPONENT.add(b',');

const PATH_SEGMENT: &AsciiSet = &LIST_ITEM.add(b'/');

/// Build the request URL for a structured query against `base`
///
/// Layout: `{base}/{year}/{dataset}?get={v1,v2,...}{geography}&key={api_key}`
pub fn build_url(base: &str, query: &CensusQuery) -> String {
    let variables = query
        .variables
        .iter()
        .map(|v| encode(v, LIST_ITEM))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}/{}/{}?get={}{}&key={}",
        base.trim_end_matches('/'),
        encode_path(&query.year),
        encode_path(&query.dataset),
        variables,
        encode_geography(&query.geography),
        encode(&query.api_key, LIST_ITEM),
    )
}

/// Resolve any query to the URL that will be requested
pub fn resolve_url(base: &str, query: &Query) -> Result<String, FetchError> {
    match query {
        Query::Structured(q) => Ok(build_url(base, q)),
        Query::Raw(raw) => {
            validate_raw_url(raw)?;
            Ok(raw.trim().to_string())
        }
    }
}

/// A raw URL is sent verbatim, but it has to be an absolute http(s) URL
pub fn validate_raw_url(raw: &str) -> Result<(), FetchError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Encode each `/`-separated segment, keeping the separators (`acs/acs5`)
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(|segment| encode(segment, PATH_SEGMENT))
        .collect::<Vec<_>>()
        .join("/")
}

/// Re-emit a geography fragment such as `&for=county:*&in=state:06` with
/// each key and value escaped. Every clause is prefixed with `&`.
pub fn encode_geography(geography: &str) -> String {
    let mut encoded = String::new();

    for clause in geography.split('&').filter(|c| !c.is_empty()) {
        encoded.push('&');
        match clause.split_once('=') {
            Some((key, value)) => {
                encoded.push_str(&encode(key, COMPONENT));
                encoded.push('=');
                encoded.push_str(&encode(value, COMPONENT));
            }
            None => encoded.push_str(&encode(clause, COMPONENT)),
        }
    }

    encoded
}

/// Percent-encode `input`, keeping any `%XX` escapes the caller already applied
fn encode(input: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(&escape_stray_percent(input), set).to_string()
}

/// Turn every `%` that does not start a valid `%XX` escape into `%25`
fn escape_stray_percent(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut escaped = String::with_capacity(input.len() + 4);
    for (i, c) in input.char_indices() {
        let valid_escape = c == '%'
            && bytes
                .get(i + 1..i + 3)
                .map_or(false, |hex| hex.iter().all(u8::is_ascii_hexdigit));
        if c == '%' && !valid_escape {
            escaped.push_str("%25");
        } else {
            escaped.push(c);
        }
    }

    Cow::Owned(escaped)
}
