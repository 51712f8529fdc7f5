use crate::error::{ResourceError, Result};
use crate::resource::Params;
use reqwest::Url;
use std::collections::BTreeSet;

#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Literal(&'a str),
    Param(&'a str),
}

/// Splits one path segment into literal text and `:name` placeholders.
/// A colon followed only by digits (e.g. a port) stays literal.
fn pieces(segment: &str) -> Vec<Piece<'_>> {
    let mut result = Vec::new();
    let mut literal_start = 0;
    let mut idx = 0;
    let bytes = segment.as_bytes();

    while idx < bytes.len() {
        if bytes[idx] == b':' {
            let name_start = idx + 1;
            let name_end = segment[name_start..]
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .map(|offset| name_start + offset)
                .unwrap_or(segment.len());
            let name = &segment[name_start..name_end];

            if !name.is_empty() && !name.chars().all(|c| c.is_ascii_digit()) {
                if literal_start < idx {
                    result.push(Piece::Literal(&segment[literal_start..idx]));
                }
                result.push(Piece::Param(name));
                literal_start = name_end;
                idx = name_end;
                continue;
            }
        }
        idx += 1;
    }

    if literal_start < segment.len() {
        result.push(Piece::Literal(&segment[literal_start..]));
    }
    result
}

pub fn template_params(template: &str) -> BTreeSet<&str> {
    template
        .split('/')
        .flat_map(pieces)
        .filter_map(|piece| match piece {
            Piece::Param(name) => Some(name),
            Piece::Literal(_) => None,
        })
        .collect()
}

/// Resolves `template` against `base_url`.
///
/// Placeholders take their value from `params`; a placeholder without a value
/// vanishes together with the slash in front of it. Params the template does
/// not mention end up in the query string.
pub fn build_url(base_url: &Url, template: &str, params: &Params) -> Result<Url> {
    let mut url = base_url.clone();

    let segments: Vec<String> = template
        .split('/')
        .map(|segment| {
            pieces(segment)
                .into_iter()
                .map(|piece| match piece {
                    Piece::Literal(text) => text,
                    Piece::Param(name) => params.get(name).map(String::as_str).unwrap_or(""),
                })
                .collect::<String>()
        })
        .filter(|segment| !segment.is_empty())
        .collect();

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ResourceError::InvalidUrl(base_url.to_string()))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    let consumed = template_params(template);
    let query: Vec<(&String, &String)> = params
        .iter()
        .filter(|(key, _)| !consumed.contains(key.as_str()))
        .collect();

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}
