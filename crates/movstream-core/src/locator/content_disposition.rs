//! Content-Disposition header parsing (filename and filename*).

use super::encoding::decode_component;

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` / `filename='value'` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987)
///
/// Plain `filename` values are percent-decoded once, so `clip%20one.mov` and
/// `clip one.mov` both yield `clip one.mov`. If both `filename` and
/// `filename*` exist, `filename*` takes precedence. A header without a
/// filename parameter yields `None`.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut filename_from_token: Option<String> = None;

    for param in header_value.trim().split(';') {
        let Some((name, v)) = param.trim().split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let v = v.trim();

        if name == "filename*" {
            if let Some(decoded) = extended_value(v) {
                return Some(decoded);
            }
        }

        if name == "filename" {
            let unquoted = unquote(v);
            let decoded = decode_component(&unquoted).unwrap_or(unquoted);
            if !decoded.is_empty() {
                filename_from_token = Some(decoded);
            }
        }
    }

    filename_from_token
}

/// Decodes an RFC 5987 `charset'lang'value`. Only UTF-8 (and its ASCII subset) is accepted.
fn extended_value(v: &str) -> Option<String> {
    let v = unquote(v);
    let mut parts = v.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let value = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        return None;
    }
    decode_component(value).ok().filter(|s| !s.is_empty())
}

fn unquote(v: &str) -> String {
    let quoted = v.len() >= 2
        && ((v.starts_with('"') && v.ends_with('"')) || (v.starts_with('\'') && v.ends_with('\'')));
    if quoted {
        decode_quoted_filename(&v[1..v.len() - 1])
    } else {
        v.to_string()
    }
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
