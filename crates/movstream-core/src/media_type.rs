//! QuickTime media vocabulary: extensions, MIME families, request headers.

use std::collections::HashMap;

/// File extension that marks QuickTime media.
pub const TARGET_EXTENSION: &str = ".mov";

/// MIME types treated as the QuickTime family.
pub const QUICKTIME_TYPES: [&str; 2] = ["video/quicktime", "video/x-quicktime"];

/// `Accept` header sent with both the HEAD probe and the fallback GET.
pub const ACCEPT: &str = "video/quicktime,video/mp4,*/*";

/// Source types registered on the media element, most specific first.
pub const CANDIDATE_TYPES: [&str; 5] = [
    "video/quicktime",
    "video/mp4",
    "video/x-m4v",
    "video/mpeg",
    "application/octet-stream",
];

/// Buffer type used when the server declares no usable video type.
pub const DEFAULT_VIDEO_TYPE: &str = "video/mp4";

/// Request headers for probe and fetch.
pub fn request_headers() -> HashMap<String, String> {
    HashMap::from([("Accept".to_string(), ACCEPT.to_string())])
}

/// Lowercased type/subtype with parameters stripped (`Video/QuickTime; x=y` -> `video/quicktime`).
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

pub fn is_quicktime_type(content_type: &str) -> bool {
    let essence = essence(content_type);
    QUICKTIME_TYPES.contains(&essence.as_str())
}

/// Case-insensitive `.mov` suffix check.
pub fn has_target_extension(name: &str) -> bool {
    let name = name.trim();
    name.len() >= TARGET_EXTENSION.len()
        && name
            .get(name.len() - TARGET_EXTENSION.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(TARGET_EXTENSION))
}

/// Content type for a fetched buffer: the declared type if it is `video/*`, else the default.
pub fn buffer_type(declared: Option<&str>) -> String {
    match declared {
        Some(ct) if essence(ct).starts_with("video/") => ct.trim().to_string(),
        _ => DEFAULT_VIDEO_TYPE.to_string(),
    }
}

/// Top-level atoms that may open a QuickTime/ISO-BMFF file.
const LEADING_ATOMS: [&[u8; 4]; 7] = [b"ftyp", b"moov", b"mdat", b"wide", b"free", b"skip", b"pnot"];

/// True if `bytes` starts with a QuickTime/MP4 atom header (`size` + known type).
pub fn looks_like_quicktime(bytes: &[u8]) -> bool {
    match bytes.get(4..8) {
        Some(kind) => LEADING_ATOMS.iter().any(|atom| atom.as_slice() == kind),
        None => false,
    }
}
