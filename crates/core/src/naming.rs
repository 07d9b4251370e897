//! Remote object naming and path-encoding rules.
//!
//! Two naming schemes exist side by side:
//!
//! - Non-descriptor uploads get a timestamp-qualified name,
//!   `{owner}/{unix_millis}-{sanitized name}`, so repeated uploads of
//!   the same file never collide.
//! - NFT descriptor files are named deterministically,
//!   `{owner}/{stem}.{ext}`, so re-uploading the same logical target
//!   overwrites the previous descriptor set.
//!
//! Public URLs embed the object path encoded as a single URI
//! component (`/` becomes `%2F`), matching how the store addresses
//! public objects.

/// Replace whitespace runs in an original filename with hyphens.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_gap = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_gap {
                out.push('-');
                in_gap = true;
            }
        } else {
            out.push(ch);
            in_gap = false;
        }
    }
    out
}

/// Object path for a collision-safe upload:
/// `{owner}/{unix_millis}-{sanitized name}`.
pub fn timestamped_object_path(owner_id: &str, file_name: &str, unix_millis: i64) -> String {
    format!("{owner_id}/{unix_millis}-{}", sanitize_file_name(file_name))
}

/// Deterministic object path for one NFT descriptor file:
/// `{owner}/{stem}.{ext}`. Re-uploads of the same logical target
/// intentionally collide.
pub fn descriptor_object_path(owner_id: &str, stem: &str, extension: &str) -> String {
    format!("{owner_id}/{stem}.{extension}")
}

/// Shared base path of a descriptor set, without extension:
/// `{owner}/{stem}`.
pub fn descriptor_base_path(owner_id: &str, stem: &str) -> String {
    format!("{owner_id}/{stem}")
}

// ---------------------------------------------------------------------------
// Percent encoding
// ---------------------------------------------------------------------------

/// Characters left bare when encoding a path as one URI component.
fn is_component_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'!' | b'*' | b'\'' | b'(' | b')')
}

/// Encode an object path as a single URI component (`/` → `%2F`),
/// the form embedded in public object URLs.
pub fn encode_path_component(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for &byte in path.as_bytes() {
        if is_component_safe(byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Decode a percent-encoded path component back to the raw object
/// path. Malformed escapes are kept verbatim rather than rejected;
/// the store would simply miss the object.
pub fn decode_path_component(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Encode each `/`-separated segment of an object path for use in a
/// request URL, keeping the slashes as real separators.
pub fn encode_path_segments(path: &str) -> String {
    path.split('/')
        .map(encode_path_component)
        .collect::<Vec<_>>()
        .join("/")
}
