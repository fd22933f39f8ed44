//! Image locator resolution
//!
//! Hosts pass either a bare filesystem path or a `file://` URI. Anything
//! with another scheme cannot be read locally and is rejected up front.

use std::path::PathBuf;

use crate::error::ScanError;

fn percent_decode(input: &str, uri: &str) -> Result<String, ScanError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ScanError::invalid_uri(uri, "bad percent escape"))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| ScanError::invalid_uri(uri, "path is not UTF-8"))
}

/// Scheme of a URI, if it has one. Single letters are Windows drive
/// prefixes, not schemes.
fn scheme(uri: &str) -> Option<&str> {
    let (candidate, _) = uri.split_once(':')?;
    let mut chars = candidate.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && candidate.len() > 1
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}

/// Resolve a caller-supplied locator to a local path
pub fn resolve_uri(uri: &str) -> Result<PathBuf, ScanError> {
    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(ScanError::invalid_uri(uri, "empty URI"));
    }

    match scheme(trimmed) {
        None => Ok(PathBuf::from(trimmed)),
        Some(s) if s.eq_ignore_ascii_case("file") => {
            let rest = &trimmed[s.len() + 1..];
            let path = match rest.strip_prefix("//") {
                // file:///abs or file://localhost/abs
                Some(authority_and_path) => {
                    let slash = authority_and_path.find('/').ok_or_else(|| {
                        ScanError::invalid_uri(uri, "file URI has no path")
                    })?;
                    let host = &authority_and_path[..slash];
                    if !host.is_empty() && !host.eq_ignore_ascii_case("localhost") {
                        return Err(ScanError::invalid_uri(uri, "remote file host"));
                    }
                    &authority_and_path[slash..]
                }
                // file:/abs
                None => rest,
            };
            let path = path.split(['?', '#']).next().unwrap_or_default();
            if path.is_empty() {
                return Err(ScanError::invalid_uri(uri, "file URI has no path"));
            }
            percent_decode(path, uri).map(PathBuf::from)
        }
        Some(s) => Err(ScanError::invalid_uri(
            uri,
            format!("unsupported scheme `{s}`"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_plain_paths() {
        assert_eq!(resolve_uri("/tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
        assert_eq!(resolve_uri("  rel/b.jpg ").unwrap(), PathBuf::from("rel/b.jpg"));
        assert_eq!(resolve_uri("C:\\img.png").unwrap(), PathBuf::from("C:\\img.png"));
    }

    #[test]
    fn test_file_uris() {
        assert_eq!(
            resolve_uri("file:///tmp/my%20scan.png").unwrap(),
            PathBuf::from("/tmp/my scan.png")
        );
        assert_eq!(
            resolve_uri("file://localhost/tmp/a.png").unwrap(),
            PathBuf::from("/tmp/a.png")
        );
        assert_eq!(resolve_uri("FILE:/tmp/a.png").unwrap(), PathBuf::from("/tmp/a.png"));
        assert_eq!(
            resolve_uri("file:///tmp/a.png?version=2").unwrap(),
            PathBuf::from("/tmp/a.png")
        );
    }

    #[test]
    fn test_rejections() {
        for bad in [
            "",
            "   ",
            "https://example.com/a.png",
            "content://media/external/images/1",
            "file://server/share/a.png",
            "file:///tmp/bad%zz.png",
            "file://",
        ] {
            let err = resolve_uri(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidUri, "{bad}");
        }
    }
}
