use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped inside a path segment. Unreserved characters and the
/// sub-delimiters allowed in a path (`$ & + , ; = : @`) stay literal;
/// `/` never appears since the path is split on it first.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// Public HTTPS URL of an object: `https://{bucket}/{path}` with every path
/// segment percent-escaped. Empty segments are kept so the URL maps back to
/// the exact object name.
pub fn public_url(bucket: &str, path: &str) -> String {
    let segments: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("https://{}/{}", bucket, segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path() {
        assert_eq!(
            public_url("example.com", "img/logo.png"),
            "https://example.com/img/logo.png"
        );
    }

    #[test]
    fn test_segments_are_escaped() {
        assert_eq!(
            public_url("example.com", "my docs/report #1?.pdf"),
            "https://example.com/my%20docs/report%20%231%3F.pdf"
        );
        assert_eq!(
            public_url("example.com", "img/ü"),
            "https://example.com/img/%C3%BC"
        );
        assert_eq!(
            public_url("example.com", "img/100%.png"),
            "https://example.com/img/100%25.png"
        );
    }

    #[test]
    fn test_path_sub_delimiters_stay_literal() {
        assert_eq!(
            public_url("b.example.com", "img/a+b:c@d=e.png"),
            "https://b.example.com/img/a+b:c@d=e.png"
        );
        assert_eq!(
            public_url("example.com", "x/$1,2;3&4~_-.txt"),
            "https://example.com/x/$1,2;3&4~_-.txt"
        );
        assert_eq!(
            public_url("example.com", "x/it's (1)!*"),
            "https://example.com/x/it%27s%20%281%29%21%2A"
        );
    }

    #[test]
    fn test_empty_category_keeps_separator() {
        assert_eq!(public_url("example.com", "/a"), "https://example.com//a");
    }
}
