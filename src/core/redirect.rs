//! Login redirect URLs
//!
//! Builds the login location carrying the `next` parameter and reads it back
//! on the login page.

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics
const UNRESERVED_MARKS: &[u8] = b"-_.!~*'()";

/// Percent-encode a string with the `encodeURIComponent` character set
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED_MARKS.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Decode `%XX` escapes and `+` as space.
///
/// Returns `None` for truncated escapes or when the result is not UTF-8.
pub fn decode_component(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = bytes.get(i + 1..i + 3)?;
                let hex = std::str::from_utf8(hex).ok()?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

/// Login page location, with `next` attached when a return path is given
pub fn login_location(login_page: &str, next: Option<&str>) -> String {
    match next {
        Some(path) => format!("{}?next={}", login_page, encode_component(path)),
        None => login_page.to_string(),
    }
}

/// Where to send the user after signing in.
///
/// Reads `next` from a query string (with or without the leading `?`) and
/// accepts only same-origin absolute paths; anything else yields `/`.
pub fn next_destination(query: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.strip_prefix("next="))
        .find_map(decode_component)
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_string())
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_encode_uri_component() {
        assert_eq!(encode_component("/courses/"), "%2Fcourses%2F");
        assert_eq!(encode_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(encode_component(""), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode_component("%2Fcourses%2F").as_deref(), Some("/courses/"));
        assert_eq!(decode_component("a+b").as_deref(), Some("a b"));
        assert_eq!(decode_component("%C3%A9").as_deref(), Some("é"));
        assert_eq!(decode_component("%2"), None);
        assert_eq!(decode_component("%zz"), None);
        assert_eq!(decode_component("%FF"), None);
    }

    #[test]
    fn test_login_location() {
        assert_eq!(
            login_location("/auth/login/", Some("/courses/3/")),
            "/auth/login/?next=%2Fcourses%2F3%2F"
        );
        assert_eq!(login_location("/auth/login/", None), "/auth/login/");
    }

    #[test]
    fn test_next_destination_reads_encoded_path() {
        assert_eq!(next_destination("?next=%2Fcourses%2F3%2F"), "/courses/3/");
        assert_eq!(next_destination("a=1&next=%2Fprofile%2F"), "/profile/");
    }

    #[test]
    fn test_next_destination_rejects_offsite_targets() {
        assert_eq!(next_destination("?next=https%3A%2F%2Fevil.example"), "/");
        assert_eq!(next_destination("?next=%2F%2Fevil.example"), "/");
        assert_eq!(next_destination("?next=%2F%5Cevil.example"), "/");
        assert_eq!(next_destination("?next=%zz"), "/");
    }

    #[test]
    fn test_next_destination_missing() {
        assert_eq!(next_destination(""), "/");
        assert_eq!(next_destination("?other=1"), "/");
    }
}
