use url::Url;

/// Returns `true` if `candidate` parses as an absolute URL with a host.
///
/// Pure check: no DNS lookup, no scheme allowlist.
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| u.has_host())
        .unwrap_or(false)
}
