/// Path segments that show up in pasted links but never name a user.
const RESERVED_SEGMENTS: [&str; 4] = ["profile", "account", "login", ""];

/// True when the link is non-empty and points at the given host.
pub fn has_profile_link(url: Option<&str>, host_marker: &str) -> bool {
    url.is_some_and(|u| !u.is_empty() && u.contains(host_marker))
}

/// Pulls the username out of a profile link, or `None` if the link is unusable.
pub fn profile_username(url: Option<&str>, host_marker: &str) -> Option<String> {
    let url = url.map(str::trim)?;
    if !has_profile_link(Some(url), host_marker) {
        return None;
    }

    let last = url.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    // a bare host has no path segment to name a user
    if last.contains(host_marker) || RESERVED_SEGMENTS.iter().any(|reserved| *reserved == last)
    {
        return None;
    }
    Some(last.to_string())
}
