/// Extract the lowercase hostname from an address.
///
/// Accepts full URLs (`https://user@claude.ai:443/chat?x#y`) as well as bare
/// hosts (`claude.ai`). Scheme, userinfo, port, path, query and fragment are
/// removed.
pub fn host_from_url(url: &str) -> String {
    let trimmed = url.trim();

    // Drop the scheme if there is one
    let without_scheme = match trimmed.find("://") {
        Some(pos) => &trimmed[pos + 3..],
        None => trimmed,
    };

    // Authority ends at the first path, query or fragment delimiter
    let authority = without_scheme
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or("");

    // Userinfo
    let host_port = match authority.rfind('@') {
        Some(pos) => &authority[pos + 1..],
        None => authority,
    };

    // IPv6 literal keeps its brackets, everything else loses the port
    let host = if host_port.starts_with('[') {
        match host_port.find(']') {
            Some(end) => &host_port[..=end],
            None => host_port,
        }
    } else {
        host_port.split(':').next().unwrap_or("")
    };

    host.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url() {
        assert_eq!(host_from_url("https://claude.ai/chat/abc"), "claude.ai");
        assert_eq!(host_from_url("https://chatgpt.com/c/1?model=x#top"), "chatgpt.com");
    }

    #[test]
    fn test_port_and_userinfo() {
        assert_eq!(host_from_url("http://user:pw@Chat.DeepSeek.com:8080/a"), "chat.deepseek.com");
        assert_eq!(host_from_url("http://[::1]:9222/json"), "[::1]");
    }

    #[test]
    fn test_bare_host() {
        assert_eq!(host_from_url("  www.perplexity.ai  "), "www.perplexity.ai");
        assert_eq!(host_from_url("example.com."), "example.com");
    }

    #[test]
    fn test_non_network_urls() {
        assert_eq!(host_from_url("about:blank"), "about");
        assert_eq!(host_from_url("file:///tmp/page.html"), "");
    }
}
