/* crates/weft-render/src/url.rs */

// Canonical-URL helpers. Pure string functions, no external I/O.

/// Join a request pathname onto an origin, collapsing the slash boundary.
/// The pathname is treated as relative to the origin root.
pub fn canonical_url(pathname: &str, origin: &str) -> String {
  let origin = origin.trim_end_matches('/');
  let path = pathname.trim_start_matches('/');
  if path.is_empty() { format!("{origin}/") } else { format!("{origin}/{path}") }
}

/// Extract `scheme://host[:port]` from a URL string.
pub fn origin_of(url: &str) -> Option<String> {
  let scheme_end = url.find("://")?;
  let rest = &url[scheme_end + 3..];
  let host_end = rest.find('/').unwrap_or(rest.len());
  if rest[..host_end].is_empty() {
    return None;
  }
  Some(url[..scheme_end + 3 + host_end].to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn joins_origin_and_pathname() {
    assert_eq!(canonical_url("/about", "https://example.com"), "https://example.com/about");
  }

  #[test]
  fn collapses_duplicate_slashes() {
    assert_eq!(canonical_url("/about", "https://example.com/"), "https://example.com/about");
  }

  #[test]
  fn root_pathname_keeps_trailing_slash() {
    assert_eq!(canonical_url("/", "https://example.com"), "https://example.com/");
    assert_eq!(canonical_url("", "https://example.com"), "https://example.com/");
  }

  #[test]
  fn origin_of_full_url() {
    assert_eq!(origin_of("https://example.com/a/b?q=1"), Some("https://example.com".to_string()));
  }

  #[test]
  fn origin_of_with_port() {
    assert_eq!(origin_of("http://localhost:3000/page"), Some("http://localhost:3000".to_string()));
  }

  #[test]
  fn origin_of_bare_origin() {
    assert_eq!(origin_of("http://localhost:3000"), Some("http://localhost:3000".to_string()));
  }

  #[test]
  fn origin_of_relative_path() {
    assert_eq!(origin_of("/just/a/path"), None);
  }
}
