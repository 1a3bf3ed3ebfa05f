//! URL helpers for following links between wiki pages.

use url::Url;

use crate::{Error, Result};

/// Parse a wiki base URL such as `https://en.wikipedia.org`.
///
/// # Errors
///
/// Returns [`Error::MissingElement`] if `base` is not an absolute URL.
pub fn parse_base(base: &str) -> Result<Url> {
    Url::parse(base.trim())
        .map_err(|e| Error::MissingElement(format!("invalid base URL {base}: {e}")))
}

/// Resolve a link `href` against the wiki base.
///
/// Absolute hrefs are returned unchanged; in-page anchors, `javascript:`
/// and `mailto:` links are not followable and yield `None`.
///
/// ```rust
/// use gp_scrape::url_utils::{parse_base, resolve_href};
///
/// let base = parse_base("https://it.wikipedia.org").unwrap();
/// assert_eq!(
///     resolve_href(&base, "/wiki/Circuito_del_Mugello").as_deref(),
///     Some("https://it.wikipedia.org/wiki/Circuito_del_Mugello"),
/// );
/// ```
#[must_use]
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
    {
        return None;
    }

    base.join(href).ok().map(String::from)
}

/// Season page URL: `template` with `{year}` replaced, resolved against `base`.
#[must_use]
pub fn season_url(base: &Url, template: &str, year: i32) -> Option<String> {
    resolve_href(base, &template.replace("{year}", &year.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        match parse_base("https://en.wikipedia.org") {
            Ok(url) => url,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn relative_links_resolve_against_base() {
        assert_eq!(
            resolve_href(&base(), "/wiki/2023_German_motorcycle_Grand_Prix").as_deref(),
            Some("https://en.wikipedia.org/wiki/2023_German_motorcycle_Grand_Prix")
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        assert_eq!(
            resolve_href(&base(), "https://it.wikipedia.org/wiki/Motomondiale_2023").as_deref(),
            Some("https://it.wikipedia.org/wiki/Motomondiale_2023")
        );
    }

    #[test]
    fn unfollowable_links_yield_none() {
        assert!(resolve_href(&base(), "").is_none());
        assert!(resolve_href(&base(), "#cite_note-1").is_none());
        assert!(resolve_href(&base(), "javascript:void(0)").is_none());
    }

    #[test]
    fn season_url_fills_year() {
        assert_eq!(
            season_url(&base(), "/wiki/Motomondiale_{year}", 2011).as_deref(),
            Some("https://en.wikipedia.org/wiki/Motomondiale_2011")
        );
    }

    #[test]
    fn invalid_base_is_an_error() {
        assert!(matches!(parse_base("not a url"), Err(Error::MissingElement(_))));
    }
}
