//! # Link Extraction
//!
//! Finds the first Instagram post, reel, story or profile link in free text.

use regex::Regex;
use std::sync::LazyLock;

/// Characters that end a sentence rather than a URL.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Path kinds, tried in order. The last alternative is a bare account name,
/// which must start with a letter, digit or underscore so that a bare domain
/// (optionally followed by punctuation) never matches.
static INSTAGRAM_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.)?instagram\.com/(?:p/|reels?/|stories/|tv/|[a-z0-9_][a-z0-9_.]*)[A-Za-z0-9\-._~:/?#\[\]@!$&()*+,;=%]*",
    )
    .expect("instagram link pattern is valid")
});

/// Returns the leftmost supported link in `text`, with one trailing run of
/// sentence punctuation removed.
pub fn extract_instagram_url(text: &str) -> Option<String> {
    let found = INSTAGRAM_LINK.find(text)?;
    let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_link_stops_at_quote() {
        assert_eq!(
            extract_instagram_url("see 'https://www.instagram.com/reel/ABC/' for dinner"),
            Some("https://www.instagram.com/reel/ABC/".to_string())
        );
    }

    #[test]
    fn finds_reel_link() {
        assert_eq!(
            extract_instagram_url("Check out this reel: https://www.instagram.com/reel/ABC123xyz/"),
            Some("https://www.instagram.com/reel/ABC123xyz/".to_string())
        );
    }

    #[test]
    fn finds_post_link_mid_sentence() {
        assert_eq!(
            extract_instagram_url("Look at this https://instagram.com/p/DEF456/ amazing post!"),
            Some("https://instagram.com/p/DEF456/".to_string())
        );
    }

    #[test]
    fn strips_trailing_sentence_punctuation() {
        assert_eq!(
            extract_instagram_url("check this out: https://instagram.com/reel/ABC123."),
            Some("https://instagram.com/reel/ABC123".to_string())
        );
        assert_eq!(
            extract_instagram_url("(see https://instagram.com/p/XYZ/?igsh=abc)!?"),
            Some("https://instagram.com/p/XYZ/?igsh=abc".to_string())
        );
    }

    #[test]
    fn returns_only_the_first_link() {
        let text = "Multiple links: https://www.instagram.com/reel/GHI789/ and https://instagram.com/reel/JKL012/";
        assert_eq!(
            extract_instagram_url(text),
            Some("https://www.instagram.com/reel/GHI789/".to_string())
        );
    }

    #[test]
    fn matches_scheme_and_host_case_insensitively() {
        assert_eq!(
            extract_instagram_url("HTTPS://WWW.Instagram.COM/stories/chefmike/123"),
            Some("HTTPS://WWW.Instagram.COM/stories/chefmike/123".to_string())
        );
    }

    #[test]
    fn matches_profile_links() {
        assert_eq!(
            extract_instagram_url("follow https://instagram.com/taco_place, they're great"),
            Some("https://instagram.com/taco_place".to_string())
        );
    }

    #[test]
    fn ignores_bare_domain_and_other_hosts() {
        assert_eq!(extract_instagram_url("https://instagram.com/"), None);
        assert_eq!(extract_instagram_url("go to https://www.instagram.com/."), None);
        assert_eq!(extract_instagram_url("https://example.com/reel/ABC"), None);
        assert_eq!(extract_instagram_url("just saying hi, no links here"), None);
        assert_eq!(extract_instagram_url(""), None);
    }

    #[test]
    fn extraction_is_pure() {
        let text = "https://instagram.com/reel/ABC123xyz/.";
        assert_eq!(extract_instagram_url(text), extract_instagram_url(text));
    }
}
