//! Extract result links from a DuckDuckGo HTML results page.

use scraper::{Html, Selector};

/// Returns result target URLs in page order, without duplicates.
///
/// Result anchors carry the `result__a` class; their `href` is either a direct
/// URL or a `//duckduckgo.com/l/?uddg=<encoded>` redirect. Sponsored links
/// (redirects through `duckduckgo.com/y.js`) and non-http targets are skipped.
pub fn extract_result_links(html: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let Ok(selector) = Selector::parse("a.result__a") else {
        return links;
    };
    let document = Html::parse_document(html);
    for anchor in document.select(&selector) {
        let Some(target) = anchor.value().attr("href").and_then(resolve_target) else {
            continue;
        };
        if !links.contains(&target) {
            links.push(target);
        }
    }
    links
}

fn resolve_target(href: &str) -> Option<String> {
    if href.contains("duckduckgo.com/y.js") {
        return None;
    }
    if let Some(query) = href
        .strip_prefix("//duckduckgo.com/l/?")
        .or_else(|| href.strip_prefix("https://duckduckgo.com/l/?"))
        .or_else(|| href.strip_prefix("/l/?"))
    {
        let target = url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())?;
        return is_web_url(&target).then_some(target);
    }
    is_web_url(href).then(|| href.to_string())
}

fn is_web_url(s: &str) -> bool {
    matches!(url::Url::parse(s), Ok(u) if u.scheme() == "http" || u.scheme() == "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(href: &str) -> String {
        format!(
            "<div class=\"result\"><h2><a rel=\"nofollow\" class=\"result__a\" href=\"{}\">Title</a></h2></div>",
            href
        )
    }

    #[test]
    fn empty_html() {
        assert!(extract_result_links("").is_empty());
        assert!(extract_result_links("<html><body>No results.</body></html>").is_empty());
    }

    #[test]
    fn decodes_redirect_links() {
        let html = result("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fguide%3Fa%3D1&amp;rut=abc");
        assert_eq!(
            extract_result_links(&html),
            vec!["https://example.com/guide?a=1".to_string()]
        );
    }

    #[test]
    fn keeps_direct_links_in_order() {
        let html = [
            result("https://one.example/"),
            result("https://two.example/path"),
            result("http://three.example/"),
        ]
        .concat();
        assert_eq!(
            extract_result_links(&html),
            vec![
                "https://one.example/".to_string(),
                "https://two.example/path".to_string(),
                "http://three.example/".to_string(),
            ]
        );
    }

    #[test]
    fn skips_ads_duplicates_and_non_web_targets() {
        let html = [
            result("https://duckduckgo.com/y.js?ad_domain=ads.example&amp;u3=x"),
            result("https://a.example/"),
            result("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2F"),
            result("javascript:void(0)"),
            result("//duckduckgo.com/l/?rut=missing-target"),
            result("https://b.example/"),
        ]
        .concat();
        assert_eq!(
            extract_result_links(&html),
            vec!["https://a.example/".to_string(), "https://b.example/".to_string()]
        );
    }

    #[test]
    fn attribute_order_and_quoting_do_not_matter() {
        let html = concat!(
            "<a href='https://single.example/' class='result__a'>A</a>",
            "<a href=\"//duckduckgo.com/l/?uddg=https%3A%2F%2Freordered.example%2F\" ",
            "rel=\"nofollow\" class=\"result__a\">B</a>",
            "<a class=\"result__title result__a\" href=\"https://multi.example/\">C</a>",
            "<a class=\"result__snippet\" href=\"https://snippet.example/\">D</a>",
        );
        assert_eq!(
            extract_result_links(html),
            vec![
                "https://single.example/".to_string(),
                "https://reordered.example/".to_string(),
                "https://multi.example/".to_string(),
            ]
        );
    }

    #[test]
    fn anchor_without_href_is_ignored() {
        let html = "<a class=\"result__a\">no link</a>".to_string() + &result("https://c.example/");
        assert_eq!(extract_result_links(&html), vec!["https://c.example/".to_string()]);
    }
}
