//! CSS selectors for Flight Club HTML parsing.
//!
//! Flight Club changes its markup over time, so the name and image lookups
//! are ordered chains rather than single selectors. The chains here are the
//! defaults; `Config` can replace them without a rebuild.
//!
//! **Update process**: When a run starts writing sentinels, capture the HTML,
//! add a selector to the front of the chain, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for catalog pages.
pub mod catalog {
    use super::*;

    /// Inline scripts that may carry the tracking payload.
    pub static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
}

/// Selectors for search results pages.
pub mod search {
    use super::*;

    /// Every link with a target; scanned for the item page.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
}

/// Default selector chains for item and search result pages.
pub mod item {
    /// Shoe name. Item page heading first, then the search result card title.
    pub const NAME_CHAIN: &[&str] = &[
        "div[class='mb-padding product-name hidden-phone'] > h1",
        "p[class='result-title text-ellipsis']",
    ];

    /// Shoe image. Item page hero image first, then any product image.
    pub const IMAGE_CHAIN: &[&str] = &[
        "div[class='product-image product-img-box'] > img[class='product-img']",
        "img[class='product-img']",
    ];

    /// Attributes holding the image URL, in order of preference.
    pub const IMAGE_ATTRS: &[&str] = &["src", "data-src"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let _ = &*catalog::SCRIPT;
        let _ = &*search::LINK;
        for selector in item::NAME_CHAIN.iter().chain(item::IMAGE_CHAIN) {
            assert!(Selector::parse(selector).is_ok(), "Selector failed to parse: {}", selector);
        }
    }

    #[test]
    fn test_item_page_name_selector() {
        let html = Html::parse_document(
            r#"<div class="mb-padding product-name hidden-phone"><h1>Air Jordan 1 Low</h1></div>"#,
        );
        let selector = Selector::parse(item::NAME_CHAIN[0]).unwrap();
        let name: String = html.select(&selector).next().unwrap().text().collect();
        assert_eq!(name, "Air Jordan 1 Low");
    }

    #[test]
    fn test_exact_class_match_required() {
        // [class='...'] matches the attribute value exactly, not a class subset
        let html = Html::parse_document(r#"<img class="product-img lazy" src="/a.jpg">"#);
        let selector = Selector::parse(item::IMAGE_CHAIN[1]).unwrap();
        assert!(html.select(&selector).next().is_none());
    }

    #[test]
    fn test_link_selector_skips_anchors_without_href() {
        let html = Html::parse_document(r#"<a name="top"></a><a href="/x">x</a>"#);
        assert_eq!(html.select(&search::LINK).count(), 1);
    }
}
