//! # Help Center Parsers
//!
//! The index page lists categories as `.g__space` blocks, each linking to a
//! category page and titled by the next `.t__h3`. A category page lists its
//! articles as `a.t__no-und` links, each followed by a `span.c__primary` title
//! and a `span.paper__preview` summary.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::dom::{text_of, DocumentOrder};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static CATEGORY: LazyLock<Selector> = LazyLock::new(|| selector(".g__space"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static CATEGORY_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(".t__h3"));
static ARTICLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.t__no-und[href]"));
static ARTICLE_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("span.c__primary"));
static ARTICLE_PREVIEW: LazyLock<Selector> = LazyLock::new(|| selector("span.paper__preview"));

/// One help center category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqCategory {
    /// Category title.
    pub name: String,
    /// Link to the category page, as written in the page.
    pub url: String,
}

/// One article of a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqArticle {
    /// Article title.
    pub name: String,
    /// Link to the article, as written in the page.
    pub url: String,
    /// Short summary; empty when the page has none.
    pub description: String,
}

/// Parses the help center index. Blocks without a link or a title are skipped.
pub fn parse_faq_categories(html: &str) -> Vec<FaqCategory> {
    let doc = Html::parse_document(html);
    let order = DocumentOrder::new(&doc);

    doc.select(&CATEGORY)
        .filter_map(|block| {
            let url = block.select(&LINK).next()?.value().attr("href")?.trim().to_string();
            let name = text_of(&order.find_next(&block, &CATEGORY_TITLE)?);
            Some(FaqCategory { name, url })
        })
        .collect()
}

/// Parses a category page. Links without a title are skipped.
pub fn parse_faq_articles(html: &str) -> Vec<FaqArticle> {
    let doc = Html::parse_document(html);
    let order = DocumentOrder::new(&doc);

    doc.select(&ARTICLE_LINK)
        .filter_map(|link| {
            let url = link.value().attr("href")?.trim().to_string();
            let name = text_of(&order.find_next(&link, &ARTICLE_TITLE)?);
            let description = order
                .find_next(&link, &ARTICLE_PREVIEW)
                .map(|preview| text_of(&preview))
                .unwrap_or_default();
            Some(FaqArticle { name, url, description })
        })
        .collect()
}
