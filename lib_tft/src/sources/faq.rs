use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::{BoardEmbed, BulletinSource, SourceError};
use crate::render::{absolute_url, faq_embed};
use crate::retrieve::Fetcher;
use crate::scrape::{parse_faq_articles, parse_faq_categories};

/// Help center root; article and category links are relative to it.
pub const FAQ_BASE_URL: &str = "https://help.thefundedtraderprogram.com/";
/// Help center index listing the categories.
pub const FAQ_INDEX_URL: &str = "https://help.thefundedtraderprogram.com/en";

/// # FAQ Source
///
/// One GET for the index, then one per category. Each category becomes one
/// message.
pub struct FaqSource {
    fetcher: Arc<Fetcher>,
    base_url: String,
    index_url: String,
}

impl FaqSource {
    /// Creates a source reading the categories from `index_url` and resolving
    /// links against `base_url`.
    pub fn new(fetcher: Arc<Fetcher>, base_url: impl Into<String>, index_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            index_url: index_url.into(),
        }
    }
}

impl BulletinSource for FaqSource {
    async fn build(&self, cancel: &CancellationToken) -> Result<Vec<BoardEmbed>, SourceError> {
        let index = self.fetcher.fetch_text(&self.index_url, cancel).await?;
        let categories = parse_faq_categories(&index);
        log::debug!("Parsed {} FAQ categories", categories.len());

        let mut embeds = Vec::with_capacity(categories.len());
        for category in &categories {
            let url = absolute_url(&self.base_url, &category.url);
            let page = self.fetcher.fetch_text(&url, cancel).await?;
            let articles = parse_faq_articles(&page);
            embeds.push(faq_embed(category, &articles, &self.base_url));
        }
        Ok(embeds)
    }
}
