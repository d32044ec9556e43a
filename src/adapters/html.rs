//! Regex extraction for the marketplace's listing and detail pages.
//!
//! The markup is not under our control. Anything that does not match is
//! skipped rather than reported.

use crate::domain::model::ListingCard;
use crate::utils::error::{PriceError, Result};
use regex::Regex;

/// Integer shekel amount from text like `"250,000 شيكل"`.
pub fn extract_price(price_text: &str) -> Option<u64> {
    let re = Regex::new(r"([\d,]+)\s*شيكل").ok()?;
    let digits = re.captures(price_text)?.get(1)?.as_str().replace(',', "");
    digits.parse().ok()
}

/// Compiled patterns, built once per scrape job.
#[derive(Debug, Clone)]
pub struct ListingHtmlParser {
    card: Regex,
    href: Regex,
    price: Regex,
    info_section: Regex,
    item: Regex,
    label: Regex,
    value: Regex,
    tag: Regex,
    whitespace: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| PriceError::ScrapeError {
        message: format!("invalid pattern {}: {}", pattern, e),
    })
}

impl ListingHtmlParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            card: compile(r#"(?is)<a\b([^>]*\bclass="[^"]*\bpostListItemData\b[^"]*"[^>]*)>(.*?)</a>"#)?,
            href: compile(r#"(?i)\bhref="([^"]*)""#)?,
            price: compile(r#"(?is)<div\b[^>]*\bclass="[^"]*\bpriceColor\b[^"]*"[^>]*>(.*?)</div>"#)?,
            info_section: compile(
                r#"(?is)<section\b[^>]*\bid="PostViewInformation"[^>]*>(.*?)</section>"#,
            )?,
            item: compile(r"(?is)<li\b[^>]*>(.*?)</li>")?,
            label: compile(r"(?is)<p\b[^>]*>(.*?)</p>")?,
            value: compile(r"(?is)<a\b[^>]*>(.*?)</a>|<span\b[^>]*>(.*?)</span>")?,
            tag: compile(r"<[^>]*>")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Cards on one listing page. Ids are positions on the page.
    pub fn parse_listing_cards(&self, html: &str, site_base: &str) -> Vec<ListingCard> {
        let mut cards = Vec::new();

        for caps in self.card.captures_iter(html) {
            let attributes = &caps[1];
            let body = &caps[2];

            let Some(href) = self.href.captures(attributes).map(|c| c[1].to_string()) else {
                tracing::debug!("Skipping listing card without href");
                continue;
            };

            let price = self
                .price
                .captures(body)
                .and_then(|c| extract_price(&self.text(&c[1])));

            cards.push(ListingCard {
                id: cards.len(),
                price,
                details_url: join_url(site_base, &html_unescape(&href)),
            });
        }

        cards
    }

    /// `(label, value)` pairs from the information section of a detail page.
    pub fn parse_detail_pairs(&self, html: &str) -> Vec<(String, String)> {
        let Some(section) = self.info_section.captures(html) else {
            return Vec::new();
        };
        let section = section.get(1).map_or("", |m| m.as_str());

        let mut pairs = Vec::new();
        for item in self.item.captures_iter(section) {
            let item = item.get(1).map_or("", |m| m.as_str());

            let Some(label) = self.label.captures(item) else {
                continue;
            };
            let label_text = self.text(&label[1]);
            let label_end = label.get(0).map_or(0, |m| m.end());

            // 值必須在 <p> 之後
            let rest = &item[label_end..];
            let Some(value) = self.value.captures(rest) else {
                continue;
            };
            let raw_value = value
                .get(1)
                .or_else(|| value.get(2))
                .map_or("", |m| m.as_str());

            pairs.push((label_text, self.text(raw_value)));
        }

        pairs
    }

    /// Visible text of an HTML fragment, trimmed.
    pub fn text(&self, fragment: &str) -> String {
        let without_tags = self.tag.replace_all(fragment, " ");
        let unescaped = html_unescape(&without_tags);
        self.whitespace
            .replace_all(unescaped.trim(), " ")
            .into_owned()
    }
}

fn html_unescape(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Resolve a card href against the site base; plain concatenation if the base does not parse.
pub fn join_url(site_base: &str, href: &str) -> String {
    match url::Url::parse(site_base).and_then(|base| base.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", site_base, href),
    }
}
