//! # Shop Text Parser
//!
//! This module parses the game bot's free-text shop listing into structured
//! [`ShopItem`] records. The listing format is fixed: an item header line
//! followed by a price line, e.g.
//!
//! ```text
//! === 修仙商店 ===
//! 1. [凡品] 流云琴 (武器) [7%折]
//!    价格: 342 灵石 (原价: 369)
//! ```
//!
//! Parsing is best-effort: lines that do not match the grammar are skipped
//! and the parser never fails on malformed input. It is a pure function over
//! its argument with no shared mutable state, so it is safe to call
//! concurrently.
//!
//! ## Usage
//!
//! ```rust
//! use xiuxian_helper::shop_parser::parse_shop_text;
//!
//! let text = "1. [凡品] 流云琴 (武器) [7%折]\n价格: 342 灵石 (原价: 369)";
//! let result = parse_shop_text(text);
//!
//! assert_eq!(result.count, 1);
//! assert_eq!(result.items[0].name, "流云琴");
//! ```

use crate::shop_model::{ItemKind, Rarity, ShopItem, ShopParseResult};
use regex::Regex;
use std::sync::LazyLock;

/// Compiled regex patterns for the shop listing grammar
static SHOP_PATTERNS: LazyLock<ShopPatterns> = LazyLock::new(ShopPatterns::new);

/// Line markers that identify non-item annotation lines.
///
/// Matched by substring containment, not full-line equality: section
/// dividers, hint lines and the refresh-time footer.
const SKIP_MARKERS: [&str; 3] = ["===", "提示:", "下次"];

/// Compiled regex patterns for parsing
struct ShopPatterns {
    /// Matches an item header: `1. [凡品] 流云琴 (武器) [7%折]`
    item_line: Regex,
    /// Matches the paired price line: `价格: 342 灵石 (原价: 369)`
    price_line: Regex,
    /// Extracts an optional sign and numeric magnitude from a discount token
    discount: Regex,
    /// Matches the refresh-time footer: `下次刷新时间: 2024-01-01 12:00`
    refresh_time: Regex,
}

impl ShopPatterns {
    fn new() -> Self {
        Self {
            item_line: Regex::new(
                r"^(?P<pos>\d+)\.\s*\[(?P<rarity>[^\]]+)\]\s+(?P<name>.+?)\s+\((?P<kind>[^)]+)\)\s*\[(?P<discount>[^\]]+)\]",
            )
            .unwrap(),
            price_line: Regex::new(r"价格:\s*(?P<price>\d+)\s*灵石\s*\(原价:\s*(?P<original>\d+)\)")
                .unwrap(),
            discount: Regex::new(r"(?P<sign>[+-]?)(?P<value>\d+(?:\.\d+)?)").unwrap(),
            refresh_time: Regex::new(r"下次刷新时间:\s*(?P<when>[^\n]+)").unwrap(),
        }
    }
}

/// Parse a full shop listing into structured item records.
///
/// Scans line pairs: an item header line must be immediately followed by a
/// matching price line, otherwise the candidate is discarded and the scan
/// resumes one line later. Returns every successfully paired record in
/// listing order along with the verbatim input.
pub fn parse_shop_text(text: &str) -> ShopParseResult {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    let mut items = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        if line.is_empty() || SKIP_MARKERS.iter().any(|marker| line.contains(marker)) {
            i += 1;
            continue;
        }

        if let Some(header) = SHOP_PATTERNS.item_line.captures(line) {
            // The price line must be the very next physical line. A header
            // with no matching price line yields no record and the scan
            // advances by one, so the candidate price line is re-tested as a
            // potential header.
            if i + 1 < lines.len() {
                if let Some(item) = build_item(&header, lines[i + 1].trim()) {
                    items.push(item);
                    i += 2;
                    continue;
                }
            }
        }

        i += 1;
    }

    ShopParseResult {
        count: items.len(),
        raw_text: text.to_string(),
        items,
    }
}

/// Build one record from a matched header and its candidate price line.
///
/// Returns `None` when the price line does not match; the caller then drops
/// the header without emitting a partial record.
fn build_item(header: &regex::Captures<'_>, price_line: &str) -> Option<ShopItem> {
    let price_caps = SHOP_PATTERNS.price_line.captures(price_line)?;

    let position: u32 = header["pos"].parse().ok()?;
    let price: u32 = price_caps["price"].parse().ok()?;
    let original_price: u32 = price_caps["original"].parse().ok()?;

    let discount_token = header["discount"].trim();
    let discount_percent = parse_discount(discount_token, price, original_price);

    Some(ShopItem {
        position,
        name: header["name"].trim().to_string(),
        item_type: ItemKind::from_token(&header["kind"]),
        rarity: Rarity::from_token(&header["rarity"]),
        price,
        original_price,
        discount_percent,
    })
}

/// Normalize a discount token into a signed percentage.
///
/// Tokens look like `7%折` (markdown) or `+10%` (markup). An explicit `-`
/// sign or a `折` glyph makes the magnitude negative; an explicit `+` sign
/// declares a markup and wins over the glyph. A token with no extractable
/// magnitude falls back to the percentage computed from the price delta,
/// rounded to 2 decimal places, or `0` when the original price is zero.
fn parse_discount(token: &str, price: u32, original_price: u32) -> f64 {
    if let Some(caps) = SHOP_PATTERNS.discount.captures(token) {
        let sign = caps.name("sign").map(|m| m.as_str()).unwrap_or("");
        let value: f64 = caps["value"].parse().unwrap_or(0.0);

        if sign == "-" || (sign.is_empty() && token.contains('折')) {
            return -value;
        }
        return value;
    }

    if original_price > 0 {
        let delta = (price as f64 - original_price as f64) / original_price as f64 * 100.0;
        return (delta * 100.0).round() / 100.0;
    }

    0.0
}

/// Extract the free-text refresh-time label from a shop listing.
///
/// Independent of item parsing: scans the full text for the first
/// `下次刷新时间:` marker and returns its trimmed trailing text.
pub fn extract_refresh_time(text: &str) -> Option<String> {
    SHOP_PATTERNS
        .refresh_time
        .captures(text)
        .map(|caps| caps["when"].trim().to_string())
}

/// Render a parsed item sequence as a human-readable listing.
///
/// One block per item, prefixed with the rarity marker glyph. The signed
/// percentage suffix only appears when the discount is non-zero.
pub fn format_items_for_display(items: &[ShopItem]) -> String {
    if items.is_empty() {
        return "商店暂无物品".to_string();
    }

    let mut blocks = vec!["📦 修仙商店物品列表\n".to_string()];

    for item in items {
        let discount_suffix = if item.discount_percent != 0.0 {
            format!(" [{:+.0}%]", item.discount_percent)
        } else {
            String::new()
        };

        blocks.push(format!(
            "{} {}. {} ({})\n   💰 {} 灵石 (原价: {}){}",
            item.rarity.marker(),
            item.position,
            item.name,
            item.item_type.as_str(),
            item.price,
            item.original_price,
            discount_suffix
        ));
    }

    blocks.join("\n")
}
