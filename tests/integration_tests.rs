//! # Integration Tests
//!
//! End-to-end flow for the shop assistant: parse a pasted listing, persist
//! the snapshot, read it back and render it, and round-trip the buy tokens
//! the display layer hands out.

use anyhow::Result;
use rusqlite::Connection;
use tempfile::NamedTempFile;
use teloxide::types::InlineKeyboardButtonKind;

use xiuxian_helper::bot::ui_builder::{create_shop_items_keyboard, parse_buy_token};
use xiuxian_helper::db::{init_database_schema, latest_snapshot, save_snapshot};
use xiuxian_helper::shop_model::{ItemKind, Rarity};
use xiuxian_helper::shop_parser::{
    extract_refresh_time, format_items_for_display, parse_shop_text,
};

const SHOP_LISTING: &str = "=== 修仙商店 ===\n\
    1. [凡品] 流云琴 (武器) [7%折]\n\
       价格: 342 灵石 (原价: 369)\n\
    2. [灵品] 玄龟甲 (防具) [+10%]\n\
       价格: 1100 灵石 (原价: 1000)\n\
    3. [帝品] 九转金丹 (丹药) [特价]\n\
       价格: 4500 灵石 (原价: 5000)\n\
    \n\
    提示: 每日刷新\n\
    下次刷新时间: 2024-01-01 12:00";

fn setup_test_db() -> Result<(Connection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let conn = Connection::open(temp_file.path())?;
    init_database_schema(&conn)?;
    Ok((conn, temp_file))
}

#[test]
fn test_parse_realistic_listing() {
    let result = parse_shop_text(SHOP_LISTING);

    assert_eq!(result.count, 3);

    let qin = &result.items[0];
    assert_eq!(qin.position, 1);
    assert_eq!(qin.name, "流云琴");
    assert_eq!(qin.item_type, ItemKind::Weapon);
    assert_eq!(qin.rarity, Rarity::Common);
    assert_eq!(qin.price, 342);
    assert_eq!(qin.original_price, 369);
    assert_eq!(qin.discount_percent, -7.0);

    let armor = &result.items[1];
    assert_eq!(armor.rarity, Rarity::Spiritual);
    assert_eq!(armor.discount_percent, 10.0);

    // No magnitude in the token, so the discount is computed from prices.
    let pill = &result.items[2];
    assert_eq!(pill.rarity, Rarity::Imperial);
    assert_eq!(pill.discount_percent, -10.0);
}

#[test]
fn test_parse_save_load_render_roundtrip() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let result = parse_shop_text(SHOP_LISTING);
    let refresh_time = extract_refresh_time(SHOP_LISTING);
    assert_eq!(refresh_time.as_deref(), Some("2024-01-01 12:00"));

    save_snapshot(&conn, 1001, &result, refresh_time.as_deref())?;

    let snapshot = latest_snapshot(&conn, 1001)?.expect("snapshot should exist");
    assert_eq!(snapshot.items, result.items);
    assert_eq!(snapshot.refresh_time, refresh_time);

    let rendered = format_items_for_display(&snapshot.items);
    for item in &snapshot.items {
        assert!(rendered.contains(&item.name));
        assert!(rendered.contains(&item.price.to_string()));
    }

    Ok(())
}

#[test]
fn test_stored_raw_text_reparses_identically() -> Result<()> {
    let (conn, _temp_file) = setup_test_db()?;

    let result = parse_shop_text(SHOP_LISTING);
    save_snapshot(&conn, 1001, &result, None)?;

    let snapshot = latest_snapshot(&conn, 1001)?.expect("snapshot should exist");
    let reparsed = parse_shop_text(&snapshot.raw_text);

    assert_eq!(reparsed, result);

    Ok(())
}

#[test]
fn test_buy_tokens_roundtrip_for_parsed_items() {
    let result = parse_shop_text(SHOP_LISTING);
    let keyboard = create_shop_items_keyboard(&result.items);

    let mut tokens = Vec::new();
    for row in &keyboard.inline_keyboard {
        for button in row {
            if let InlineKeyboardButtonKind::CallbackData(data) = &button.kind {
                if let Some(parts) = parse_buy_token(data) {
                    tokens.push(parts);
                }
            }
        }
    }

    assert_eq!(tokens.len(), result.items.len());
    for (item, (position, name)) in result.items.iter().zip(tokens) {
        assert_eq!(position, item.position);
        assert_eq!(name, item.name);
    }
}
