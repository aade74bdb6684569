//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::db::{OperationLog, UserProfile};
use crate::shop_model::ShopItem;

/// Main menu entries: `(label, callback id)`.
pub const MAIN_MENU: &[(&str, &str)] = &[
    ("📋 指令菜单", "menu_commands"),
    ("🏪 商店助手", "menu_shop"),
    ("⚔️ 装备系统", "menu_equipment"),
    ("⚡ 突破系统", "menu_breakthrough"),
    ("💊 丹药系统", "menu_potion"),
    ("ℹ️ 我的信息", "my_info"),
];

pub const COMMANDS_MENU: &[(&str, &str)] = &[
    ("【我要修仙】", "cmd_start"),
    ("【我的信息】", "cmd_my_info"),
    ("【闭关】", "cmd_closed_cultivation"),
    ("【出关】", "cmd_exit_cultivation"),
    ("【签到】", "cmd_check_in"),
    ("【丹药背包】", "cmd_potion_bag"),
    ("🔁 重复上次指令", "cmd_repeat"),
    ("📒 操作记录", "op_history"),
    ("🔙 返回主菜单", "back_main"),
];

pub const EQUIPMENT_MENU: &[(&str, &str)] = &[
    ("【我的装备】", "cmd_my_equipment"),
    ("🔙 返回主菜单", "back_main"),
];

pub const BREAKTHROUGH_MENU: &[(&str, &str)] = &[
    ("【突破信息】", "cmd_breakthrough_info"),
    ("【突破】", "cmd_breakthrough"),
    ("🔙 返回主菜单", "back_main"),
];

pub const POTION_MENU: &[(&str, &str)] = &[
    ("【丹药背包】", "cmd_potion_bag"),
    ("🔙 返回主菜单", "back_main"),
];

pub const SHOP_MENU: &[(&str, &str)] = &[
    ("📥 输入商店内容", "shop_input"),
    ("📊 查看当前商店", "shop_view"),
    ("💳 快速购买", "shop_buy"),
    ("🔄 手动刷新商店", "cmd_refresh_shop"),
    ("🔙 返回主菜单", "back_main"),
];

/// Resolve a menu-navigation callback id to its title and entries.
pub fn menu_for(callback_id: &str) -> Option<(&'static str, &'static [(&'static str, &'static str)])> {
    match callback_id {
        "menu_commands" => Some(("📋 常用指令", COMMANDS_MENU)),
        "menu_equipment" => Some(("⚔️ 装备系统", EQUIPMENT_MENU)),
        "menu_breakthrough" => Some(("⚡ 突破系统", BREAKTHROUGH_MENU)),
        "menu_potion" => Some(("💊 丹药系统", POTION_MENU)),
        "menu_shop" | "back_shop" => Some(("🏪 商店助手", SHOP_MENU)),
        _ => None,
    }
}

/// Create the main menu keyboard
pub fn create_main_menu_keyboard() -> InlineKeyboardMarkup {
    create_menu_keyboard(MAIN_MENU)
}

/// Create an inline keyboard with one button per row
pub fn create_menu_keyboard(entries: &[(&str, &str)]) -> InlineKeyboardMarkup {
    let buttons: Vec<Vec<InlineKeyboardButton>> = entries
        .iter()
        .map(|(label, callback)| {
            vec![InlineKeyboardButton::callback(
                label.to_string(),
                callback.to_string(),
            )]
        })
        .collect();

    InlineKeyboardMarkup::new(buttons)
}

/// Create buy buttons for a parsed item list.
///
/// Callback tokens are `buy_{position}_{name}`. The name goes last so that
/// item names containing `_` survive the token round trip (the parser splits
/// off at most two leading segments). Telegram caps callback data at 64
/// bytes; very long item names will be rejected by the API rather than
/// silently truncated here.
pub fn create_shop_items_keyboard(items: &[ShopItem]) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = items
        .iter()
        .map(|item| {
            vec![InlineKeyboardButton::callback(
                format!("购买 {} ({}灵石)", item.name, item.price),
                format!("buy_{}_{}", item.position, item.name),
            )]
        })
        .collect();

    buttons.push(vec![InlineKeyboardButton::callback(
        "🔙 返回商店菜单".to_string(),
        "back_shop".to_string(),
    )]);

    InlineKeyboardMarkup::new(buttons)
}

/// Split a `buy_{position}_{name}` callback token back into its parts.
pub fn parse_buy_token(data: &str) -> Option<(u32, &str)> {
    let mut parts = data.splitn(3, '_');

    if parts.next() != Some("buy") {
        return None;
    }
    let position: u32 = parts.next()?.parse().ok()?;
    let name = parts.next()?;

    if name.is_empty() {
        return None;
    }
    Some((position, name))
}

/// Format a user profile for display
pub fn format_user_profile(profile: &UserProfile) -> String {
    format!(
        "ℹ️ 我的信息\n\n\
        🧘 境界: {}\n\
        ✨ 修为: {}\n\
        💎 灵石: {}\n\
        📅 注册时间: {}",
        profile.level, profile.exp, profile.spiritual_stones, profile.created_at
    )
}

/// Format recent operations as a numbered list, newest first
pub fn format_operation_history(operations: &[OperationLog]) -> String {
    let mut lines = vec!["📒 最近操作".to_string(), String::new()];

    for (i, op) in operations.iter().enumerate() {
        let status = if op.success { "✅" } else { "❌" };
        let content = op.operation_content.as_deref().unwrap_or("-");
        lines.push(format!(
            "{}. {} {} {} ({})",
            i + 1,
            status,
            op.operation_type,
            content,
            op.created_at
        ));
    }

    lines.join("\n")
}
