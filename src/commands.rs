//! # Game Command Catalog
//!
//! The fixed set of game commands the bot can generate for the user, keyed
//! by their inline-keyboard callback ids, plus the relay-instruction text
//! that wraps a command for manual forwarding. Actually delivering the
//! command to the game bot is the user's (or an outer layer's) job; this
//! module only produces well-formed command strings.

/// Quick commands reachable from the menus: `(callback id, game command)`.
pub const GAME_COMMANDS: &[(&str, &str)] = &[
    ("cmd_start", "我要修仙"),
    ("cmd_my_info", "我的信息"),
    ("cmd_closed_cultivation", "闭关"),
    ("cmd_exit_cultivation", "出关"),
    ("cmd_check_in", "签到"),
    ("cmd_potion_bag", "丹药背包"),
    ("cmd_my_equipment", "我的装备"),
    ("cmd_breakthrough_info", "突破信息"),
    ("cmd_breakthrough", "突破"),
    ("cmd_refresh_shop", "刷新商店"),
];

/// Resolve a menu callback id to its game command.
pub fn game_command(callback_id: &str) -> Option<&'static str> {
    GAME_COMMANDS
        .iter()
        .find(|(id, _)| *id == callback_id)
        .map(|(_, command)| *command)
}

/// Build the game command that purchases an item by name.
pub fn buy_command(item_name: &str) -> String {
    format!("购买 {item_name}")
}

/// Wrap a game command in the copy-and-forward instruction shown to the user.
pub fn relay_instruction(command: &str, game_bot_username: &str) -> String {
    format!("📤 已生成指令: 【{command}】\n\n请复制上述指令并发送给 @{game_bot_username} 机器人")
}
