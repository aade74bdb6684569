//! Shared text sent by the bot.
//!
//! All fixed user-facing strings live here so they stay in one place and are
//! easy to update. Strings that embed runtime values are small builder
//! functions next to their constants.

pub const WELCOME_TEXT: &str = "👋 欢迎使用修仙游戏助手!\n\n\
    这个 Bot 可以帮助你更高效地进行游戏。\n\n\
    🎮 主要功能:\n\
    • 📋 快捷指令菜单\n\
    • 🏪 智能商店助手\n\
    • ⚔️ 装备管理\n\
    • ⚡ 突破助手\n\
    • 💊 丹药管理\n\
    • 📊 数据查询\n\n\
    点击下方按钮开始:";

pub const HELP_TEXT: &str = "ℹ️ 使用说明\n\n\
    /start - 打开主菜单\n\
    /help - 显示本帮助\n\n\
    🏪 商店助手: 从游戏 Bot 复制商店内容发给我，\
    我会解析并保存，之后可以随时查看和快速购买。\n\
    📋 指令菜单: 点击按钮生成游戏指令，复制后发送给游戏 Bot。";

pub const MAIN_MENU_TITLE: &str = "🎮 修仙游戏助手\n选择功能:";

pub const SHOP_PARSE_FAILED: &str = "❌ 无法解析商店内容，请检查格式是否正确";
pub const SHOP_SAVE_FAILED: &str = "❌ 保存商店数据失败，请稍后重试";
pub const SHOP_NO_SNAPSHOT: &str = "❌ 未找到商店数据，请先输入商店内容";
pub const SHOP_BUY_HINT: &str = "💳 请先输入商店内容，以查看可购买的物品";

pub const QUERY_FAILED: &str = "❌ 查询失败，请稍后重试";

pub const NO_PENDING_COMMAND: &str = "没有可重复的指令，请先从菜单生成一条";
pub const UNKNOWN_COMMAND: &str = "❌ 未知的指令";
pub const NO_OPERATIONS: &str = "还没有操作记录";

pub const IDLE_TEXT_HINT: &str = "发送 /start 打开功能菜单";

/// Prompt shown when the bot starts waiting for pasted shop text.
pub fn shop_input_prompt(game_bot_username: &str) -> String {
    format!(
        "请发送商店内容（整个商店信息）:\n\n\
        📝 提示: 你可以从 @{game_bot_username} 机器人的【商店】命令中复制内容，然后粘贴到这里。"
    )
}

/// Footer appended to a rendered shop listing.
pub fn refresh_time_footer(refresh_time: Option<&str>) -> String {
    format!("\n\n⏱️ 下次刷新时间: {}", refresh_time.unwrap_or("未知"))
}
