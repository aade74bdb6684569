//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use rusqlite::Connection;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::commands::{buy_command, game_command, relay_instruction};
use crate::config::Config;
use crate::db;
use crate::dialogue::{ShopDialogue, ShopDialogueState};
use crate::messages;
use crate::relay::PendingCommands;
use crate::shop_parser::format_items_for_display;

use super::ui_builder::{
    create_main_menu_keyboard, create_menu_keyboard, create_shop_items_keyboard,
    format_operation_history, format_user_profile, menu_for, parse_buy_token,
};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    dialogue: ShopDialogue,
    conn: Arc<tokio::sync::Mutex<Connection>>,
    config: Arc<Config>,
    pending: Arc<PendingCommands>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let data = q.data.clone().unwrap_or_default();
    let user_id = q.from.id.0 as i64;

    if let Some(msg) = &q.message {
        let chat_id = msg.chat().id;
        let message_id = msg.id();

        if data == "back_main" {
            bot.edit_message_text(chat_id, message_id, messages::MAIN_MENU_TITLE)
                .reply_markup(create_main_menu_keyboard())
                .await?;
        } else if let Some((title, entries)) = menu_for(&data) {
            bot.edit_message_text(chat_id, message_id, title)
                .reply_markup(create_menu_keyboard(entries))
                .await?;
        } else if data == "shop_input" {
            dialogue.update(ShopDialogueState::AwaitingShopText).await?;
            bot.edit_message_text(
                chat_id,
                message_id,
                messages::shop_input_prompt(&config.game_bot_username),
            )
            .await?;
        } else if data == "shop_view" {
            let snapshot = {
                let conn = conn.lock().await;
                db::latest_snapshot(&conn, user_id)
            };

            match snapshot {
                Ok(Some(snapshot)) => {
                    let display = format!(
                        "{}{}",
                        format_items_for_display(&snapshot.items),
                        messages::refresh_time_footer(snapshot.refresh_time.as_deref())
                    );
                    bot.edit_message_text(chat_id, message_id, display)
                        .reply_markup(create_shop_items_keyboard(&snapshot.items))
                        .await?;
                }
                Ok(None) => {
                    bot.edit_message_text(chat_id, message_id, messages::SHOP_NO_SNAPSHOT)
                        .await?;
                }
                Err(e) => {
                    error!(user_id = %q.from.id, error = %e, "Failed to load latest snapshot");
                    bot.edit_message_text(chat_id, message_id, messages::QUERY_FAILED)
                        .await?;
                }
            }
        } else if data == "shop_buy" {
            bot.edit_message_text(chat_id, message_id, messages::SHOP_BUY_HINT)
                .await?;
        } else if data == "my_info" {
            let profile = {
                let conn = conn.lock().await;
                db::get_or_create_user(&conn, user_id, q.from.username.as_deref())
            };

            match profile {
                Ok(profile) => {
                    bot.edit_message_text(chat_id, message_id, format_user_profile(&profile))
                        .await?;
                }
                Err(e) => {
                    error!(user_id = %q.from.id, error = %e, "Failed to load user profile");
                    bot.edit_message_text(chat_id, message_id, messages::QUERY_FAILED)
                        .await?;
                }
            }
        } else if data == "op_history" {
            let operations = {
                let conn = conn.lock().await;
                db::recent_operations(&conn, user_id, 10)
            };

            match operations {
                Ok(operations) if operations.is_empty() => {
                    bot.edit_message_text(chat_id, message_id, messages::NO_OPERATIONS)
                        .await?;
                }
                Ok(operations) => {
                    bot.edit_message_text(
                        chat_id,
                        message_id,
                        format_operation_history(&operations),
                    )
                    .await?;
                }
                Err(e) => {
                    error!(user_id = %q.from.id, error = %e, "Failed to load operation history");
                    bot.edit_message_text(chat_id, message_id, messages::QUERY_FAILED)
                        .await?;
                }
            }
        } else if data == "cmd_repeat" {
            match pending.recall(user_id) {
                Some(command) => {
                    bot.edit_message_text(
                        chat_id,
                        message_id,
                        relay_instruction(&command, &config.game_bot_username),
                    )
                    .await?;
                }
                None => {
                    bot.edit_message_text(chat_id, message_id, messages::NO_PENDING_COMMAND)
                        .await?;
                }
            }
        } else if data.starts_with("buy_") {
            handle_buy_button(&bot, chat_id, message_id, user_id, &data, &conn, &config, &pending)
                .await?;
        } else if data.starts_with("cmd_") {
            handle_command_button(
                &bot, chat_id, message_id, user_id, &data, &conn, &config, &pending,
            )
            .await?;
        }
        // Unknown callbacks from stale keyboards are ignored silently.
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

/// Turn a quick-command button into a relay instruction.
#[allow(clippy::too_many_arguments)]
async fn handle_command_button(
    bot: &Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    user_id: i64,
    data: &str,
    conn: &Arc<tokio::sync::Mutex<Connection>>,
    config: &Arc<Config>,
    pending: &Arc<PendingCommands>,
) -> Result<()> {
    match game_command(data) {
        Some(command) => {
            pending.remember(user_id, command);

            {
                let conn = conn.lock().await;
                if let Err(e) = db::log_operation(&conn, user_id, "command", Some(command), true) {
                    error!(user_id, error = %e, "Failed to log command operation");
                }
            }

            bot.edit_message_text(
                chat_id,
                message_id,
                relay_instruction(command, &config.game_bot_username),
            )
            .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, messages::UNKNOWN_COMMAND)
                .await?;
        }
    }

    Ok(())
}

/// Turn a buy button into a purchase relay instruction.
#[allow(clippy::too_many_arguments)]
async fn handle_buy_button(
    bot: &Bot,
    chat_id: ChatId,
    message_id: teloxide::types::MessageId,
    user_id: i64,
    data: &str,
    conn: &Arc<tokio::sync::Mutex<Connection>>,
    config: &Arc<Config>,
    pending: &Arc<PendingCommands>,
) -> Result<()> {
    match parse_buy_token(data) {
        Some((position, name)) => {
            let command = buy_command(name);
            pending.remember(user_id, &command);

            {
                let conn = conn.lock().await;
                let content = format!("{name} (位置 {position})");
                if let Err(e) = db::log_operation(&conn, user_id, "buy", Some(&content), true) {
                    error!(user_id, error = %e, "Failed to log buy operation");
                }
            }

            bot.edit_message_text(
                chat_id,
                message_id,
                relay_instruction(&command, &config.game_bot_username),
            )
            .await?;
        }
        None => {
            bot.edit_message_text(chat_id, message_id, messages::UNKNOWN_COMMAND)
                .await?;
        }
    }

    Ok(())
}
