//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use rusqlite::Connection;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::db;
use crate::dialogue::{ShopDialogue, ShopDialogueState};
use crate::messages;
use crate::shop_parser::{extract_refresh_time, format_items_for_display, parse_shop_text};

use super::ui_builder::{create_main_menu_keyboard, create_shop_items_keyboard};

/// Handle incoming text messages: the two slash commands plus pasted shop
/// listings when the dialogue is waiting for one.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: ShopDialogue,
    conn: Arc<Mutex<Connection>>,
) -> Result<()> {
    if let Some(text) = msg.text() {
        debug!(user_id = %msg.chat.id, "Received text message");

        if text == "/start" {
            handle_start(&bot, &msg, &conn).await?;
        } else if text == "/help" {
            bot.send_message(msg.chat.id, messages::HELP_TEXT).await?;
        } else {
            match dialogue.get().await? {
                Some(ShopDialogueState::AwaitingShopText) => {
                    handle_shop_text_input(&bot, &msg, &dialogue, &conn, text).await?;
                }
                _ => {
                    bot.send_message(msg.chat.id, messages::IDLE_TEXT_HINT)
                        .await?;
                }
            }
        }
    }
    Ok(())
}

/// Register the user and show the main menu.
async fn handle_start(bot: &Bot, msg: &Message, conn: &Arc<Mutex<Connection>>) -> Result<()> {
    let username = msg.from.as_ref().and_then(|user| user.username.clone());

    {
        let conn = conn.lock().await;
        if let Err(e) = db::get_or_create_user(&conn, msg.chat.id.0, username.as_deref()) {
            // Registration failure should not block the menu.
            error!(user_id = %msg.chat.id, error = %e, "Failed to register user");
        }
    }

    info!(user_id = %msg.chat.id, "User opened the main menu");
    bot.send_message(msg.chat.id, messages::WELCOME_TEXT)
        .reply_markup(create_main_menu_keyboard())
        .await?;

    Ok(())
}

/// Parse a pasted shop listing, persist the snapshot, and answer with the
/// rendered item list plus buy buttons.
async fn handle_shop_text_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &ShopDialogue,
    conn: &Arc<Mutex<Connection>>,
    text: &str,
) -> Result<()> {
    // One paste per prompt: leave the waiting state before parsing so a
    // malformed paste does not swallow the user's next message.
    dialogue.update(ShopDialogueState::Idle).await?;

    let result = parse_shop_text(text);

    if result.items.is_empty() {
        warn!(user_id = %msg.chat.id, "Shop text could not be parsed");
        bot.send_message(msg.chat.id, messages::SHOP_PARSE_FAILED)
            .await?;
        return Ok(());
    }

    let refresh_time = extract_refresh_time(text);
    let user_id = msg.chat.id.0;

    let saved = {
        let conn = conn.lock().await;
        db::save_snapshot(&conn, user_id, &result, refresh_time.as_deref()).and_then(
            |snapshot_id| {
                db::log_operation(
                    &conn,
                    user_id,
                    "shop_input",
                    Some(&format!("{} 件物品", result.count)),
                    true,
                )?;
                Ok(snapshot_id)
            },
        )
    };

    match saved {
        Ok(snapshot_id) => {
            info!(
                user_id = %msg.chat.id,
                snapshot_id,
                item_count = result.count,
                "Shop snapshot saved"
            );

            let display = format!(
                "{}{}",
                format_items_for_display(&result.items),
                messages::refresh_time_footer(refresh_time.as_deref())
            );
            bot.send_message(msg.chat.id, display)
                .reply_markup(create_shop_items_keyboard(&result.items))
                .await?;
        }
        Err(e) => {
            error!(user_id = %msg.chat.id, error = %e, "Failed to save shop snapshot");
            bot.send_message(msg.chat.id, messages::SHOP_SAVE_FAILED)
                .await?;
        }
    }

    Ok(())
}
