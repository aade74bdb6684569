//! # Xiuxian Helper Bot
//!
//! A Telegram assistant bot for a xianxia idle game: it generates game
//! commands from inline menus, parses the game bot's free-text shop
//! listings into structured records, and keeps per-user snapshot history
//! in SQLite.

pub mod bot;
pub mod commands;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod messages;
pub mod relay;
pub mod shop_model;
pub mod shop_parser;
