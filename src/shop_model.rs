//! # Shop Data Model
//!
//! Value types produced by the shop text parser: one [`ShopItem`] per listed
//! item, collected into a [`ShopParseResult`] that is persisted as a snapshot
//! blob. Rarity and item type tokens are normalized through fixed lookup
//! tables; unrecognized tokens pass through verbatim.

use serde::{Deserialize, Serialize};

/// Normalized rarity tier of a shop item.
///
/// Unrecognized tokens are preserved as-is in the `Unknown` variant rather
/// than rejected, since the game bot may introduce new tiers at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Rarity {
    Common,
    Spiritual,
    Heavenly,
    Imperial,
    Unknown(String),
}

impl Rarity {
    /// Normalize a raw rarity token from the shop listing.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "凡品" => Rarity::Common,
            "灵品" => Rarity::Spiritual,
            "天品" => Rarity::Heavenly,
            "帝品" => Rarity::Imperial,
            other => Rarity::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "common",
            Rarity::Spiritual => "spiritual",
            Rarity::Heavenly => "heavenly",
            Rarity::Imperial => "imperial",
            Rarity::Unknown(raw) => raw,
        }
    }

    /// Marker glyph used when rendering item lists.
    pub fn marker(&self) -> &'static str {
        match self {
            Rarity::Common => "🟩",
            Rarity::Spiritual => "🟦",
            Rarity::Heavenly => "🟨",
            Rarity::Imperial => "🟥",
            Rarity::Unknown(_) => "⬜",
        }
    }
}

impl From<String> for Rarity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "common" => Rarity::Common,
            "spiritual" => Rarity::Spiritual,
            "heavenly" => Rarity::Heavenly,
            "imperial" => Rarity::Imperial,
            _ => Rarity::Unknown(s),
        }
    }
}

impl From<Rarity> for String {
    fn from(rarity: Rarity) -> Self {
        rarity.as_str().to_string()
    }
}

/// Normalized category of a shop item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    FunctionalPotion,
    Item,
    Unknown(String),
}

impl ItemKind {
    /// Normalize a raw type token from the shop listing.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "武器" => ItemKind::Weapon,
            "防具" => ItemKind::Armor,
            "丹药" => ItemKind::Potion,
            "功能丹" => ItemKind::FunctionalPotion,
            "物品" => ItemKind::Item,
            other => ItemKind::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potion",
            ItemKind::FunctionalPotion => "functional_potion",
            ItemKind::Item => "item",
            ItemKind::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "weapon" => ItemKind::Weapon,
            "armor" => ItemKind::Armor,
            "potion" => ItemKind::Potion,
            "functional_potion" => ItemKind::FunctionalPotion,
            "item" => ItemKind::Item,
            _ => ItemKind::Unknown(s),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One listed shop item at one point in time.
///
/// `price` and `original_price` are always parsed together from a paired
/// price line; a record is never built with only one of them.
/// `discount_percent` is signed: negative means markdown, positive markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    /// 1-based slot index in the shop listing.
    pub position: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemKind,
    pub rarity: Rarity,
    pub price: u32,
    pub original_price: u32,
    pub discount_percent: f64,
}

/// Full result of parsing one shop listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopParseResult {
    /// Items in listing order (by position as stated, not re-sorted).
    pub items: Vec<ShopItem>,
    pub count: usize,
    /// Verbatim input text, kept for audit and re-parsing.
    pub raw_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_normalization() {
        assert_eq!(Rarity::from_token("凡品"), Rarity::Common);
        assert_eq!(Rarity::from_token("灵品"), Rarity::Spiritual);
        assert_eq!(Rarity::from_token("天品"), Rarity::Heavenly);
        assert_eq!(Rarity::from_token("帝品"), Rarity::Imperial);
        assert_eq!(Rarity::from_token(" 凡品 "), Rarity::Common);
    }

    #[test]
    fn test_rarity_unknown_passthrough() {
        let rarity = Rarity::from_token("仙品");
        assert_eq!(rarity, Rarity::Unknown("仙品".to_string()));
        assert_eq!(rarity.as_str(), "仙品");
        assert_eq!(rarity.marker(), "⬜");
    }

    #[test]
    fn test_item_kind_normalization() {
        assert_eq!(ItemKind::from_token("武器"), ItemKind::Weapon);
        assert_eq!(ItemKind::from_token("防具"), ItemKind::Armor);
        assert_eq!(ItemKind::from_token("丹药"), ItemKind::Potion);
        assert_eq!(ItemKind::from_token("功能丹"), ItemKind::FunctionalPotion);
        assert_eq!(ItemKind::from_token("物品"), ItemKind::Item);
    }

    #[test]
    fn test_item_kind_unknown_passthrough() {
        let kind = ItemKind::from_token("法宝");
        assert_eq!(kind, ItemKind::Unknown("法宝".to_string()));
        assert_eq!(kind.as_str(), "法宝");
    }

    #[test]
    fn test_item_serialization_shape() {
        let item = ShopItem {
            position: 1,
            name: "流云琴".to_string(),
            item_type: ItemKind::Weapon,
            rarity: Rarity::Common,
            price: 342,
            original_price: 369,
            discount_percent: -7.0,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["position"], 1);
        assert_eq!(json["name"], "流云琴");
        assert_eq!(json["type"], "weapon");
        assert_eq!(json["rarity"], "common");
        assert_eq!(json["price"], 342);
        assert_eq!(json["original_price"], 369);
        assert_eq!(json["discount_percent"], -7.0);
    }

    #[test]
    fn test_item_roundtrip_with_unknown_tokens() {
        let item = ShopItem {
            position: 3,
            name: "青冥壶".to_string(),
            item_type: ItemKind::Unknown("法宝".to_string()),
            rarity: Rarity::Unknown("仙品".to_string()),
            price: 1000,
            original_price: 1000,
            discount_percent: 0.0,
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: ShopItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
