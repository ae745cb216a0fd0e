//! Staked assets and the players who wager them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// Rarity tier of a staked asset. Matches only ever pair stakes within a
/// single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(DomainError::validation(
                ValidationKind::InvalidRarity,
                format!("unknown rarity tier '{other}'"),
            )),
        }
    }
}

/// An NFT put up as a match stake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakedAsset {
    /// Token identifier within the collection.
    pub token_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub rarity: Rarity,
    /// Collection the token belongs to; falls back to the configured
    /// default collection at transfer time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl StakedAsset {
    /// Reject stakes that cannot identify a token.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.token_id.trim().is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidAsset,
                "staked asset is missing a token id",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidAsset,
                "staked asset is missing a name",
            ));
        }
        Ok(())
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub user_id: String,
    pub display_name: String,
    /// Destination/source address for stake settlement. Absent until the
    /// player supplies one; settlement fails closed without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}
