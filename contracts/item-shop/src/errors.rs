use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, NearSchema, BorshSerialize, BorshDeserialize)]
#[abi(borsh)]
pub enum ShopError {
    Unauthorized,
    InvalidAddress,
    InvalidSymbol,
    InvalidItemType,
    InvalidTier,
    InvalidQuantity,
    LengthMismatch,
    InvalidToken,
    PriceNotConfigured,
    PriceOverflow,
    TreasuryNotSet,
    TransferFailed,
    SettlementInProgress,
    InvalidMessage,
}

impl std::fmt::Display for ShopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unauthorized => "Only the owner can perform this action",
            Self::InvalidAddress => "Invalid address",
            Self::InvalidSymbol => "Token symbol must not be empty",
            Self::InvalidItemType => "Item type must not be empty",
            Self::InvalidTier => "Tier must be positive",
            Self::InvalidQuantity => "Quantity must be positive",
            Self::LengthMismatch => "Tiers and prices length mismatch",
            Self::InvalidToken => "Invalid payment token",
            Self::PriceNotConfigured => "Unit price not configured",
            Self::PriceOverflow => "Total price overflows",
            Self::TreasuryNotSet => "Treasury address not set",
            Self::TransferFailed => "Token transfer failed",
            Self::SettlementInProgress => "Previous purchase still settling",
            Self::InvalidMessage => "Invalid purchase message",
        })
    }
}

impl FunctionError for ShopError {
    fn panic(&self) -> ! {
        env::panic_str(&format!("ShopError: {}", self))
    }
}
