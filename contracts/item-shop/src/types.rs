use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

/// SHA-256 digest identifying one `(item_type, token_symbol, tier)` price slot.
pub type PriceKey = [u8; 32];

/// `msg` payload of `ft_transfer_call` when buying an item.
#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct BuyItemArgs {
    pub item_type: String,
    pub quantity: u64,
    pub token_symbol: String,
}

#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct AcceptedToken {
    pub symbol: String,
    pub token: AccountId,
}

#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct ShopConfig {
    pub version: String,
    pub owner_id: AccountId,
    pub treasury_id: Option<AccountId>,
}

/// A purchase whose total has been resolved but whose funds have not moved yet.
#[near(serializers = [json])]
#[derive(Clone, Debug, PartialEq)]
pub struct PendingPurchase {
    pub buyer: AccountId,
    pub item_type: String,
    pub quantity: u64,
    pub token_symbol: String,
    pub total_price: U128,
    pub attached: U128,
}
