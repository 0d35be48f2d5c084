use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "nep297"))]
pub enum ShopEvent {
    // Field order is consumed by external indexers; do not reorder.
    #[event_version("1.0.0")]
    ItemBought {
        buyer: AccountId,
        item_type: String,
        quantity: u64,
        token_symbol: String,
        total_price: U128,
    },
    #[event_version("1.0.0")]
    PurchaseFailed {
        buyer: AccountId,
        item_type: String,
        quantity: u64,
        token_symbol: String,
        amount: U128,
    },
    #[event_version("1.0.0")]
    OwnershipTransferred {
        old_owner: AccountId,
        new_owner: AccountId,
    },
    #[event_version("1.0.0")]
    TreasuryUpdated {
        old_treasury: Option<AccountId>,
        new_treasury: AccountId,
    },
    #[event_version("1.0.0")]
    TokenAccepted {
        symbol: String,
        token: AccountId,
        previous: Option<AccountId>,
    },
    #[event_version("1.0.0")]
    ItemPriceSet {
        item_type: String,
        token_symbol: String,
        tier: u64,
        price: U128,
    },
    #[event_version("1.0.0")]
    ItemPriceCleared {
        item_type: String,
        token_symbol: String,
        tier: u64,
    },
}
