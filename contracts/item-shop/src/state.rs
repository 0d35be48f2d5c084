use crate::errors::ShopError;
use crate::types::PriceKey;
use near_sdk::store::{IterableMap, LookupMap, LookupSet};
use near_sdk::{env, near, AccountId, BorshStorageKey};

#[derive(BorshStorageKey)]
#[near]
pub(crate) enum StorageKey {
    AcceptedTokens,
    ItemPrices,
    PendingSettlements,
}

#[near]
pub struct ShopState {
    pub version: String,
    pub owner: AccountId,
    pub treasury: Option<AccountId>,
    pub accepted_tokens: IterableMap<String, AccountId>,
    // Membership is the presence flag; a stored zero is a real price.
    pub item_prices: LookupMap<PriceKey, u128>,
    pub pending_settlements: LookupSet<AccountId>,
}

impl ShopState {
    pub fn new(owner: AccountId) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            owner,
            treasury: None,
            accepted_tokens: IterableMap::new(StorageKey::AcceptedTokens),
            item_prices: LookupMap::new(StorageKey::ItemPrices),
            pending_settlements: LookupSet::new(StorageKey::PendingSettlements),
        }
    }

    pub fn is_owner(&self, account_id: &AccountId) -> bool {
        &self.owner == account_id
    }

    pub fn assert_owner(&self, caller: &AccountId) -> Result<(), ShopError> {
        if !self.is_owner(caller) {
            return Err(ShopError::Unauthorized);
        }
        Ok(())
    }

    pub fn resolve_token(&self, symbol: &str) -> Option<&AccountId> {
        self.accepted_tokens.get(symbol)
    }
}

/// The shop's own account stands in for the null identity: rights or funds
/// routed to it can never be exercised or withdrawn.
pub fn assert_valid_address(account_id: &AccountId) -> Result<(), ShopError> {
    if account_id == &env::current_account_id() {
        return Err(ShopError::InvalidAddress);
    }
    Ok(())
}
