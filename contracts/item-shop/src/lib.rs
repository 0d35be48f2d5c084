//! Item shop: owner-configured tiered prices for in-game items, paid in
//! accepted NEP-141 tokens and forwarded to a treasury.
//!
//! Buyers pay with `ft_transfer_call` on an accepted token, passing
//! [`BuyItemArgs`] as JSON in `msg`. The shop forwards the resolved price to
//! the treasury and returns any excess for refund.

use crate::purchase::Settlement;
use crate::state::ShopState;
use near_sdk::json_types::U128;
use near_sdk::{
    env, ext_contract, near, AccountId, Gas, NearToken, PanicOnDefault, PromiseOrValue,
};

mod admin;
mod errors;
mod events;
mod pricing;
mod purchase;
mod state;
mod types;

pub use errors::ShopError;
pub use events::ShopEvent;
pub use pricing::price_key;
pub use types::{AcceptedToken, BuyItemArgs, PendingPurchase, PriceKey, ShopConfig};

const GAS_FOR_FT_TRANSFER: Gas = Gas::from_tgas(15);
const GAS_FOR_CALLBACK: Gas = Gas::from_tgas(10);
const ONE_YOCTO: NearToken = NearToken::from_yoctonear(1);
const DEFAULT_PAGE_LIMIT: u32 = 50;

#[ext_contract(ext_ft)]
pub trait FungibleToken {
    fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>);
}

#[near(
    contract_state,
    contract_metadata(
        version = "0.1.0",
        standard(standard = "nep297", version = "1.0.0"),
    )
)]
#[derive(PanicOnDefault)]
pub struct ItemShopContract {
    state: ShopState,
}

#[near]
impl ItemShopContract {
    /// The deploying account becomes the owner.
    #[init]
    pub fn new() -> Self {
        Self {
            state: ShopState::new(env::predecessor_account_id()),
        }
    }

    // --- Admin ---

    #[handle_result]
    pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), ShopError> {
        crate::admin::transfer_ownership(&mut self.state, &env::predecessor_account_id(), new_owner)
    }

    #[handle_result]
    pub fn set_treasury_address(&mut self, treasury: AccountId) -> Result<(), ShopError> {
        crate::admin::set_treasury_address(&mut self.state, &env::predecessor_account_id(), treasury)
    }

    #[handle_result]
    pub fn add_accepted_token(&mut self, symbol: String, token: AccountId) -> Result<(), ShopError> {
        crate::admin::add_accepted_token(
            &mut self.state,
            &env::predecessor_account_id(),
            symbol,
            token,
        )
    }

    #[handle_result]
    pub fn set_item_price(
        &mut self,
        item_type: String,
        token_symbol: String,
        tier: u64,
        price: U128,
    ) -> Result<(), ShopError> {
        crate::pricing::set_item_price(
            &mut self.state,
            &env::predecessor_account_id(),
            item_type,
            token_symbol,
            tier,
            price,
        )
    }

    #[handle_result]
    pub fn batch_set_item_prices(
        &mut self,
        item_type: String,
        token_symbol: String,
        tiers: Vec<u64>,
        prices: Vec<U128>,
    ) -> Result<(), ShopError> {
        crate::pricing::batch_set_item_prices(
            &mut self.state,
            &env::predecessor_account_id(),
            item_type,
            token_symbol,
            tiers,
            prices,
        )
    }

    /// Removes a tier so purchases of that quantity fall back to the unit price.
    #[handle_result]
    pub fn clear_item_price(
        &mut self,
        item_type: String,
        token_symbol: String,
        tier: u64,
    ) -> Result<bool, ShopError> {
        crate::pricing::clear_item_price(
            &mut self.state,
            &env::predecessor_account_id(),
            item_type,
            token_symbol,
            tier,
        )
    }

    // --- Purchase ---

    /// NEP-141 receiver hook. Any error refunds the buyer in full through
    /// the token's `ft_resolve_transfer`.
    #[handle_result]
    pub fn ft_on_transfer(
        &mut self,
        sender_id: AccountId,
        amount: U128,
        msg: String,
    ) -> Result<PromiseOrValue<U128>, ShopError> {
        let args = crate::purchase::parse_buy_args(&msg)?;
        let paying_token = env::predecessor_account_id();
        match crate::purchase::buy_item(&mut self.state, &paying_token, sender_id, amount, args)? {
            Settlement::Settled(refund) => Ok(PromiseOrValue::Value(refund)),
            Settlement::Forward {
                token,
                treasury,
                purchase,
            } => {
                let memo = format!("{} x{}", purchase.item_type, purchase.quantity);
                Ok(ext_ft::ext(token)
                    .with_attached_deposit(ONE_YOCTO)
                    .with_static_gas(GAS_FOR_FT_TRANSFER)
                    .ft_transfer(treasury, purchase.total_price, Some(memo))
                    .then(
                        Self::ext(env::current_account_id())
                            .with_static_gas(GAS_FOR_CALLBACK)
                            .on_item_purchased(purchase),
                    )
                    .into())
            }
        }
    }

    /// Returns the amount to refund to the buyer.
    #[private]
    pub fn on_item_purchased(&mut self, purchase: PendingPurchase) -> U128 {
        let forwarded =
            env::promise_results_count() == 1 && env::promise_result_checked(0, 64).is_ok();
        crate::purchase::finish_purchase(&mut self.state, purchase, forwarded)
    }

    // --- Views ---

    pub fn get_owner(&self) -> AccountId {
        self.state.owner.clone()
    }

    pub fn get_treasury_address(&self) -> Option<AccountId> {
        self.state.treasury.clone()
    }

    pub fn get_config(&self) -> ShopConfig {
        ShopConfig {
            version: self.state.version.clone(),
            owner_id: self.state.owner.clone(),
            treasury_id: self.state.treasury.clone(),
        }
    }

    pub fn get_accepted_token(&self, symbol: String) -> Option<AccountId> {
        self.state.resolve_token(&symbol).cloned()
    }

    pub fn get_accepted_tokens(
        &self,
        from_index: Option<u32>,
        limit: Option<u32>,
    ) -> Vec<AcceptedToken> {
        self.state
            .accepted_tokens
            .iter()
            .skip(from_index.unwrap_or(0) as usize)
            .take(limit.unwrap_or(DEFAULT_PAGE_LIMIT) as usize)
            .map(|(symbol, token)| AcceptedToken {
                symbol: symbol.clone(),
                token: token.clone(),
            })
            .collect()
    }

    pub fn get_item_price(&self, item_type: String, token_symbol: String, tier: u64) -> Option<U128> {
        crate::pricing::get_item_price(&self.state, &item_type, &token_symbol, tier).map(U128)
    }

    /// Hex-encoded storage key of a price slot.
    pub fn get_item_price_key(&self, item_type: String, token_symbol: String, tier: u64) -> String {
        hex::encode(price_key(&item_type, &token_symbol, tier))
    }

    /// Total a buyer would pay for `quantity` items right now.
    #[handle_result]
    pub fn quote_price(
        &self,
        item_type: String,
        token_symbol: String,
        quantity: u64,
    ) -> Result<U128, ShopError> {
        if self.state.resolve_token(&token_symbol).is_none() {
            return Err(ShopError::InvalidToken);
        }
        crate::pricing::resolve_price(&self.state, &item_type, &token_symbol, quantity).map(U128)
    }

    pub fn is_settlement_pending(&self, account_id: AccountId) -> bool {
        self.state.pending_settlements.contains(&account_id)
    }
}
