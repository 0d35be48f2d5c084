//! Tiered price table.
//!
//! A tier entry holds the total price for exactly that quantity. Tier 1 doubles
//! as the unit price used when a purchase quantity has no tier of its own.

use crate::errors::ShopError;
use crate::events::ShopEvent;
use crate::state::ShopState;
use crate::types::PriceKey;
use near_sdk::json_types::U128;
use near_sdk::{env, AccountId};

pub const UNIT_TIER: u64 = 1;

/// Derives the storage key of a price slot from the Borsh encoding of the triple.
pub fn price_key(item_type: &str, token_symbol: &str, tier: u64) -> PriceKey {
    let encoded = borsh::to_vec(&(item_type, token_symbol, tier))
        .unwrap_or_else(|_| env::panic_str("Price key encoding failed"));
    env::sha256_array(&encoded)
}

fn validate_slot(item_type: &str, token_symbol: &str, tier: u64) -> Result<(), ShopError> {
    if item_type.is_empty() {
        return Err(ShopError::InvalidItemType);
    }
    if token_symbol.is_empty() {
        return Err(ShopError::InvalidSymbol);
    }
    if tier == 0 {
        return Err(ShopError::InvalidTier);
    }
    Ok(())
}

pub fn set_item_price(
    state: &mut ShopState,
    caller: &AccountId,
    item_type: String,
    token_symbol: String,
    tier: u64,
    price: U128,
) -> Result<(), ShopError> {
    state.assert_owner(caller)?;
    validate_slot(&item_type, &token_symbol, tier)?;
    write_price(state, item_type, token_symbol, tier, price);
    Ok(())
}

/// Every entry is validated before the first write, so a failing batch leaves
/// the table untouched.
pub fn batch_set_item_prices(
    state: &mut ShopState,
    caller: &AccountId,
    item_type: String,
    token_symbol: String,
    tiers: Vec<u64>,
    prices: Vec<U128>,
) -> Result<(), ShopError> {
    state.assert_owner(caller)?;
    if tiers.len() != prices.len() {
        return Err(ShopError::LengthMismatch);
    }
    for tier in &tiers {
        validate_slot(&item_type, &token_symbol, *tier)?;
    }
    for (tier, price) in tiers.into_iter().zip(prices) {
        write_price(state, item_type.clone(), token_symbol.clone(), tier, price);
    }
    Ok(())
}

/// Returns whether an entry was removed.
pub fn clear_item_price(
    state: &mut ShopState,
    caller: &AccountId,
    item_type: String,
    token_symbol: String,
    tier: u64,
) -> Result<bool, ShopError> {
    state.assert_owner(caller)?;
    validate_slot(&item_type, &token_symbol, tier)?;
    let removed = state
        .item_prices
        .remove(&price_key(&item_type, &token_symbol, tier))
        .is_some();
    if removed {
        ShopEvent::ItemPriceCleared {
            item_type,
            token_symbol,
            tier,
        }
        .emit();
    }
    Ok(removed)
}

fn write_price(
    state: &mut ShopState,
    item_type: String,
    token_symbol: String,
    tier: u64,
    price: U128,
) {
    state
        .item_prices
        .insert(price_key(&item_type, &token_symbol, tier), price.0);
    ShopEvent::ItemPriceSet {
        item_type,
        token_symbol,
        tier,
        price,
    }
    .emit();
}

pub fn get_item_price(
    state: &ShopState,
    item_type: &str,
    token_symbol: &str,
    tier: u64,
) -> Option<u128> {
    state
        .item_prices
        .get(&price_key(item_type, token_symbol, tier))
        .copied()
}

/// Resolves the total payable for `quantity` items: the exact tier if
/// configured, otherwise the unit price times `quantity`.
pub fn resolve_price(
    state: &ShopState,
    item_type: &str,
    token_symbol: &str,
    quantity: u64,
) -> Result<u128, ShopError> {
    if quantity == 0 {
        return Err(ShopError::InvalidQuantity);
    }
    if let Some(total) = get_item_price(state, item_type, token_symbol, quantity) {
        return Ok(total);
    }
    let unit = get_item_price(state, item_type, token_symbol, UNIT_TIER)
        .ok_or(ShopError::PriceNotConfigured)?;
    unit.checked_mul(u128::from(quantity))
        .ok_or(ShopError::PriceOverflow)
}
