use crate::errors::ShopError;
use crate::events::ShopEvent;
use crate::state::{assert_valid_address, ShopState};
use near_sdk::AccountId;

pub fn transfer_ownership(
    state: &mut ShopState,
    caller: &AccountId,
    new_owner: AccountId,
) -> Result<(), ShopError> {
    state.assert_owner(caller)?;
    assert_valid_address(&new_owner)?;
    let old_owner = std::mem::replace(&mut state.owner, new_owner.clone());
    ShopEvent::OwnershipTransferred {
        old_owner,
        new_owner,
    }
    .emit();
    Ok(())
}

pub fn set_treasury_address(
    state: &mut ShopState,
    caller: &AccountId,
    treasury: AccountId,
) -> Result<(), ShopError> {
    state.assert_owner(caller)?;
    assert_valid_address(&treasury)?;
    let old_treasury = state.treasury.replace(treasury.clone());
    ShopEvent::TreasuryUpdated {
        old_treasury,
        new_treasury: treasury,
    }
    .emit();
    Ok(())
}

pub fn add_accepted_token(
    state: &mut ShopState,
    caller: &AccountId,
    symbol: String,
    token: AccountId,
) -> Result<(), ShopError> {
    state.assert_owner(caller)?;
    assert_valid_address(&token)?;
    if symbol.is_empty() {
        return Err(ShopError::InvalidSymbol);
    }
    let previous = state.accepted_tokens.insert(symbol.clone(), token.clone());
    ShopEvent::TokenAccepted {
        symbol,
        token,
        previous,
    }
    .emit();
    Ok(())
}
