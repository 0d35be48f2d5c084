use crate::errors::ShopError;
use crate::events::ShopEvent;
use crate::pricing::resolve_price;
use crate::state::ShopState;
use crate::types::{BuyItemArgs, PendingPurchase};
use near_sdk::json_types::U128;
use near_sdk::{env, serde_json, AccountId};

/// What the receiver hook must do once a purchase has passed validation.
#[derive(Debug, PartialEq)]
pub enum Settlement {
    /// Forward `total_price` to `treasury`, then finish in the callback.
    Forward {
        token: AccountId,
        treasury: AccountId,
        purchase: PendingPurchase,
    },
    /// Nothing to forward; the purchase is complete. Holds the refund.
    Settled(U128),
}

pub fn parse_buy_args(msg: &str) -> Result<BuyItemArgs, ShopError> {
    serde_json::from_str(msg).map_err(|_| ShopError::InvalidMessage)
}

/// Validates a purchase paid with `amount` of the token contract `paying_token`.
/// All reads happen here, before any cross-contract call is scheduled.
pub fn buy_item(
    state: &mut ShopState,
    paying_token: &AccountId,
    buyer: AccountId,
    amount: U128,
    args: BuyItemArgs,
) -> Result<Settlement, ShopError> {
    let token = state
        .resolve_token(&args.token_symbol)
        .filter(|registered| *registered == paying_token)
        .cloned()
        .ok_or(ShopError::InvalidToken)?;

    let total_price = resolve_price(state, &args.item_type, &args.token_symbol, args.quantity)?;

    let treasury = state.treasury.clone().ok_or(ShopError::TreasuryNotSet)?;
    if amount.0 < total_price {
        return Err(ShopError::TransferFailed);
    }
    if state.pending_settlements.contains(&buyer) {
        return Err(ShopError::SettlementInProgress);
    }

    let purchase = PendingPurchase {
        buyer,
        item_type: args.item_type,
        quantity: args.quantity,
        token_symbol: args.token_symbol,
        total_price: U128(total_price),
        attached: amount,
    };

    if total_price == 0 {
        return Ok(Settlement::Settled(finish_purchase(state, purchase, true)));
    }

    state.pending_settlements.insert(purchase.buyer.clone());
    Ok(Settlement::Forward {
        token,
        treasury,
        purchase,
    })
}

/// Releases the buyer's guard and reports the outcome. Returns the amount the
/// token contract must refund to the buyer.
pub fn finish_purchase(state: &mut ShopState, purchase: PendingPurchase, forwarded: bool) -> U128 {
    state.pending_settlements.remove(&purchase.buyer);

    if !forwarded {
        env::log_str(&format!(
            "Forwarding {} {} to treasury failed, refunding {}",
            purchase.total_price.0, purchase.token_symbol, purchase.buyer
        ));
        ShopEvent::PurchaseFailed {
            buyer: purchase.buyer,
            item_type: purchase.item_type,
            quantity: purchase.quantity,
            token_symbol: purchase.token_symbol,
            amount: purchase.attached,
        }
        .emit();
        return purchase.attached;
    }

    let refund = purchase.attached.0.saturating_sub(purchase.total_price.0);
    ShopEvent::ItemBought {
        buyer: purchase.buyer,
        item_type: purchase.item_type,
        quantity: purchase.quantity,
        token_symbol: purchase.token_symbol,
        total_price: purchase.total_price,
    }
    .emit();
    U128(refund)
}
