//! Minimal NEP-141 token used as a payment currency in item-shop sandbox tests.
//!
//! Covers the surface the shop touches:
//! - ft_transfer_call (buyer pays the shop, unused amount is refunded)
//! - ft_transfer (shop forwards the price to its treasury)
//! - ft_balance_of (assert where the funds ended up)
//!
//! `set_fail_next_transfer` makes the next `ft_transfer` panic so the shop's
//! failed-forward path can be exercised end to end.

use near_sdk::json_types::U128;
use near_sdk::store::LookupMap;
use near_sdk::{env, near, AccountId, Gas, NearToken, PanicOnDefault, Promise, PromiseOrValue};

const GAS_FOR_FT_ON_TRANSFER: Gas = Gas::from_tgas(80);
const GAS_FOR_RESOLVE_TRANSFER: Gas = Gas::from_tgas(10);

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MockFT {
    balances: LookupMap<AccountId, u128>,
    total_supply: u128,
    symbol: String,
    decimals: u8,
    fail_next_transfer: bool,
}

#[near(serializers = [json])]
pub struct FtMetadata {
    pub spec: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[near]
impl MockFT {
    #[init]
    pub fn new(owner_id: AccountId, total_supply: U128, symbol: String, decimals: u8) -> Self {
        let mut balances = LookupMap::new(b"b");
        balances.insert(owner_id, total_supply.0);
        Self {
            balances,
            total_supply: total_supply.0,
            symbol,
            decimals,
            fail_next_transfer: false,
        }
    }

    // --- NEP-141 core ---

    #[payable]
    pub fn ft_transfer(&mut self, receiver_id: AccountId, amount: U128, memo: Option<String>) {
        assert_one_yocto();
        if self.fail_next_transfer {
            self.fail_next_transfer = false;
            env::panic_str("MockFT: Simulated transfer failure");
        }
        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);
    }

    #[payable]
    pub fn ft_transfer_call(
        &mut self,
        receiver_id: AccountId,
        amount: U128,
        memo: Option<String>,
        msg: String,
    ) -> PromiseOrValue<U128> {
        assert_one_yocto();
        let sender_id = env::predecessor_account_id();
        self.internal_transfer(&sender_id, &receiver_id, amount.0, memo);

        Promise::new(receiver_id.clone())
            .function_call(
                "ft_on_transfer".to_string(),
                near_sdk::serde_json::json!({
                    "sender_id": sender_id,
                    "amount": amount,
                    "msg": msg
                })
                .to_string()
                .into_bytes(),
                NearToken::from_near(0),
                GAS_FOR_FT_ON_TRANSFER,
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE_TRANSFER)
                    .ft_resolve_transfer(sender_id, receiver_id, amount),
            )
            .into()
    }

    /// Returns the amount actually kept by the receiver.
    #[private]
    pub fn ft_resolve_transfer(
        &mut self,
        sender_id: AccountId,
        receiver_id: AccountId,
        amount: U128,
    ) -> U128 {
        let unused = match env::promise_result_checked(0, 64) {
            Ok(data) => near_sdk::serde_json::from_slice::<U128>(&data)
                .map(|unused| unused.0.min(amount.0))
                .unwrap_or(0),
            Err(_) => amount.0,
        };

        if unused > 0 {
            let receiver_balance = self.balance_of(&receiver_id);
            let refund = unused.min(receiver_balance);
            if refund > 0 {
                self.balances.insert(receiver_id, receiver_balance - refund);
                let sender_balance = self.balance_of(&sender_id);
                self.balances.insert(sender_id, sender_balance + refund);
            }
        }

        U128(amount.0 - unused)
    }

    pub fn ft_balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.balance_of(&account_id))
    }

    pub fn ft_total_supply(&self) -> U128 {
        U128(self.total_supply)
    }

    pub fn ft_metadata(&self) -> FtMetadata {
        FtMetadata {
            spec: "ft-1.0.0".to_string(),
            name: format!("Mock {}", self.symbol),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }

    // --- Test helpers ---

    pub fn mint(&mut self, account_id: AccountId, amount: U128) {
        let current = self.balance_of(&account_id);
        self.balances.insert(account_id, current + amount.0);
        self.total_supply += amount.0;
    }

    pub fn set_fail_next_transfer(&mut self, should_fail: bool) {
        self.fail_next_transfer = should_fail;
    }

    pub fn get_fail_next_transfer(&self) -> bool {
        self.fail_next_transfer
    }
}

impl MockFT {
    fn balance_of(&self, account_id: &AccountId) -> u128 {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    fn internal_transfer(
        &mut self,
        sender_id: &AccountId,
        receiver_id: &AccountId,
        amount: u128,
        _memo: Option<String>,
    ) {
        let sender_balance = self.balance_of(sender_id);
        assert!(sender_balance >= amount, "Insufficient balance");
        self.balances.insert(sender_id.clone(), sender_balance - amount);
        let receiver_balance = self.balance_of(receiver_id);
        self.balances.insert(receiver_id.clone(), receiver_balance + amount);
    }
}

fn assert_one_yocto() {
    assert_eq!(
        env::attached_deposit(),
        NearToken::from_yoctonear(1),
        "Requires 1 yoctoNEAR"
    );
}
