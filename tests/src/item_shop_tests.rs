// =============================================================================
// Item Shop Integration Tests
// =============================================================================
// Deploys the item-shop contract and a mock NEP-141 token into the sandbox and
// drives purchases through ft_transfer_call → ft_on_transfer → ft_transfer to
// the treasury → on_item_purchased → ft_resolve_transfer.

use anyhow::Result;
use near_workspaces::types::NearToken;
use near_workspaces::{Account, Contract};
use serde_json::{json, Value};

use crate::utils::{deploy_contract, events_named, get_wasm_path, setup_sandbox};

const ONE_USDC: u128 = 1_000_000;
const ONE_YOCTO: NearToken = NearToken::from_yoctonear(1);

struct Shop {
    worker: near_workspaces::Worker<near_workspaces::network::Sandbox>,
    owner: Account,
    treasury: Account,
    buyer: Account,
    shop: Contract,
    usdc: Contract,
}

// =============================================================================
// Setup
// =============================================================================

async fn deploy_token(
    worker: &near_workspaces::Worker<near_workspaces::network::Sandbox>,
    owner: &Account,
    symbol: &str,
) -> Result<Contract> {
    let token = deploy_contract(worker, &get_wasm_path("mock-ft")).await?;
    token
        .call("new")
        .args_json(json!({
            "owner_id": owner.id().to_string(),
            "total_supply": (1_000_000 * ONE_USDC).to_string(),
            "symbol": symbol,
            "decimals": 6
        }))
        .transact()
        .await?
        .into_result()?;
    Ok(token)
}

/// Shop owned by `owner`, with a treasury and USDC accepted. The buyer holds 1000 USDC.
async fn setup() -> Result<Shop> {
    let worker = setup_sandbox().await?;
    let owner = worker.dev_create_account().await?;
    let treasury = worker.dev_create_account().await?;
    let buyer = worker.dev_create_account().await?;

    let shop = deploy_contract(&worker, &get_wasm_path("item-shop")).await?;
    owner
        .call(shop.id(), "new")
        .args_json(json!({}))
        .transact()
        .await?
        .into_result()?;

    let usdc = deploy_token(&worker, &owner, "USDC").await?;
    usdc.call("mint")
        .args_json(json!({
            "account_id": buyer.id().to_string(),
            "amount": (1_000 * ONE_USDC).to_string()
        }))
        .transact()
        .await?
        .into_result()?;

    owner
        .call(shop.id(), "set_treasury_address")
        .args_json(json!({ "treasury": treasury.id().to_string() }))
        .transact()
        .await?
        .into_result()?;
    owner
        .call(shop.id(), "add_accepted_token")
        .args_json(json!({ "symbol": "USDC", "token": usdc.id().to_string() }))
        .transact()
        .await?
        .into_result()?;

    Ok(Shop {
        worker,
        owner,
        treasury,
        buyer,
        shop,
        usdc,
    })
}

async fn set_price(s: &Shop, item_type: &str, tier: u64, price: u128) -> Result<()> {
    s.owner
        .call(s.shop.id(), "set_item_price")
        .args_json(json!({
            "item_type": item_type,
            "token_symbol": "USDC",
            "tier": tier,
            "price": price.to_string()
        }))
        .transact()
        .await?
        .into_result()?;
    Ok(())
}

async fn buy(
    s: &Shop,
    token: &Contract,
    amount: u128,
    item_type: &str,
    quantity: u64,
    token_symbol: &str,
) -> Result<near_workspaces::result::ExecutionFinalResult> {
    s.buyer
        .call(token.id(), "ft_transfer_call")
        .args_json(json!({
            "receiver_id": s.shop.id().to_string(),
            "amount": amount.to_string(),
            "msg": json!({
                "item_type": item_type,
                "quantity": quantity,
                "token_symbol": token_symbol
            })
            .to_string()
        }))
        .deposit(ONE_YOCTO)
        .max_gas()
        .transact()
        .await
        .map_err(Into::into)
}

async fn balance(token: &Contract, account: &str) -> Result<u128> {
    let balance: String = token
        .view("ft_balance_of")
        .args_json(json!({ "account_id": account }))
        .await?
        .json()?;
    Ok(balance.parse()?)
}

async fn is_pending(s: &Shop) -> Result<bool> {
    Ok(s.shop
        .view("is_settlement_pending")
        .args_json(json!({ "account_id": s.buyer.id().to_string() }))
        .await?
        .json()?)
}

// =============================================================================
// Tests: Configuration
// =============================================================================

#[tokio::test]
async fn test_init_and_config_views() -> Result<()> {
    let s = setup().await?;

    let config: Value = s.shop.view("get_config").await?.json()?;
    assert_eq!(config["owner_id"], s.owner.id().as_str());
    assert_eq!(config["treasury_id"], s.treasury.id().as_str());

    let token: Option<String> = s
        .shop
        .view("get_accepted_token")
        .args_json(json!({ "symbol": "USDC" }))
        .await?
        .json()?;
    assert_eq!(token.as_deref(), Some(s.usdc.id().as_str()));
    Ok(())
}

#[tokio::test]
async fn test_non_owner_admin_calls_fail() -> Result<()> {
    let s = setup().await?;

    let result = s
        .buyer
        .call(s.shop.id(), "set_item_price")
        .args_json(json!({
            "item_type": "Sword",
            "token_symbol": "USDC",
            "tier": 1,
            "price": "1"
        }))
        .transact()
        .await?;
    assert!(result.is_failure());
    assert!(format!("{:?}", result.into_result()).contains("Only the owner"));

    let result = s
        .buyer
        .call(s.shop.id(), "transfer_ownership")
        .args_json(json!({ "new_owner": s.buyer.id().to_string() }))
        .transact()
        .await?;
    assert!(result.is_failure());

    let owner: String = s.shop.view("get_owner").await?.json()?;
    assert_eq!(owner, s.owner.id().as_str());
    Ok(())
}

#[tokio::test]
async fn test_batch_prices_and_quote() -> Result<()> {
    let s = setup().await?;
    s.owner
        .call(s.shop.id(), "batch_set_item_prices")
        .args_json(json!({
            "item_type": "Potion",
            "token_symbol": "USDC",
            "tiers": [1, 5, 10],
            "prices": [ONE_USDC.to_string(), (4 * ONE_USDC).to_string(), (7 * ONE_USDC).to_string()]
        }))
        .transact()
        .await?
        .into_result()?;

    for (quantity, expected) in [(1u64, ONE_USDC), (3, 3 * ONE_USDC), (5, 4 * ONE_USDC), (10, 7 * ONE_USDC)] {
        let quote: String = s
            .shop
            .view("quote_price")
            .args_json(json!({ "item_type": "Potion", "token_symbol": "USDC", "quantity": quantity }))
            .await?
            .json()?;
        assert_eq!(quote, expected.to_string(), "quantity {}", quantity);
    }
    Ok(())
}

// =============================================================================
// Tests: Purchases
// =============================================================================

#[tokio::test]
async fn test_purchase_with_unit_fallback_pays_treasury() -> Result<()> {
    let s = setup().await?;
    set_price(&s, "Shield", 1, 10 * ONE_USDC).await?;

    let result = buy(&s, &s.usdc, 30 * ONE_USDC, "Shield", 3, "USDC").await?;
    let logs: Vec<String> = result.logs().iter().map(|l| l.to_string()).collect();
    let outcome = result.into_result()?;
    let used: String = outcome.json()?;
    assert_eq!(used, (30 * ONE_USDC).to_string());

    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 30 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.buyer.id().as_str()).await?, 970 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.shop.id().as_str()).await?, 0);
    assert!(!is_pending(&s).await?);

    let bought = events_named(&logs, "item_bought");
    assert_eq!(bought.len(), 1);
    let data = &bought[0]["data"];
    assert_eq!(data["buyer"], s.buyer.id().as_str());
    assert_eq!(data["item_type"], "Shield");
    assert_eq!(data["quantity"], 3);
    assert_eq!(data["token_symbol"], "USDC");
    assert_eq!(data["total_price"], (30 * ONE_USDC).to_string());
    Ok(())
}

#[tokio::test]
async fn test_tier_price_and_overpayment_refund() -> Result<()> {
    let s = setup().await?;
    set_price(&s, "Sword", 1, 10 * ONE_USDC).await?;
    set_price(&s, "Sword", 3, 27 * ONE_USDC).await?;

    buy(&s, &s.usdc, 40 * ONE_USDC, "Sword", 3, "USDC")
        .await?
        .into_result()?;

    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 27 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.buyer.id().as_str()).await?, 973 * ONE_USDC);
    Ok(())
}

#[tokio::test]
async fn test_unpriced_item_refunds_buyer() -> Result<()> {
    let s = setup().await?;

    buy(&s, &s.usdc, 5 * ONE_USDC, "Helmet", 1, "USDC")
        .await?
        .into_result()?;

    assert_eq!(balance(&s.usdc, s.buyer.id().as_str()).await?, 1_000 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_unaccepted_token_refunds_buyer() -> Result<()> {
    let s = setup().await?;
    set_price(&s, "Shield", 1, ONE_USDC).await?;

    // Same symbol, different contract: the shop only trusts its registered USDC.
    let fake = deploy_token(&s.worker, &s.buyer, "USDC").await?;
    let before = balance(&fake, s.buyer.id().as_str()).await?;

    buy(&s, &fake, ONE_USDC, "Shield", 1, "USDC")
        .await?
        .into_result()?;

    assert_eq!(balance(&fake, s.buyer.id().as_str()).await?, before);
    assert_eq!(balance(&fake, s.treasury.id().as_str()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_failed_forward_refunds_and_releases_guard() -> Result<()> {
    let s = setup().await?;
    set_price(&s, "Shield", 1, 10 * ONE_USDC).await?;

    s.usdc
        .call("set_fail_next_transfer")
        .args_json(json!({ "should_fail": true }))
        .transact()
        .await?
        .into_result()?;

    let result = buy(&s, &s.usdc, 10 * ONE_USDC, "Shield", 1, "USDC").await?;
    let logs: Vec<String> = result.logs().iter().map(|l| l.to_string()).collect();
    result.into_result()?;

    assert_eq!(balance(&s.usdc, s.buyer.id().as_str()).await?, 1_000 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 0);
    assert!(!is_pending(&s).await?);
    assert!(events_named(&logs, "item_bought").is_empty());
    assert_eq!(events_named(&logs, "purchase_failed").len(), 1);

    // The guard is released, so the next attempt goes through.
    buy(&s, &s.usdc, 10 * ONE_USDC, "Shield", 1, "USDC")
        .await?
        .into_result()?;
    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 10 * ONE_USDC);
    Ok(())
}

#[tokio::test]
async fn test_underpayment_refunds_buyer() -> Result<()> {
    let s = setup().await?;
    set_price(&s, "Shield", 1, 10 * ONE_USDC).await?;

    buy(&s, &s.usdc, 29 * ONE_USDC, "Shield", 3, "USDC")
        .await?
        .into_result()?;

    assert_eq!(balance(&s.usdc, s.buyer.id().as_str()).await?, 1_000 * ONE_USDC);
    assert_eq!(balance(&s.usdc, s.treasury.id().as_str()).await?, 0);
    Ok(())
}
