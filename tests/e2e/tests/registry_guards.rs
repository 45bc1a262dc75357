//! Registry validation paths and the observer-facing event surface.

use pairswap_e2e_tests::{World, ALICE, BOB, REGISTRY_ACCOUNT, TOKEN_ONE, TOKEN_TWO};
use pairswap_types::{AssetId, Decimal, ExchangeError, ExchangeEvent};
use rust_decimal_macros::dec;

#[test]
fn create_pool_rejects_degenerate_pairs() {
    let mut world = World::new();

    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_ONE,
            dec!(10),
            dec!(10)
        ),
        Err(ExchangeError::SameAsset(_))
    ));
    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            AssetId::ZERO,
            TOKEN_TWO,
            dec!(10),
            dec!(10)
        ),
        Err(ExchangeError::InvalidAsset)
    ));
    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            AssetId::ZERO,
            dec!(10),
            dec!(10)
        ),
        Err(ExchangeError::InvalidAsset)
    ));
    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            Decimal::ZERO,
            Decimal::ZERO
        ),
        Err(ExchangeError::InvalidAmount(_))
    ));

    assert!(world.registry.events().is_empty());
}

#[test]
fn create_pool_rejects_duplicates_in_both_orientations() {
    let (mut world, _) = World::with_square_pool();

    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(20),
            dec!(20)
        ),
        Err(ExchangeError::PoolExists(..))
    ));
    assert!(matches!(
        world.registry.create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_TWO,
            TOKEN_ONE,
            dec!(20),
            dec!(20)
        ),
        Err(ExchangeError::PoolExists(..))
    ));
}

#[test]
fn create_pool_without_funding_leaves_no_trace() {
    let mut world = World::new();

    let err = world
        .registry
        .create_pool(
            BOB,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(10),
        )
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
    assert!(!world.registry.pair_exists(TOKEN_ONE, TOKEN_TWO));
    assert!(world.registry.events().is_empty());
}

#[test]
fn quotes_against_missing_pair_fail() {
    let world = World::new();

    assert!(matches!(
        world
            .registry
            .quote_amount_out(TOKEN_ONE, TOKEN_TWO, dec!(1)),
        Err(ExchangeError::PoolNotFound(..))
    ));
    assert!(matches!(
        world.registry.quote_amount_in(TOKEN_ONE, TOKEN_TWO, dec!(1)),
        Err(ExchangeError::PoolNotFound(..))
    ));
    assert!(matches!(
        world
            .registry
            .quote_liquidity(TOKEN_ONE, TOKEN_TWO, dec!(1)),
        Err(ExchangeError::PoolNotFound(..))
    ));
}

#[test]
fn mutations_against_missing_pair_fail() {
    let mut world = World::new();

    assert!(matches!(
        world.registry.swap_exact_in(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(1),
            dec!(0)
        ),
        Err(ExchangeError::PoolNotFound(..))
    ));
    assert!(matches!(
        world.registry.withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(1),
            dec!(0),
            dec!(0)
        ),
        Err(ExchangeError::PoolNotFound(..))
    ));
}

#[test]
fn pool_created_event_carries_creator_and_pair() {
    let (mut world, id) = World::with_square_pool();

    let events = world.registry.drain_events();
    match &events[0] {
        ExchangeEvent::PoolCreated {
            creator,
            asset_a,
            asset_b,
            pool,
        } => {
            assert_eq!(*creator, ALICE);
            assert_eq!(*asset_a, TOKEN_ONE);
            assert_eq!(*asset_b, TOKEN_TWO);
            assert_eq!(*pool, id);
        }
        other => panic!("expected PoolCreated, got {other:?}"),
    }
}

#[test]
fn events_serialize_for_external_observers() {
    let (mut world, _) = World::with_square_pool();
    world
        .registry
        .swap_exact_in(ALICE, &mut world.ledger, TOKEN_ONE, TOKEN_TWO, dec!(25), dec!(5))
        .unwrap();

    let events = world.registry.drain_events();
    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<ExchangeEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(events, back);
}

#[test]
fn registry_identity_is_exposed_for_approvals() {
    let world = World::new();
    assert_eq!(world.registry.account(), REGISTRY_ACCOUNT);
    assert_eq!(world.registry.config().fee_bps, 30);
}
