//! Liquidity provision and withdrawal end to end, including pool
//! deregistration when the last share is burned.

use pairswap_e2e_tests::{World, ALICE, BOB, TOKEN_ONE, TOKEN_TWO};
use pairswap_types::{Decimal, ExchangeError, ExchangeEvent};
use rust_decimal_macros::dec;

#[test]
fn provision_is_ratio_bound_by_the_smaller_side() {
    let (mut world, id) = World::with_square_pool();

    let receipt = world
        .registry
        .provide_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(12),
        )
        .unwrap();
    assert_eq!(receipt.amount_a, dec!(10));
    assert_eq!(receipt.amount_b, dec!(10));
    assert_eq!(receipt.shares_minted, dec!(0.1));

    assert_eq!(world.balance(TOKEN_ONE, ALICE), dec!(140));
    assert_eq!(world.balance(TOKEN_TWO, ALICE), dec!(140));

    // mirrored desired amounts against the grown pool bind the same way
    let receipt = world
        .registry
        .provide_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(12),
            dec!(10),
        )
        .unwrap();
    assert_eq!(receipt.amount_a, dec!(10));
    assert_eq!(receipt.amount_b, dec!(10));
    assert_eq!(receipt.shares_minted, dec!(0.1));

    let pool = world.registry.pool(id).unwrap();
    assert_eq!(pool.reserves(), (dec!(120), dec!(120)));
    assert_eq!(pool.total_shares(), dec!(1.2));
    assert_eq!(pool.share_balance_of(ALICE), dec!(1.2));
    assert_eq!(world.balance(TOKEN_ONE, ALICE), dec!(130));
    assert_eq!(world.balance(TOKEN_TWO, ALICE), dec!(130));
}

#[test]
fn provision_accepts_reversed_asset_order() {
    let (mut world, id) = World::with_square_pool();

    let receipt = world
        .registry
        .provide_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_TWO,
            TOKEN_ONE,
            dec!(10),
            dec!(10),
        )
        .unwrap();
    assert_eq!(receipt.shares_minted, dec!(0.1));

    let pool = world.registry.pool(id).unwrap();
    assert_eq!(pool.reserves(), (dec!(110), dec!(110)));
}

#[test]
fn provision_without_funds_fails_atomically() {
    let (mut world, id) = World::with_square_pool();

    let err = world
        .registry
        .provide_liquidity(
            BOB,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(10),
        )
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));

    let pool = world.registry.pool(id).unwrap();
    assert_eq!(pool.reserves(), (dec!(100), dec!(100)));
    assert_eq!(pool.total_shares(), dec!(1));
}

#[test]
fn liquidity_value_follows_caller_asset_order() {
    let mut world = World::new();
    world
        .registry
        .create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(30),
        )
        .unwrap();

    let (one, two) = world
        .registry
        .quote_liquidity(TOKEN_ONE, TOKEN_TWO, dec!(0.5))
        .unwrap();
    assert_eq!((one, two), (dec!(5), dec!(15)));

    let (two, one) = world
        .registry
        .quote_liquidity(TOKEN_TWO, TOKEN_ONE, dec!(0.5))
        .unwrap();
    assert_eq!((two, one), (dec!(15), dec!(5)));

    let (zero_a, zero_b) = world
        .registry
        .quote_liquidity(TOKEN_ONE, TOKEN_TWO, Decimal::ZERO)
        .unwrap();
    assert_eq!((zero_a, zero_b), (Decimal::ZERO, Decimal::ZERO));
}

#[test]
fn partial_withdrawal_pays_proportional_amounts() {
    let (mut world, id) = World::with_square_pool();

    let receipt = world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(0.5),
            dec!(1),
            dec!(1),
        )
        .unwrap();
    assert_eq!(receipt.amount_a, dec!(50));
    assert_eq!(receipt.amount_b, dec!(50));
    assert!(!receipt.drained);

    let pool = world.registry.pool(id).unwrap();
    assert_eq!(pool.reserves(), (dec!(50), dec!(50)));
    assert_eq!(pool.total_shares(), dec!(0.5));
    assert_eq!(world.balance(TOKEN_ONE, ALICE), dec!(200));
    assert_eq!(world.balance(TOKEN_TWO, ALICE), dec!(200));
}

#[test]
fn withdrawal_from_skewed_pool_in_reversed_order() {
    let mut world = World::new();
    world
        .registry
        .create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(30),
        )
        .unwrap();

    // caller names (TOKEN_TWO, TOKEN_ONE): bounds are 15 of two, 5 of one
    let receipt = world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_TWO,
            TOKEN_ONE,
            dec!(0.5),
            dec!(15),
            dec!(5),
        )
        .unwrap();
    assert_eq!(receipt.amount_a, dec!(5));
    assert_eq!(receipt.amount_b, dec!(15));

    assert_eq!(world.balance(TOKEN_ONE, ALICE), dec!(245));
    assert_eq!(world.balance(TOKEN_TWO, ALICE), dec!(235));
}

#[test]
fn withdrawal_slippage_bounds_enforced_per_side() {
    let (mut world, _) = World::with_square_pool();

    for (min_one, min_two) in [(dec!(1000), dec!(1)), (dec!(1), dec!(1000))] {
        let err = world
            .registry
            .withdraw_liquidity(
                ALICE,
                &mut world.ledger,
                TOKEN_ONE,
                TOKEN_TWO,
                dec!(0.5),
                min_one,
                min_two,
            )
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Slippage { .. }));
    }
}

#[test]
fn withdrawal_beyond_held_shares_fails() {
    let (mut world, _) = World::with_square_pool();

    let err = world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(1),
            dec!(1),
        )
        .unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
}

#[test]
fn full_withdrawal_drains_and_deregisters_the_pair() {
    let (mut world, id) = World::with_square_pool();

    let receipt = world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(1),
            dec!(100),
            dec!(100),
        )
        .unwrap();
    assert!(receipt.drained);

    assert!(!world.registry.pair_exists(TOKEN_ONE, TOKEN_TWO));
    assert!(!world.registry.pair_exists(TOKEN_TWO, TOKEN_ONE));
    assert!(world.registry.pool(id).is_none());
    assert!(matches!(
        world
            .registry
            .quote_amount_out(TOKEN_ONE, TOKEN_TWO, dec!(1)),
        Err(ExchangeError::PoolNotFound(..))
    ));

    // every token is back with alice
    assert_eq!(world.balance(TOKEN_ONE, ALICE), dec!(250));
    assert_eq!(world.balance(TOKEN_TWO, ALICE), dec!(250));

    // the drained pair can be created anew
    let second = world
        .registry
        .create_pool(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(40),
            dec!(40),
        )
        .unwrap();
    assert_ne!(second, id);
}

#[test]
fn round_trip_restores_share_position_within_rounding() {
    let (mut world, id) = World::with_square_pool();

    let receipt = world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(0.25),
            dec!(1),
            dec!(1),
        )
        .unwrap();

    let back = world
        .registry
        .provide_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            receipt.amount_a,
            receipt.amount_b,
        )
        .unwrap();

    let drift = (back.shares_minted - dec!(0.25)).abs();
    assert!(drift <= dec!(0.000000000000000001), "drift={drift}");

    let pool = world.registry.pool(id).unwrap();
    assert_eq!(pool.reserves(), (dec!(100), dec!(100)));
}

#[test]
fn liquidity_operations_emit_events_in_order() {
    let (mut world, _) = World::with_square_pool();

    world
        .registry
        .provide_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(10),
            dec!(10),
        )
        .unwrap();
    world
        .registry
        .withdraw_liquidity(
            ALICE,
            &mut world.ledger,
            TOKEN_ONE,
            TOKEN_TWO,
            dec!(0.1),
            dec!(1),
            dec!(1),
        )
        .unwrap();

    let events = world.registry.drain_events();
    assert!(matches!(events[0], ExchangeEvent::PoolCreated { .. }));
    assert!(matches!(
        events[1],
        ExchangeEvent::LiquidityProvided { .. }
    ));
    match &events[2] {
        ExchangeEvent::LiquidityWithdrawn { account, shares, .. } => {
            assert_eq!(*account, ALICE);
            assert_eq!(*shares, dec!(0.1));
        }
        other => panic!("expected LiquidityWithdrawn, got {other:?}"),
    }
    assert!(world.registry.events().is_empty());
}
