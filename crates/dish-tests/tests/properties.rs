//! Property tests over random operation sequences.
//!
//! Each case drives a manager on a manual clock through placements,
//! deliveries, clock advances and sweeps, checking the bookkeeping after
//! every step.

use std::collections::HashSet;

use dish_core::{Clock, Placement, ShelfKind, Temperature};
use dish_tests::helpers::{assert_consistent, manual_manager};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Place {
        temp: Temperature,
        shelf_life: f64,
        decay_rate: f64,
    },
    Deliver(usize),
    Advance(f64),
    Sweep,
}

fn op() -> impl Strategy<Value = Op> {
    let temp = prop::sample::select(vec![
        Temperature::Hot,
        Temperature::Cold,
        Temperature::Frozen,
        Temperature::Unknown,
    ]);
    prop_oneof![
        5 => (temp, 1.0f64..300.0, 0.0f64..3.0).prop_map(|(temp, shelf_life, decay_rate)| {
            Op::Place {
                temp,
                shelf_life,
                decay_rate,
            }
        }),
        2 => any::<usize>().prop_map(Op::Deliver),
        1 => (0.0f64..60.0).prop_map(Op::Advance),
        1 => Just(Op::Sweep),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bookkeeping_holds_after_every_step(
        caps in (0usize..4, 0usize..4, 0usize..4, 0usize..4),
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let (clock, manager) = manual_manager(caps.0, caps.1, caps.2, caps.3);

        for op in ops {
            match op {
                Op::Place { temp, shelf_life, decay_rate } => {
                    let order = dish_core::Order::new("prop", temp, shelf_life, decay_rate);
                    match manager.place_order(order) {
                        Placement::Shelved(kind) => {
                            prop_assert!(
                                temp.shelf_kind() == Some(kind) || kind == ShelfKind::Overflow
                            );
                        }
                        Placement::Wasted(order) => prop_assert!(order.wasted_at().is_some()),
                    }
                }
                Op::Deliver(pick) => {
                    let resident = manager.get_all_orders();
                    if !resident.is_empty() {
                        let id = resident[pick % resident.len()].id().clone();
                        let delivered = manager.deliver_order(id.as_str());
                        prop_assert!(delivered.is_some());
                        prop_assert!(manager.deliver_order(id.as_str()).is_none());
                    }
                }
                Op::Advance(secs) => clock.advance_secs(secs),
                Op::Sweep => {
                    manager.remove_expired_orders();
                    let now = manager.clock().now();
                    prop_assert!(manager.get_all_orders().iter().all(|o| !o.is_expired(now)));
                }
            }

            let stats = manager.get_stats();
            assert_consistent(&stats);

            let now = manager.clock().now();
            let resident = manager.get_all_orders();
            let ids: HashSet<_> = resident.iter().map(|o| o.id().clone()).collect();
            prop_assert_eq!(ids.len(), resident.len(), "order resident on two shelves");
            for order in &resident {
                let value = order.calculate_value(now);
                prop_assert!((0.0..=1.0).contains(&value), "value {} out of range", value);
                prop_assert!(order.placed_on_shelf_at().is_some());
                prop_assert_eq!(
                    order.current_shelf() == Some(ShelfKind::Overflow),
                    order.placed_on_overflow_at().is_some()
                );
            }
        }
    }

    #[test]
    fn unknown_temperatures_are_always_wasted(count in 1usize..20) {
        let (_clock, manager) = manual_manager(5, 5, 5, 5);
        for _ in 0..count {
            let order = dish_core::Order::new("odd", Temperature::Unknown, 10.0, 1.0);
            prop_assert!(!manager.place_order(order).is_placed());
        }
        let stats = manager.get_stats();
        prop_assert_eq!(stats.totals.wasted, count as u64);
        prop_assert_eq!(stats.occupancy(), 0);
    }
}
