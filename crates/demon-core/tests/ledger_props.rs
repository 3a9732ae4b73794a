//! Property-based tests for the demon ledger and the tick loop.
//!
//! - demon entropy stays in [0, budget] for any charge/budget sequence
//! - a clock never leaves that range, whatever the population or mode

use demon_core::{ChargeSource, DemonLedger, SimulationClock};
use demon_types::SimulationConfig;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Charge(ChargeSource),
    Budget(f64),
    Door(bool),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Charge(ChargeSource::DoorOpen)),
        Just(Op::Charge(ChargeSource::Crossing)),
        Just(Op::Charge(ChargeSource::DoorHit)),
        (0.0f64..50.0).prop_map(Op::Budget),
        any::<bool>().prop_map(Op::Door),
    ]
}

proptest! {
    #[test]
    fn ledger_stays_within_budget(
        budget in 0.0f64..50.0,
        cost in 0.0f64..5.0,
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut ledger = DemonLedger::new(budget, cost);
        let mut previous = 0.0;
        for op in ops {
            match op {
                Op::Charge(source) => {
                    let added = ledger.charge(source);
                    prop_assert!(added >= 0.0);
                    prop_assert!(ledger.accumulated() >= previous);
                }
                Op::Budget(b) => ledger.set_budget(b),
                Op::Door(open) => {
                    ledger.observe_door(open);
                }
            }
            prop_assert!(ledger.accumulated() >= 0.0);
            prop_assert!(ledger.accumulated() <= ledger.budget());
            previous = ledger.accumulated();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn clock_stays_within_budget(
        blue in 0usize..25,
        red in 0usize..25,
        perfect in any::<bool>(),
        toggles in prop::collection::vec(any::<bool>(), 1..40),
        seed in any::<u64>(),
    ) {
        let mut clock = SimulationClock::new(SimulationConfig {
            blue_count: blue,
            red_count: red,
            perfect_mode: perfect,
            seed: Some(seed),
            ..Default::default()
        });
        for toggle in toggles {
            if toggle {
                clock.toggle_door();
            }
            clock.run(5);
            let s = clock.summary();
            prop_assert!(s.demon_entropy >= 0.0);
            prop_assert!(s.demon_entropy <= s.demon_budget);
            prop_assert!(s.system_entropy >= 0.0);
        }
    }
}
