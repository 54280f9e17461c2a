//! Property-based tests for the reading contract.

use proptest::prelude::*;
use reading_ledger::{ContractError, MemoryStub, Reading, ReadingContract};

fn reading_strategy() -> impl Strategy<Value = Reading> {
    (
        "[a-zA-Z0-9_:.-]{1,32}",
        any::<i64>(),
        any::<i64>(),
        any::<i64>(),
    )
        .prop_map(|(id, cycle, consumed, injected)| Reading::new(id, cycle, consumed, injected))
}

proptest! {
    #[test]
    fn create_then_read_returns_same_reading(reading in reading_strategy()) {
        let stub = MemoryStub::new();
        let contract = ReadingContract;

        prop_assert!(!contract.reading_exists(&stub, &reading.id).unwrap());
        contract
            .create_reading(&stub, &reading.id, reading.cycle, reading.consumed, reading.injected)
            .unwrap();

        prop_assert!(contract.reading_exists(&stub, &reading.id).unwrap());
        prop_assert_eq!(contract.read_reading(&stub, &reading.id).unwrap(), reading);
    }

    #[test]
    fn duplicate_create_leaves_original(
        first in reading_strategy(),
        cycle in any::<i64>(),
        consumed in any::<i64>(),
        injected in any::<i64>(),
    ) {
        let stub = MemoryStub::new();
        let contract = ReadingContract;
        contract
            .create_reading(&stub, &first.id, first.cycle, first.consumed, first.injected)
            .unwrap();

        let result = contract.create_reading(&stub, &first.id, cycle, consumed, injected);
        prop_assert!(matches!(result, Err(ContractError::AlreadyExists(_))));
        prop_assert_eq!(contract.read_reading(&stub, &first.id).unwrap(), first);
    }

    #[test]
    fn read_all_returns_every_created_reading(
        readings in prop::collection::btree_map("[a-z0-9]{1,12}", any::<(i64, i64, i64)>(), 0..16),
    ) {
        let stub = MemoryStub::new();
        let contract = ReadingContract;
        for (id, (cycle, consumed, injected)) in &readings {
            contract.create_reading(&stub, id, *cycle, *consumed, *injected).unwrap();
        }

        let all = contract.get_all_readings(&stub).unwrap();
        prop_assert_eq!(all.len(), readings.len());
        for reading in all {
            let expected = readings.get(&reading.id).copied();
            prop_assert_eq!(expected, Some((reading.cycle, reading.consumed, reading.injected)));
        }
        prop_assert_eq!(stub.open_iterators(), 0);
    }
}
