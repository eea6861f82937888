//! Unit tests for OutboundAddressAggregator fed by the record builder

use crate::common::{HistoryBuilder, DICE, GOMEZ_1, GOMEZ_2, KJ_1};
use address_tagger::config::TaggingPolicy;
use address_tagger::registry::KnownAddressRegistry;
use address_tagger::tagger::{AddressRecordBuilder, OutboundAddressAggregator, ServiceExclusion};

fn aggregate(histories: &[address_tagger::types::AddressHistory]) -> OutboundAddressAggregator {
    let registry = KnownAddressRegistry::default();
    let builder = AddressRecordBuilder::new(&registry, TaggingPolicy::default());
    let mut aggregator = OutboundAddressAggregator::new();
    for history in histories {
        builder.build(history, &mut aggregator).unwrap();
    }
    aggregator
}

#[test]
fn test_primary_and_any_views() {
    let histories = vec![
        HistoryBuilder::new("1a").spend(10, &[KJ_1, "1x", KJ_1]).build(),
        HistoryBuilder::new("1b").spend(10, &["1x"]).spend(5, &[KJ_1]).build(),
        HistoryBuilder::new("1c").spend(10, &[GOMEZ_1]).build(),
    ];
    let aggregator = aggregate(&histories);

    assert_eq!(aggregator.primary().get(KJ_1), 1);
    assert_eq!(aggregator.primary().get("1x"), 1);
    assert_eq!(aggregator.primary().get(GOMEZ_1), 1);

    // distinct per address: 1a paid KJ_1 twice but counts once
    assert_eq!(aggregator.any().get(KJ_1), 2);
    assert_eq!(aggregator.any().get("1x"), 2);
}

#[test]
fn test_dice_never_in_folded_views() {
    let histories: Vec<_> = (0..25)
        .map(|i| {
            HistoryBuilder::new(&format!("1src{}", i))
                .spend(10, &[DICE, GOMEZ_2])
                .build()
        })
        .collect();
    let aggregator = aggregate(&histories);
    let registry = KnownAddressRegistry::default();
    let exclusion = ServiceExclusion::dice_only();

    assert_eq!(aggregator.primary().get(DICE), 25);
    for counter in [aggregator.primary(), aggregator.any()] {
        let folded = counter.folded(&registry, &exclusion);
        assert!(folded.ranked().iter().all(|e| !e.key.starts_with("1dice")));
    }
    assert_eq!(aggregator.any().folded(&registry, &exclusion).get("GOMEZ"), 25);
}

#[test]
fn test_folded_sums_addresses_of_one_identity() {
    let histories = vec![
        HistoryBuilder::new("1a").spend(10, &[GOMEZ_1]).build(),
        HistoryBuilder::new("1b").spend(10, &[GOMEZ_2]).build(),
        HistoryBuilder::new("1c").spend(10, &["1plain"]).build(),
    ];
    let aggregator = aggregate(&histories);
    let folded = aggregator
        .primary()
        .folded(&KnownAddressRegistry::default(), &ServiceExclusion::dice_only());

    let ranked = folded.ranked();
    assert_eq!(ranked[0].key, "GOMEZ");
    assert_eq!(ranked[0].count, 2);
    assert_eq!(folded.get("1plain"), 1);
}
