// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use proptest::prelude::*;

use crate::stake::checksum::{checksum_from_parts, CheckpointTable};
use crate::tests::support::*;
use crate::types::Hash256;

fn times_from_gaps(gaps: &[i64]) -> Vec<i64> {
    let mut t = T0;
    gaps.iter()
        .map(|g| {
            t += g;
            t
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_replaying_a_chain_is_deterministic(
        gaps in prop::collection::vec(1i64..900, 1..40),
        stake_mask in any::<u64>(),
    ) {
        let mut blocks = linear_chain(&times_from_gaps(&gaps));
        for (i, b) in blocks.iter_mut().enumerate().skip(1) {
            if (stake_mask >> (i % 64)) & 1 == 1 {
                b.proof_hash = Some(Hash256([i as u8; 32]));
            }
        }

        let a = build(short_params(), CheckpointTable::new(), &blocks).entries();
        let b = build(short_params(), CheckpointTable::new(), &blocks).entries();
        prop_assert_eq!(&a, &b);

        for pair in a.windows(2) {
            prop_assert_eq!(
                pair[1].checksum,
                checksum_from_parts(pair[0].checksum, &pair[1].proof_hash_or_zero(), pair[1].stake_modifier)
            );
            // Only generated entries carry a modifier.
            if !pair[1].generated_modifier {
                prop_assert_eq!(pair[1].stake_modifier, 0);
            }
        }
    }

    #[test]
    fn proptest_generated_blocks_are_an_interval_apart(
        gaps in prop::collection::vec(1i64..400, 2..60),
    ) {
        let params = short_params();
        let blocks = linear_chain(&times_from_gaps(&gaps));
        let entries = build(params.clone(), CheckpointTable::new(), &blocks).entries();

        // Each regeneration is triggered by a parent at least one interval past the previous trigger.
        let triggers: Vec<i64> = entries
            .windows(2)
            .filter(|pair| pair[1].generated_modifier)
            .map(|pair| pair[0].time)
            .collect();
        for pair in triggers.windows(2) {
            prop_assert!(pair[1] >= pair[0] + params.modifier_interval);
        }
        if let Some(first) = triggers.first() {
            prop_assert!(*first >= params.genesis_epoch + params.modifier_interval);
        }
    }
}
