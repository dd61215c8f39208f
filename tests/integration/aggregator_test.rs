use sb::core::Aggregator;
use sb::providers::{PollResult, ProviderError};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn ok(text: &str) -> PollResult {
    Ok(text.to_string())
}

#[test]
fn test_example_scenario_publish_sequence() {
    let aggregator = Aggregator::new(2, " | ");

    aggregator.publish(0, &ok("45%"));
    let composed = aggregator.publish(1, &ok("12:30")).unwrap();
    assert_eq!(composed.text, "45% | 12:30");

    assert!(aggregator.publish(0, &ok("45%")).is_none());
    assert_eq!(aggregator.publish(0, &ok("46%")).unwrap().text, "46% | 12:30");
    assert_eq!(aggregator.publish(1, &ok("12:31")).unwrap().text, "46% | 12:31");
}

#[test]
fn test_dedup_is_idempotent() {
    let aggregator = Aggregator::new(3, " | ");
    aggregator.publish(1, &ok("x"));
    let before = aggregator.snapshot();

    for _ in 0..10 {
        assert!(aggregator.publish(1, &ok("x")).is_none());
    }
    assert_eq!(aggregator.snapshot(), before);
}

#[test]
fn test_failure_retains_fragment() {
    let aggregator = Aggregator::new(2, " | ");
    aggregator.publish(0, &ok("up"));
    aggregator.publish(1, &ok("12:30"));

    aggregator.publish(0, &Err(ProviderError::unavailable("wlan0")));
    aggregator.publish(0, &ok(""));

    assert_eq!(aggregator.fragment(0).as_deref(), Some("up | "));
    assert_eq!(aggregator.snapshot().text, "up | 12:30");
}

#[test]
fn test_oversized_output_is_clamped() {
    let aggregator = Aggregator::new(1, " | ");
    let long = "x".repeat(500);
    aggregator.publish(0, &Ok(long));

    let fragment = aggregator.fragment(0).unwrap();
    assert!(fragment.len() <= aggregator.fragment_capacity());
    assert!(fragment.ends_with(" | "));
}

#[test]
fn test_concurrent_publish_produces_sequential_history() {
    const BLOCKS: usize = 8;
    const ROUNDS: usize = 200;

    let aggregator = Arc::new(Aggregator::new(BLOCKS, " | "));

    let workers: Vec<_> = (0..BLOCKS)
        .map(|block| {
            let aggregator = Arc::clone(&aggregator);
            thread::spawn(move || {
                (0..ROUNDS)
                    .filter_map(|round| aggregator.publish(block, &Ok(format!("b{}r{}", block, round))))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut history: Vec<_> = workers
        .into_iter()
        .flat_map(|w| w.join().unwrap())
        .collect();
    history.sort_by_key(|s| s.generation);

    // Every publish changed something, and generations are a gapless sequence
    assert_eq!(history.len(), BLOCKS * ROUNDS);
    for (i, snapshot) in history.iter().enumerate() {
        assert_eq!(snapshot.generation, i as u64 + 1);
    }

    // Each observed string is made of whole fragments, at most one per block,
    // and each block's round never goes backwards across the history
    let mut last_round = vec![None; BLOCKS];
    for snapshot in &history {
        let mut seen = HashSet::new();
        for part in snapshot.text.split(" | ") {
            let (block, round) = part
                .strip_prefix('b')
                .and_then(|p| p.split_once('r'))
                .map(|(b, r)| (b.parse::<usize>().unwrap(), r.parse::<usize>().unwrap()))
                .unwrap_or_else(|| panic!("torn fragment {:?} in {:?}", part, snapshot.text));
            assert!(seen.insert(block));
            assert!(last_round[block] <= Some(round));
            last_round[block] = Some(round);
        }
    }

    let final_text = aggregator.snapshot().text;
    let expected: Vec<_> = (0..BLOCKS).map(|b| format!("b{}r{}", b, ROUNDS - 1)).collect();
    assert_eq!(final_text, expected.join(" | "));
}
