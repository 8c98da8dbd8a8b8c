use ledger_core::pow::mine_block;
use ledger_core::{Block, BlockHasher, Chain, ChainConfig, LedgerError, Sha256Hasher};
use std::sync::{Arc, Barrier};
use std::thread;

/// Parks the first trial of any block carrying "stale" until the test has
/// appended a competitor. Suffix "7" is the only one meeting difficulty 1.
struct GateHasher {
    gate: Barrier,
}

impl BlockHasher for GateHasher {
    fn digest(&self, block: &Block) -> String {
        if block.data == "stale" && block.suffix == "0" {
            self.gate.wait();
            self.gate.wait();
        }
        let hex = Sha256Hasher.digest(block);
        let lead = if block.suffix == "7" { '0' } else { 'f' };
        format!("{lead}{}", &hex[1..])
    }
}

#[test]
fn stale_submission_is_returned_but_not_appended() -> anyhow::Result<()> {
    let hasher = GateHasher {
        gate: Barrier::new(2),
    };
    let chain = Chain::new(hasher, ChainConfig::default())?;
    let genesis = chain.tip()?;

    let (stale, winner) = thread::scope(|s| {
        let miner = s.spawn(|| chain.submit_data("stale"));
        // The miner has read the tip and started searching.
        chain.hasher().gate.wait();
        let winner = chain.submit_data("winner");
        chain.hasher().gate.wait();
        (miner.join().expect("miner panicked"), winner)
    });
    let stale = stale?;
    let winner = winner?;

    assert!(winner.accepted);
    assert!(!stale.accepted);
    assert_eq!(stale.block.data, "stale");
    assert_eq!(stale.block.index, 1);
    assert_eq!(stale.block.suffix, "7");
    assert_eq!(stale.block.prev_hash, genesis.hash);
    assert_eq!(chain.hasher().digest(&stale.block), stale.block.hash);
    assert_eq!(chain.snapshot(), vec![genesis, winner.block]);
    Ok(())
}

#[test]
fn racing_candidates_have_one_winner() -> anyhow::Result<()> {
    let chain = Arc::new(Chain::with_defaults()?);
    let parent = chain.tip()?;
    let racers = 8;
    let barrier = Arc::new(Barrier::new(racers));

    let handles: Vec<_> = (0..racers)
        .map(|i| {
            let chain = Arc::clone(&chain);
            let barrier = Arc::clone(&barrier);
            let parent = parent.clone();
            thread::spawn(move || {
                let block = mine_block(&Sha256Hasher, &parent, format!("racer {i}"))?;
                barrier.wait();
                chain.append(block)
            })
        })
        .collect();

    let results: Vec<Result<(), LedgerError>> = handles
        .into_iter()
        .map(|h| h.join().expect("racer panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, LedgerError::RejectedBlock { index: 1, .. })));
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.tip()?.index, parent.index + 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_stay_linear() -> anyhow::Result<()> {
    let chain = Arc::new(Chain::with_defaults()?);
    let mut handles = Vec::new();
    for i in 0..16 {
        let chain = Arc::clone(&chain);
        handles.push(tokio::task::spawn_blocking(move || {
            chain.submit_data(format!("payload {i}"))
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        let submission = handle.await??;
        if submission.accepted {
            accepted += 1;
        }
    }

    let blocks = chain.snapshot();
    assert_eq!(blocks.len(), accepted + 1);
    for (i, pair) in blocks.windows(2).enumerate() {
        assert_eq!(pair[1].index, i as u64 + 1);
        assert_eq!(pair[1].prev_hash, pair[0].hash);
    }
    Ok(())
}
