use std::sync::{Arc, Mutex};
use std::thread;

use dsforest::DisjointForest;

#[test]
fn test_forest_behind_one_lock() {
    let _ = env_logger::builder().is_test(true).try_init();

    const THREADS: usize = 4;
    const PER_THREAD: usize = 64;

    let mut forest = DisjointForest::with_capacity(THREADS * PER_THREAD);
    let nodes: Vec<_> = (0..THREADS * PER_THREAD)
        .map(|element| {
            let node = forest.create(element);
            forest.make_set(node).unwrap();
            node
        })
        .collect();

    let forest = Arc::new(Mutex::new(forest));
    let nodes = Arc::new(nodes);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let forest = Arc::clone(&forest);
            let nodes = Arc::clone(&nodes);
            thread::spawn(move || {
                let chunk = &nodes[t * PER_THREAD..(t + 1) * PER_THREAD];
                for pair in chunk.windows(2) {
                    forest.lock().unwrap().union(pair[0], pair[1]).unwrap();
                }
                // finds compress paths, so they take the lock as well
                let mut forest = forest.lock().unwrap();
                let root = forest.find(chunk[0]).unwrap();
                assert!(chunk.iter().all(|&node| forest.find(node) == Ok(root)));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut forest = forest.lock().unwrap();
    let roots: Vec<_> = (0..THREADS)
        .map(|t| forest.find(nodes[t * PER_THREAD]).unwrap())
        .collect();
    for (i, a) in roots.iter().enumerate() {
        for b in &roots[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
