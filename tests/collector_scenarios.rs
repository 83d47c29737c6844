use crossgc::{Collectible, Collector, GcObject, Handle, SharedTable, Value};
use proptest::prelude::*;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::thread;

#[test]
fn test_two_scoped_objects() {
    let gc = Collector::new();
    {
        let _a: GcObject = gc.create();
        let _b: GcObject = gc.create();
    }
    assert_eq!(gc.size(), 2);

    gc.cleanup();
    assert_eq!(gc.size(), 0);
}

#[test]
fn test_root_orphan_and_children() {
    let gc = Collector::new();
    let root: SharedTable = gc.create();
    {
        let _orphan: SharedTable = gc.create();
        for i in 0..3i64 {
            let child: SharedTable = gc.create();
            root.set(i, child.handle());
        }
    }
    assert_eq!(gc.size(), 5);

    gc.cleanup();
    assert_eq!(gc.size(), 4);

    drop(root);
    gc.cleanup();
    assert_eq!(gc.size(), 0);
}

#[test]
fn test_five_threads_stay_below_step() {
    let gc = Arc::new(Collector::new());

    let threads: Vec<_> = (0..5)
        .map(|_| {
            let gc = Arc::clone(&gc);
            thread::spawn(move || {
                for _ in 0..1000 {
                    let _: GcObject = gc.create();
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    assert!(gc.size() < gc.step());
}

#[test]
fn test_table_shared_between_threads() {
    let gc = Arc::new(Collector::with_step(32));
    let shared: SharedTable = gc.create();

    let threads: Vec<_> = (0..4i64)
        .map(|t| {
            let gc = Arc::clone(&gc);
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..100i64 {
                    let element: SharedTable = gc.create();
                    element.set("value", t * 100 + i);
                    shared.set(t * 100 + i, element.handle());
                }
            })
        })
        .collect();

    for thread in threads {
        thread.join().unwrap();
    }

    gc.cleanup();
    assert_eq!(gc.size(), 401);

    let handle = shared.get(250i64).and_then(|v| v.as_object()).unwrap();
    let element: SharedTable = gc.get(handle).unwrap();
    assert_eq!(element.get("value"), Some(Value::Int(250)));
}

#[derive(Debug, Clone)]
enum Op {
    Create,
    Duplicate(usize),
    Destroy(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Create),
        any::<usize>().prop_map(Op::Duplicate),
        any::<usize>().prop_map(Op::Destroy),
    ]
}

proptest! {
    #[test]
    fn prop_acyclic_size_matches_held(ops in prop::collection::vec(op(), 0..200)) {
        let gc = Collector::with_step(usize::MAX);
        let mut holders: Vec<GcObject> = Vec::new();

        for op in ops {
            match op {
                Op::Create => holders.push(gc.create()),
                Op::Duplicate(i) if !holders.is_empty() => {
                    let dup = holders[i % holders.len()].clone();
                    holders.push(dup);
                }
                Op::Destroy(i) if !holders.is_empty() => {
                    let len = holders.len();
                    holders.swap_remove(i % len);
                }
                _ => {}
            }
        }

        gc.cleanup();
        let held: HashSet<Handle> = holders.iter().map(|h| h.handle()).collect();
        prop_assert_eq!(gc.size(), held.len());
        for handle in held {
            prop_assert!(gc.contains(handle));
        }
    }

    #[test]
    fn prop_survivors_are_reachable_from_held(
        count in 1usize..40,
        edges in prop::collection::vec((0usize..40, 0usize..40), 0..80),
        held in prop::collection::vec(any::<bool>(), 40),
    ) {
        let gc = Collector::with_step(usize::MAX);
        let nodes: Vec<GcObject> = (0..count).map(|_| gc.create()).collect();
        let handles: Vec<Handle> = nodes.iter().map(|n| n.handle()).collect();

        let mut adjacency = vec![Vec::new(); count];
        for (from, to) in edges {
            let (from, to) = (from % count, to % count);
            nodes[from].add_link(handles[to]);
            adjacency[from].push(to);
        }

        let kept: Vec<GcObject> = nodes
            .into_iter()
            .zip(held.iter())
            .filter_map(|(node, keep)| keep.then_some(node))
            .collect();

        // Reference closure over the link graph
        let mut reachable = HashSet::new();
        let mut queue: VecDeque<usize> = (0..count).filter(|i| held[*i]).collect();
        while let Some(i) = queue.pop_front() {
            if reachable.insert(i) {
                queue.extend(adjacency[i].iter().copied());
            }
        }

        let stats = gc.cleanup();
        prop_assert_eq!(stats.reachable, reachable.len());
        prop_assert_eq!(gc.size(), reachable.len());
        for i in 0..count {
            prop_assert_eq!(gc.contains(handles[i]), reachable.contains(&i));
        }
        drop(kept);
    }
}
