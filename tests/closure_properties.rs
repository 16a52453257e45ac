use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::DiGraph;
use proptest::prelude::*;

use poset_store::RelationStore;

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Remove(usize),
    Add(usize, usize),
    Del(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let ix = 0..NAMES.len();
    prop_oneof![
        2 => ix.clone().prop_map(Op::Insert),
        1 => ix.clone().prop_map(Op::Remove),
        4 => (ix.clone(), ix.clone()).prop_map(|(a, b)| Op::Add(a, b)),
        2 => (ix.clone(), ix).prop_map(|(a, b)| Op::Del(a, b)),
    ]
}

fn full_store() -> RelationStore {
    let mut s = RelationStore::new();
    for n in NAMES {
        s.insert(n).unwrap();
    }
    s
}

fn related(s: &RelationStore, a: &str, b: &str) -> bool {
    s.test(a, b).unwrap()
}

fn check_invariants(s: &RelationStore) -> Result<(), TestCaseError> {
    let names: Vec<&str> = s.elements().collect();
    for &a in &names {
        prop_assert!(related(s, a, a), "{a} not reflexive");
        prop_assert!(!s.successors(a).unwrap().contains(&a));
        for &b in &names {
            if a == b {
                continue;
            }
            let forward = s.successors(a).unwrap().contains(&b);
            prop_assert_eq!(forward, s.predecessors(b).unwrap().contains(&a));
            prop_assert!(!(related(s, a, b) && related(s, b, a)), "{a} <-> {b}");
            for &c in &names {
                if related(s, a, b) && related(s, b, c) {
                    prop_assert!(related(s, a, c), "{a} -> {b} -> {c} but not {a} -> {c}");
                }
            }
        }
    }
    Ok(())
}

fn apply(s: &mut RelationStore, op: &Op) -> bool {
    match *op {
        Op::Insert(i) => s.insert(NAMES[i]).is_ok(),
        Op::Remove(i) => s.remove(NAMES[i]).is_ok(),
        Op::Add(i, j) => s.add(NAMES[i], NAMES[j]).is_ok(),
        Op::Del(i, j) => s.del(NAMES[i], NAMES[j]).is_ok(),
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_any_history(ops in prop::collection::vec(op(), 0..60)) {
        let mut s = RelationStore::new();
        for op in &ops {
            let before = s.snapshot();
            let covers: Vec<(String, String)> = s
                .cover_edges()
                .into_iter()
                .map(|(a, b)| (a.to_owned(), b.to_owned()))
                .collect();
            let ok = apply(&mut s, op);
            if !ok {
                prop_assert_eq!(&before, &s.snapshot(), "failed {:?} mutated the store", op);
            }
            if let Op::Del(i, j) = *op {
                let is_cover = covers.contains(&(NAMES[i].to_owned(), NAMES[j].to_owned()));
                prop_assert_eq!(ok, is_cover);
            }
            check_invariants(&s)?;
        }
    }

    /// Without deletions the stored relation is exactly the reachability
    /// relation of the accepted edges.
    #[test]
    fn insertion_matches_full_closure(pairs in prop::collection::vec((0..NAMES.len(), 0..NAMES.len()), 0..30)) {
        let mut s = full_store();
        let mut g: DiGraph<&str, ()> = DiGraph::new();
        let nodes: HashMap<&str, _> = NAMES.iter().map(|&n| (n, g.add_node(n))).collect();
        for (i, j) in pairs {
            if s.add(NAMES[i], NAMES[j]).is_ok() {
                g.add_edge(nodes[NAMES[i]], nodes[NAMES[j]], ());
            }
        }
        for a in NAMES {
            for b in NAMES {
                if a != b {
                    let reachable = has_path_connecting(&g, nodes[a], nodes[b], None);
                    prop_assert_eq!(related(&s, a, b), reachable, "{} -> {}", a, b);
                }
            }
        }
        prop_assert!(s.linear_extension().is_ok());
    }

    #[test]
    fn insert_remove_round_trip(pairs in prop::collection::vec((0..5usize, 0..5usize), 0..15)) {
        let mut s = RelationStore::new();
        for n in &NAMES[..5] {
            s.insert(n).unwrap();
        }
        for (i, j) in pairs {
            let _ = s.add(NAMES[i], NAMES[j]);
        }
        let before = s.snapshot();
        s.insert("f").unwrap();
        s.add("a", "f").ok();
        s.add("f", "e").ok();
        s.remove("f").unwrap();
        prop_assert_eq!(s.len(), 5);
        for n in &NAMES[..5] {
            prop_assert!(!s.successors(n).unwrap().contains(&"f"));
            prop_assert!(!s.predecessors(n).unwrap().contains(&"f"));
        }
        // Pairs added through "f" stay: only "f" itself is gone.
        for e in &before.elements {
            for succ in &e.successors {
                prop_assert!(related(&s, &e.name, succ));
            }
        }
    }
}
