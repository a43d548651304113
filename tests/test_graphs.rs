/*
 * SPDX-FileCopyrightText: 2026 The pagerank-par authors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use pagerank_par::graphs::random::*;
use pagerank_par::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn test_transpose() {
    let g = VecGraph::from_arcs(4, [(0, 1), (0, 2), (1, 2), (3, 2), (2, 0)]);
    let t = transpose_with_degree(&g);
    assert_eq!(t.num_nodes(), 4);
    assert_eq!(t.num_arcs(), 5);
    assert_eq!(t.outdegrees(), &[2, 1, 1, 1]);
    assert_eq!(t.predecessors(0).collect::<Vec<_>>(), vec![(2, 1)]);
    assert_eq!(t.predecessors(1).collect::<Vec<_>>(), vec![(0, 2)]);
    assert_eq!(
        t.predecessors(2).collect::<Vec<_>>(),
        vec![(0, 2), (1, 1), (3, 1)]
    );
    assert_eq!(t.predecessors(3).count(), 0);
    assert_eq!(t.indegree(2), 3);
    assert!(t.dangling_nodes().is_empty());
}

#[test]
fn test_transpose_random() {
    let mut rng = SmallRng::seed_from_u64(0);
    let mut g = VecGraph::empty(100);
    for _ in 0..1000 {
        add_random_arc(&mut g, &mut rng, 100);
    }
    let t = transpose_with_degree(&g);
    assert_eq!(t.num_arcs(), g.num_arcs());
    let mut arcs = vec![];
    for v in 0..t.num_nodes() {
        let preds = t.predecessors(v).collect::<Vec<_>>();
        assert!(preds.windows(2).all(|w| w[0].0 < w[1].0));
        for (u, d) in preds {
            assert_eq!(d, g.outdegree(u));
            arcs.push((u, v));
        }
    }
    arcs.sort();
    let expected = g
        .iter()
        .flat_map(|(u, succ)| succ.iter().map(move |&v| (u, v)))
        .collect::<Vec<_>>();
    assert_eq!(arcs, expected);
}

#[test]
fn test_self_loops() {
    let mut g = VecGraph::from_arcs(4, [(0, 1), (1, 1), (2, 0)]);
    assert_eq!(patch_dead_ends(&mut g), 1);
    assert!(g.has_arc(3, 3));
    assert_eq!(add_self_loops(&mut g, |_, _| true), 2);
    assert!((0..4).all(|node| g.has_arc(node, node)));
    assert_eq!(add_self_loops(&mut g, |_, _| true), 0);
    assert_eq!(g.num_arcs(), 6);
}

#[test]
fn test_add_random_arcs() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut g = VecGraph::empty(5);
    let mut added = 0;
    for _ in 0..50 {
        added += add_random_arc(&mut g, &mut rng, 20) as u64;
    }
    assert_eq!(g.num_nodes(), 20);
    assert_eq!(g.num_arcs(), added);

    for _ in 0..50 {
        add_random_arc_by_degree(&mut g, &mut rng);
    }
    assert!(g.num_arcs() > added);
    // Endpoints chosen by degree always have successors
    assert_eq!(g.num_nodes(), 20);
}

#[test]
fn test_add_random_arc_by_degree_without_arcs() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut g = VecGraph::empty(3);
    assert!(add_random_arc_by_degree(&mut g, &mut rng));
    assert_eq!(g.num_arcs(), 1);
}

#[test]
fn test_remove_random_arcs() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut g = VecGraph::from_arcs(3, [(0, 1), (0, 2), (1, 2)]);
    assert!(!remove_random_arc_from(&mut g, &mut rng, 2));
    assert!(remove_random_arc_from(&mut g, &mut rng, 0));
    assert_eq!(g.outdegree(0), 1);
    assert_eq!(g.num_arcs(), 2);

    while g.num_arcs() > 0 {
        assert!(remove_random_arc_by_degree(&mut g, &mut rng));
    }
    assert!(!remove_random_arc_by_degree(&mut g, &mut rng));
    assert!(!remove_random_arc(&mut g, &mut rng));
    assert!(!remove_random_arc(&mut VecGraph::new(), &mut rng));
}

#[test]
fn test_seeded_mutations_are_reproducible() {
    let run = |seed| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut g = VecGraph::empty(50);
        for _ in 0..200 {
            add_random_arc(&mut g, &mut rng, 50);
        }
        for _ in 0..50 {
            remove_random_arc(&mut g, &mut rng);
        }
        g
    };
    assert_eq!(run(42), run(42));
}
