//! End-to-end tests for the query overlay: snap GPS points with the
//! location index, build the overlay and route across it with a plain
//! Dijkstra, the way a routing algorithm consumes the graph contract.

use std::cmp::Reverse;

use priority_queue::PriorityQueue;

use heron_route::{
    BaseGraph, EdgeFilter, EdgeFlags, GeometryMode, Graph, LocationIndex, QueryGraph, Snap,
    SnappedPosition,
};

/// One degree of longitude at the equator with the mean earth radius
const DEG_M: f64 = 111_195.0;

fn straight_edge_graph() -> BaseGraph {
    let mut g = BaseGraph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(0.0, 1.0);
    g.add_edge(a, b, DEG_M, EdgeFlags::both_directions());
    g
}

fn snap_at(index: &LocationIndex, graph: &BaseGraph, lat: f64, lon: f64) -> Snap {
    index
        .find_closest(graph, lat, lon)
        .expect("point must snap onto the test graph")
}

/// Dijkstra over the graph contract, distances in millimeters
fn shortest_path<G: Graph>(graph: &G, from: u32, to: u32) -> Option<(f64, Vec<u32>)> {
    let n = graph.nodes() as usize;
    let mut dist = vec![u64::MAX; n];
    let mut parent: Vec<Option<u32>> = vec![None; n];
    let mut pq: PriorityQueue<u32, Reverse<u64>> = PriorityQueue::new();

    dist[from as usize] = 0;
    pq.push(from, Reverse(0));
    let mut explorer = graph.explorer_with(EdgeFilter::Outgoing);

    while let Some((node, Reverse(d))) = pq.pop() {
        if node == to {
            break;
        }
        if d > dist[node as usize] {
            continue;
        }
        explorer.set_base_node(node);
        while explorer.next() {
            let next = explorer.adj_node() as usize;
            let next_dist = d + (explorer.distance() * 1000.0).round() as u64;
            if next_dist < dist[next] {
                dist[next] = next_dist;
                parent[next] = Some(node);
                pq.push(next as u32, Reverse(next_dist));
            }
        }
    }

    if dist[to as usize] == u64::MAX {
        return None;
    }
    let mut path = vec![to];
    let mut cur = to;
    while let Some(p) = parent[cur as usize] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    Some((dist[to as usize] as f64 / 1000.0, path))
}

#[test]
fn test_single_snap_scenario() {
    let g = straight_edge_graph();
    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![snap_at(&index, &g, 0.0, 0.5)];
    assert_eq!(snaps[0].position, SnappedPosition::Edge);

    let qg = QueryGraph::lookup(&g, &mut snaps);
    assert_eq!(qg.nodes(), 3);
    assert_eq!(qg.edges(), 5);
    assert_eq!(snaps[0].closest_node, Some(2));

    let na = qg.node_access();
    assert!((na.lat(2) - 0.0).abs() < 1e-6);
    assert!((na.lon(2) - 0.5).abs() < 1e-6);

    // explorer at the virtual node: exactly the two half edges
    let mut ex = qg.explorer();
    ex.set_base_node(2);
    let mut found = Vec::new();
    while ex.next() {
        found.push((ex.adj_node(), ex.distance()));
    }
    found.sort_by_key(|&(n, _)| n);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].0, 0);
    assert_eq!(found[1].0, 1);
    assert!((found[0].1 - DEG_M / 2.0).abs() < 100.0);
    assert!((found[1].1 - DEG_M / 2.0).abs() < 100.0);

    // towers see the virtual half edge instead of the split base edge
    for tower in [0u32, 1] {
        let mut ex = qg.explorer();
        ex.set_base_node(tower);
        while ex.next() {
            assert_ne!(ex.edge(), 0, "split base edge leaked at tower {tower}");
            assert_eq!(ex.adj_node(), 2);
        }
    }
}

#[test]
fn test_two_snaps_on_one_edge_chain() {
    let g = straight_edge_graph();
    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![
        snap_at(&index, &g, 0.0, 0.25),
        snap_at(&index, &g, 0.0, 0.75),
    ];
    let qg = QueryGraph::lookup(&g, &mut snaps);
    assert_eq!(qg.nodes(), 4);
    assert_eq!(qg.edges(), 9);

    // chain A - 2 - 3 - B, summing to the full edge geometry within 1 cm
    let full_len = g
        .edge_state(0, None)
        .unwrap()
        .fetch_way_geometry(GeometryMode::All)
        .distance_m();
    let (d, path) = shortest_path(&qg, 0, 1).unwrap();
    assert_eq!(path, vec![0, 2, 3, 1]);
    assert!((d - full_len).abs() < 0.01, "distance conservation broke: {d}");

    let (d1, path1) = shortest_path(&qg, 0, 2).unwrap();
    assert_eq!(path1, vec![0, 2]);
    assert!((d1 - DEG_M / 4.0).abs() < 100.0);

    let (d2, _) = shortest_path(&qg, 2, 3).unwrap();
    assert!((d2 - DEG_M / 2.0).abs() < 100.0);

    // explorer at A yields neither the base edge nor a shortcut to 3
    let mut ex = qg.explorer();
    ex.set_base_node(0);
    let mut adj = Vec::new();
    while ex.next() {
        adj.push(ex.adj_node());
    }
    assert_eq!(adj, vec![2]);
}

#[test]
fn test_reverse_pairing_invariant() {
    let g = straight_edge_graph();
    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![
        snap_at(&index, &g, 0.0, 0.25),
        snap_at(&index, &g, 0.0, 0.75),
    ];
    let qg = QueryGraph::lookup(&g, &mut snaps);

    let main_edges = g.edges();
    for edge in main_edges..qg.edges() {
        let state = qg.edge_state(edge, None).unwrap();
        let pair_id = main_edges + ((edge - main_edges) ^ 1);
        let pair = qg.edge_state(pair_id, None).unwrap();
        assert_eq!(state.base_node(), pair.adj_node());
        assert_eq!(state.adj_node(), pair.base_node());
        assert_eq!(state.distance(), pair.distance());
        assert_eq!(state.flags(), pair.flags().reversed());
        assert_eq!(
            state.fetch_way_geometry(GeometryMode::All),
            pair.fetch_way_geometry(GeometryMode::All).reversed()
        );
    }
}

#[test]
fn test_distance_conservation_with_pillar_geometry() {
    let mut g = BaseGraph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(0.5, 1.0);
    let e = g.add_edge(a, b, 0.0, EdgeFlags::both_directions());
    let mut pillars = heron_route::PointList::new();
    pillars.push(0.4, 0.3);
    pillars.push(0.1, 0.6);
    g.set_way_geometry(e, pillars);
    let full_len = g
        .edge_state(e, None)
        .unwrap()
        .fetch_way_geometry(GeometryMode::All)
        .distance_m();

    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![
        snap_at(&index, &g, 0.3, 0.2),
        snap_at(&index, &g, 0.2, 0.5),
    ];
    for s in &snaps {
        assert_eq!(s.closest_edge, e);
        assert_ne!(s.position, SnappedPosition::Tower);
    }

    let qg = QueryGraph::lookup(&g, &mut snaps);
    let (d, path) = shortest_path(&qg, a, b).unwrap();
    assert_eq!(path.len(), 4, "route must thread both virtual nodes: {path:?}");
    assert!(
        (d - full_len).abs() < 0.01,
        "chain length {d} vs full geometry {full_len}"
    );
}

#[test]
fn test_routing_around_a_square() {
    let mut g = BaseGraph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(0.0, 1.0);
    let c = g.add_node(1.0, 1.0);
    let d = g.add_node(1.0, 0.0);
    g.add_edge(a, b, DEG_M, EdgeFlags::both_directions());
    g.add_edge(b, c, DEG_M, EdgeFlags::both_directions());
    g.add_edge(c, d, DEG_M, EdgeFlags::both_directions());
    g.add_edge(d, a, DEG_M, EdgeFlags::both_directions());

    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![
        snap_at(&index, &g, 0.0, 0.5), // on AB
        snap_at(&index, &g, 1.0, 0.5), // on CD
    ];
    assert_eq!(snaps[0].closest_edge, 0);
    assert_eq!(snaps[1].closest_edge, 2);

    let qg = QueryGraph::lookup(&g, &mut snaps);
    let from = snaps[0].closest_node.unwrap();
    let to = snaps[1].closest_node.unwrap();
    let (dist, path) = shortest_path(&qg, from, to).unwrap();

    // both ways around are symmetric: half edge + side + half edge
    assert_eq!(path.len(), 4);
    assert!(path.contains(&from) && path.contains(&to));
    assert!(
        (dist - 2.0 * DEG_M).abs() < 500.0,
        "unexpected route length {dist}"
    );
}

#[test]
fn test_tower_snap_introduces_no_virtual_node() {
    let g = straight_edge_graph();
    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![snap_at(&index, &g, 0.0, 0.0), snap_at(&index, &g, 0.0, 0.6)];
    assert_eq!(snaps[0].position, SnappedPosition::Tower);
    assert_eq!(snaps[0].closest_node, Some(0));

    let qg = QueryGraph::lookup(&g, &mut snaps);
    assert_eq!(qg.nodes(), 3, "only the non-tower snap adds a node");
    assert_eq!(snaps[0].closest_node, Some(0));
    assert_eq!(snaps[1].closest_node, Some(2));

    let (d, path) = shortest_path(&qg, 0, 2).unwrap();
    assert_eq!(path, vec![0, 2]);
    assert!((d - 0.6 * DEG_M).abs() < 100.0);
}

#[test]
fn test_oneway_split_keeps_direction() {
    let mut g = BaseGraph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(0.0, 1.0);
    g.add_edge(a, b, DEG_M, EdgeFlags::one_way());

    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![snap_at(&index, &g, 0.0, 0.5)];
    let qg = QueryGraph::lookup(&g, &mut snaps);

    // forward routing crosses the virtual node, backward does not
    let full_len = g
        .edge_state(0, None)
        .unwrap()
        .fetch_way_geometry(GeometryMode::All)
        .distance_m();
    let (d, path) = shortest_path(&qg, a, b).unwrap();
    assert_eq!(path, vec![0, 2, 1]);
    assert!((d - full_len).abs() < 0.01);
    assert!(shortest_path(&qg, b, a).is_none());
}

#[test]
fn test_heading_marks_only_the_back_facing_pair() {
    let g = straight_edge_graph();
    let index = LocationIndex::build(&g).unwrap();
    let mut snaps = vec![snap_at(&index, &g, 0.0, 0.5)];
    let qg = QueryGraph::lookup(&g, &mut snaps);
    let virt = snaps[0].closest_node.unwrap();

    assert!(qg.enforce_heading(virt, 90.0, false).unwrap());
    let mut ex = qg.explorer();
    ex.set_base_node(virt);
    while ex.next() {
        let westbound = ex.adj_node() == 0;
        assert_eq!(
            ex.is_unfavored(),
            westbound,
            "only the westbound edge departs against the favored heading"
        );
    }

    qg.clear_unfavored_status();
    let mut ex = qg.explorer();
    ex.set_base_node(virt);
    while ex.next() {
        assert!(!ex.is_unfavored());
    }
}
