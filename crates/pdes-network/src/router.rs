//! Routing trait and default Dijkstra implementation.
//!
//! Costs are free-flow travel times.  The search keys on whole milliseconds
//! (`u64`) so heap order is total and ties break on `NodeId`; the reported
//! total is the exact `f64` sum of the chosen links.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use pdes_core::{LinkId, NodeId};

use crate::{Network, NetworkError, NetworkResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of links and the total free-flow travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub links: Vec<LinkId>,
    pub free_travel_secs: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.links.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.  Must be `Send + Sync` so population
/// generation can share one across threads.
pub trait Router: Send + Sync {
    /// Compute a node-to-node route.  `from == to` yields an empty route.
    fn route(&self, network: &Network, from: NodeId, to: NodeId) -> NetworkResult<Route>;

    /// Route that starts on link `first` and ends on link `last`, both
    /// included.
    fn route_links(&self, network: &Network, first: LinkId, last: LinkId) -> NetworkResult<Route> {
        network.check_link(first)?;
        network.check_link(last)?;
        if first == last {
            return Ok(Route { links: vec![first], free_travel_secs: network.free_travel_secs(first) });
        }

        let inner = self.route(
            network,
            network.link_to[first.index()],
            network.link_from[last.index()],
        )?;
        let mut links = Vec::with_capacity(inner.links.len() + 2);
        links.push(first);
        links.extend(inner.links);
        links.push(last);
        let free_travel_secs = links.iter().map(|&l| network.free_travel_secs(l)).sum();
        Ok(Route { links, free_travel_secs })
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &Network, from: NodeId, to: NodeId) -> NetworkResult<Route> {
        network.check_node(from)?;
        network.check_node(to)?;
        dijkstra(network, from, to)
    }
}

#[inline]
fn link_cost_ms(network: &Network, link: LinkId) -> u64 {
    (network.free_travel_secs(link) * 1000.0).round() as u64
}

fn dijkstra(network: &Network, from: NodeId, to: NodeId) -> NetworkResult<Route> {
    if from == to {
        return Ok(Route { links: vec![], free_travel_secs: 0.0 });
    }

    let n = network.node_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_link = vec![LinkId::INVALID; n];
    dist[from.index()] = 0;

    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_link, to));
        }
        if cost > dist[node.index()] {
            continue;
        }

        for link in network.out_links(node) {
            let next = network.link_to[link.index()];
            let new_cost = cost.saturating_add(link_cost_ms(network, link));
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_link[next.index()] = link;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(network: &Network, prev_link: &[LinkId], to: NodeId) -> Route {
    let mut links = Vec::new();
    let mut cur = to;
    loop {
        let l = prev_link[cur.index()];
        if l == LinkId::INVALID {
            break;
        }
        links.push(l);
        cur = network.link_from[l.index()];
    }
    links.reverse();
    let free_travel_secs = links.iter().map(|&l| network.free_travel_secs(l)).sum();
    Route { links, free_travel_secs }
}
