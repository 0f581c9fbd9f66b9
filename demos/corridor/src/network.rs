//! Synthetic grid network used when no CSV network is configured.

use pdes_core::NodeId;
use pdes_network::{Network, NetworkBuilder, NetworkResult, Point};

/// Spacing between neighbouring intersections, metres.
const BLOCK_M: f64 = 200.0;

/// Build an `n × n` grid of two-way roads.
///
/// Every third east–west street is an arterial (higher speed and capacity);
/// the rest are local streets.
pub fn build_grid(n: usize) -> NetworkResult<Network> {
    let mut b = NetworkBuilder::with_capacity(n * n, 4 * n * n);
    let nodes: Vec<NodeId> = (0..n * n)
        .map(|k| b.add_node(Point::new((k % n) as f64 * BLOCK_M, (k / n) as f64 * BLOCK_M)))
        .collect();

    for row in 0..n {
        let arterial = row % 3 == 0;
        let (speed, capacity) = if arterial { (16.7, 1_800.0) } else { (11.1, 600.0) };
        for col in 0..n {
            let here = nodes[row * n + col];
            if col + 1 < n {
                b.add_road(here, nodes[row * n + col + 1], BLOCK_M, speed, capacity);
            }
            if row + 1 < n {
                b.add_road(here, nodes[(row + 1) * n + col], BLOCK_M, 11.1, 600.0);
            }
        }
    }
    b.build()
}
