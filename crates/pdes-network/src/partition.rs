//! Link-to-worker assignment.
//!
//! Both partitioners return one `WorkerId` per link, indexed by `LinkId`,
//! ready to pass to `Scheduler::register`.  Geometric strips keep most
//! link-to-link messages on one worker; round-robin balances counts only.

use pdes_core::WorkerId;

use crate::{Network, NetworkError, NetworkResult};

/// Split links into `workers` vertical strips of (nearly) equal link count,
/// ordered by the x coordinate of each link's upstream node.
///
/// Ties on x break by `LinkId`, so the result is deterministic.  With two
/// workers this is the classic split at the median x coordinate.
pub fn partition_by_x(network: &Network, workers: usize) -> NetworkResult<Vec<WorkerId>> {
    check_workers(workers)?;
    let n = network.link_count();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let xa = network.node_pos[network.link_from[a].index()].x;
        let xb = network.node_pos[network.link_from[b].index()].x;
        xa.total_cmp(&xb).then(a.cmp(&b))
    });

    let mut assignment = vec![WorkerId(0); n];
    for (rank, link) in order.into_iter().enumerate() {
        // rank * workers / n spreads the remainder over the first strips.
        assignment[link] = WorkerId((rank * workers / n.max(1)) as u16);
    }
    Ok(assignment)
}

/// Link `i` goes to worker `i % workers`.
pub fn partition_round_robin(link_count: usize, workers: usize) -> NetworkResult<Vec<WorkerId>> {
    check_workers(workers)?;
    Ok((0..link_count).map(|i| WorkerId((i % workers) as u16)).collect())
}

fn check_workers(workers: usize) -> NetworkResult<()> {
    if workers == 0 || workers > u16::MAX as usize {
        return Err(NetworkError::InvalidWorkers(workers));
    }
    Ok(())
}
