//! Wiring a network and a population into a scheduler.

use std::sync::Arc;

use tracing::info;

use pdes_core::WorkerId;
use pdes_network::Network;
use pdes_sched::Scheduler;

use crate::{Arrival, Population, Road, TrafficError, TrafficResult};

/// Register one [`Road`] per link, in `LinkId` order, on the worker given
/// by `assignment[link]`.
///
/// The scheduler must not hold other units: road messages address their
/// next link as `UnitId(link)`.
pub fn register_roads(
    sched:      &mut Scheduler<Road>,
    network:    &Network,
    population: Arc<Population>,
    assignment: &[WorkerId],
) -> TrafficResult<()> {
    if assignment.len() != network.link_count() {
        return Err(TrafficError::Assignment { got: assignment.len(), expected: network.link_count() });
    }
    for v in population.iter() {
        for &link in &v.route {
            network.check_link(link)?;
        }
    }

    let mut departures = population.departures_by_link();
    for link in network.links() {
        let road = Road::new(
            network,
            link,
            Arc::clone(&population),
            departures.remove(&link).unwrap_or_default(),
        );
        let id = sched.register(road, assignment[link.index()])?;
        if id.0 != link.0 {
            return Err(TrafficError::UnitMismatch { link });
        }
    }

    info!(
        links    = network.link_count(),
        vehicles = population.len(),
        workers  = sched.config().num_workers,
        "roads registered"
    );
    Ok(())
}

/// Every arrival recorded by the roads, ordered by vehicle.
pub fn collect_arrivals(sched: &Scheduler<Road>) -> Vec<Arrival> {
    let mut arrivals: Vec<Arrival> = sched
        .units()
        .flat_map(|(_, road)| road.arrivals().iter().copied())
        .collect();
    arrivals.sort_by_key(|a| a.vehicle);
    arrivals
}
