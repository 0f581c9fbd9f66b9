//! Vehicles, their routes, and seeded population generation.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use tracing::debug;

use pdes_core::{LinkId, SimTime, VehicleId};
use pdes_network::{Network, NetworkError, Router};

use crate::{TrafficError, TrafficResult};

/// Give up on one vehicle after this many disconnected origin/destination
/// draws.
const MAX_ROUTE_ATTEMPTS: usize = 100;

/// One trip: enter `route[0]` at `departure`, leave the last link, done.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    pub id:        VehicleId,
    pub route:     Vec<LinkId>,
    pub departure: SimTime,
}

/// All vehicles of a scenario, indexed by `VehicleId`.
///
/// Read-only once built.  Every road holds it behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct Population {
    vehicles: Vec<Vehicle>,
}

impl Population {
    /// Build from `(route, departure)` pairs; ids are assigned in order.
    pub fn from_trips(trips: impl IntoIterator<Item = (Vec<LinkId>, SimTime)>) -> TrafficResult<Self> {
        let vehicles = trips
            .into_iter()
            .enumerate()
            .map(|(i, (route, departure))| {
                let id = VehicleId(i as u32);
                if route.is_empty() {
                    return Err(TrafficError::EmptyRoute { vehicle: id });
                }
                Ok(Vehicle { id, route, departure })
            })
            .collect::<TrafficResult<Vec<_>>>()?;
        Ok(Self { vehicles })
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Vehicles grouped by the first link of their route, in id order.
    pub fn departures_by_link(&self) -> FxHashMap<LinkId, Vec<VehicleId>> {
        let mut map: FxHashMap<LinkId, Vec<VehicleId>> = FxHashMap::default();
        for v in &self.vehicles {
            map.entry(v.route[0]).or_default().push(v.id);
        }
        map
    }
}

/// Half-open interval `[start, end)` of departure times.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DepartureWindow {
    pub start: SimTime,
    pub end:   SimTime,
}

/// Draw `count` vehicles with random origin and destination links and a
/// uniform departure time in `window`.
///
/// Deterministic for a given `seed`.  Disconnected pairs are redrawn.
pub fn generate_population<R: Router>(
    network: &Network,
    router:  &R,
    count:   usize,
    seed:    u64,
    window:  DepartureWindow,
) -> TrafficResult<Population> {
    let (start, end) = (window.start, window.end);
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(TrafficError::InvalidWindow { start: start.0, end: end.0 });
    }
    let links = network.link_count() as u32;
    if links == 0 {
        return Err(TrafficError::EmptyNetwork);
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut trips = Vec::with_capacity(count);
    let mut redraws = 0;

    for _ in 0..count {
        let route = draw_route(network, router, &mut rng, links, &mut redraws)?;
        let departure = if end > start { SimTime(rng.gen_range(start.0..end.0)) } else { start };
        trips.push((route, departure));
    }

    debug!(vehicles = count, redraws, "population generated");
    Population::from_trips(trips)
}

fn draw_route<R: Router>(
    network: &Network,
    router:  &R,
    rng:     &mut SmallRng,
    links:   u32,
    redraws: &mut usize,
) -> TrafficResult<Vec<LinkId>> {
    for _ in 0..MAX_ROUTE_ATTEMPTS {
        let origin = LinkId(rng.gen_range(0..links));
        let destination = LinkId(rng.gen_range(0..links));
        match router.route_links(network, origin, destination) {
            Ok(route) => return Ok(route.links),
            Err(NetworkError::NoRoute { .. }) => *redraws += 1,
            Err(e) => return Err(e.into()),
        }
    }
    Err(TrafficError::Unroutable(MAX_ROUTE_ATTEMPTS))
}
