//! The `Road` unit: one directed link with a free-flow delay and an outflow
//! capacity.

use std::sync::Arc;

use pdes_core::{LinkId, SimTime, UnitId, VehicleId};
use pdes_network::Network;
use pdes_queue::Message;
use pdes_unit::{Context, SimUnit, UnitError, UnitResult};

use crate::Population;

/// Message payload of the traffic model.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrafficEvent {
    /// `vehicle` enters the receiving road, which is `route[leg]`.
    Enter { vehicle: VehicleId, leg: u32 },
}

/// A vehicle leaving the last link of its route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrival {
    pub vehicle: VehicleId,
    pub link:    LinkId,
    pub time:    SimTime,
}

/// One directed link as a simulation unit.
pub struct Road {
    link:           LinkId,
    free_travel:    f64,
    headway:        f64,
    next_free_exit: SimTime,
    population:     Arc<Population>,
    /// Vehicles whose route starts here, seeded in `initialize`.
    departures:     Vec<VehicleId>,
    arrivals:       Vec<Arrival>,
    entered:        u64,
    /// Total seconds vehicles spent waiting for outflow capacity.
    queue_delay:    f64,
}

impl Road {
    pub fn new(
        network:    &Network,
        link:       LinkId,
        population: Arc<Population>,
        departures: Vec<VehicleId>,
    ) -> Self {
        Self {
            link,
            free_travel:    network.free_travel_secs(link),
            headway:        network.headway_secs(link),
            next_free_exit: SimTime(f64::NEG_INFINITY),
            population,
            departures,
            arrivals:       Vec::new(),
            entered:        0,
            queue_delay:    0.0,
        }
    }

    pub fn link(&self) -> LinkId {
        self.link
    }

    /// Vehicles that finished their trip on this road, in exit order.
    pub fn arrivals(&self) -> &[Arrival] {
        &self.arrivals
    }

    /// Vehicles that entered this road.
    pub fn entered(&self) -> u64 {
        self.entered
    }

    pub fn queue_delay(&self) -> f64 {
        self.queue_delay
    }

    fn model_error(&self, what: String) -> UnitError {
        UnitError::Model(format!("road {}: {what}", self.link))
    }
}

impl SimUnit for Road {
    type Payload = TrafficEvent;

    fn lookahead(&self) -> SimTime {
        SimTime(self.free_travel)
    }

    fn initialize(&mut self, ctx: &mut Context<'_, TrafficEvent>) -> UnitResult<()> {
        for &vehicle in &self.departures {
            let departure = self
                .population
                .get(vehicle)
                .map(|v| v.departure)
                .ok_or_else(|| self.model_error(format!("unknown vehicle {vehicle}")))?;
            ctx.schedule_self(departure, TrafficEvent::Enter { vehicle, leg: 0 })?;
        }
        Ok(())
    }

    fn process(
        &mut self,
        message: &Message<TrafficEvent>,
        ctx:     &mut Context<'_, TrafficEvent>,
    ) -> UnitResult<()> {
        let TrafficEvent::Enter { vehicle, leg } = *message.payload();
        let population = Arc::clone(&self.population);
        let route = &population
            .get(vehicle)
            .ok_or_else(|| self.model_error(format!("unknown vehicle {vehicle}")))?
            .route;
        if route.get(leg as usize) != Some(&self.link) {
            return Err(self.model_error(format!("{vehicle} is not routed here at leg {leg}")));
        }

        let now = message.time();
        let unhindered = now + self.free_travel;
        let exit = unhindered.max(self.next_free_exit);
        self.queue_delay += exit - unhindered;
        self.next_free_exit = exit + self.headway;
        self.entered += 1;

        match route.get(leg as usize + 1) {
            Some(next) => {
                ctx.schedule(UnitId(next.0), exit, TrafficEvent::Enter { vehicle, leg: leg + 1 })?;
            }
            None => self.arrivals.push(Arrival { vehicle, link: self.link, time: exit }),
        }
        Ok(())
    }
}
