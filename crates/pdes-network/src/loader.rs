//! CSV network loader.
//!
//! # CSV format
//!
//! Two files.  Node ids are arbitrary integers; they are remapped to dense
//! `NodeId`s in file order.
//!
//! ```csv
//! id,x,y
//! 100,0.0,0.0
//! 101,500.0,0.0
//! ```
//!
//! ```csv
//! from,to,length_m,freespeed_mps,capacity_veh_per_hour
//! 100,101,500.0,13.89,1800
//! 101,100,500.0,13.89,1800
//! ```
//!
//! Links are directed.  Attribute checks are the builder's (see
//! [`NetworkBuilder::build`]).

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use pdes_core::NodeId;

use crate::{Network, NetworkBuilder, NetworkError, NetworkResult, Point};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id: u64,
    x:  f64,
    y:  f64,
}

#[derive(Deserialize)]
struct LinkRecord {
    from:                  u64,
    to:                    u64,
    length_m:              f64,
    freespeed_mps:         f64,
    capacity_veh_per_hour: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Network`] from a node file and a link file.
pub fn load_network_csv(nodes: &Path, links: &Path) -> NetworkResult<Network> {
    let nodes = std::fs::File::open(nodes)?;
    let links = std::fs::File::open(links)?;
    load_network_reader(nodes, links)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_reader<N: Read, L: Read>(nodes: N, links: L) -> NetworkResult<Network> {
    let mut builder = NetworkBuilder::new();
    let mut ids: FxHashMap<u64, NodeId> = FxHashMap::default();

    for result in csv::Reader::from_reader(nodes).deserialize::<NodeRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        let id = builder.add_node(Point::new(row.x, row.y));
        if ids.insert(row.id, id).is_some() {
            return Err(NetworkError::Parse(format!("duplicate node id {}", row.id)));
        }
    }

    let lookup = |row: usize, raw: u64| {
        ids.get(&raw).copied().ok_or(NetworkError::UnknownNode { row, node: raw })
    };

    for (row, result) in csv::Reader::from_reader(links).deserialize::<LinkRecord>().enumerate() {
        let rec = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        builder.add_link(
            lookup(row, rec.from)?,
            lookup(row, rec.to)?,
            rec.length_m,
            rec.freespeed_mps,
            rec.capacity_veh_per_hour,
        );
    }

    builder.build()
}
