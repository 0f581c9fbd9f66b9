//! Link network representation and builder.
//!
//! # Data layout
//!
//! Outgoing links are stored in **Compressed Sparse Row (CSR)** order.  Given
//! a `NodeId n`, its outgoing links occupy the `LinkId` range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! All link arrays are sorted by source node (stable, so links of the same
//! node keep insertion order) and indexed by `LinkId`.  A `LinkId` is also
//! the `UnitId` of the link's road unit in the traffic model.

use pdes_core::{LinkId, NodeId};

use crate::{NetworkError, NetworkResult};

/// Planar node position in metres.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed link graph in CSR format.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`NetworkBuilder`].
#[derive(Debug)]
pub struct Network {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing links of node `n` are `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Link data (indexed by LinkId) ─────────────────────────────────────
    pub link_from: Vec<NodeId>,
    pub link_to:   Vec<NodeId>,
    pub link_length_m: Vec<f64>,
    pub link_freespeed_mps: Vec<f64>,
    /// Outflow capacity in vehicles per hour.
    pub link_capacity_vph: Vec<f64>,
}

impl Network {
    /// A network with no nodes or links.
    pub fn empty() -> Self {
        Self {
            node_pos:           Vec::new(),
            node_out_start:     vec![0],
            link_from:          Vec::new(),
            link_to:            Vec::new(),
            link_length_m:      Vec::new(),
            link_freespeed_mps: Vec::new(),
            link_capacity_vph:  Vec::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Every `LinkId` in order.
    pub fn links(&self) -> impl Iterator<Item = LinkId> + '_ {
        (0..self.link_count() as u32).map(LinkId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing links of `node`, as a contiguous id range.
    #[inline]
    pub fn out_links(&self, node: NodeId) -> impl Iterator<Item = LinkId> + '_ {
        let start = self.node_out_start[node.index()];
        let end   = self.node_out_start[node.index() + 1];
        (start..end).map(LinkId)
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    // ── Link attributes ───────────────────────────────────────────────────

    /// Seconds to traverse `link` at free speed.
    #[inline]
    pub fn free_travel_secs(&self, link: LinkId) -> f64 {
        self.link_length_m[link.index()] / self.link_freespeed_mps[link.index()]
    }

    /// Minimum spacing in seconds between two vehicles leaving `link`.
    #[inline]
    pub fn headway_secs(&self, link: LinkId) -> f64 {
        3600.0 / self.link_capacity_vph[link.index()]
    }

    /// Position of `link`'s upstream node.
    #[inline]
    pub fn link_origin(&self, link: LinkId) -> Point {
        self.node_pos[self.link_from[link.index()].index()]
    }

    pub fn check_link(&self, link: LinkId) -> NetworkResult<()> {
        if link.index() < self.link_count() {
            Ok(())
        } else {
            Err(NetworkError::LinkNotFound(link))
        }
    }

    pub fn check_node(&self, node: NodeId) -> NetworkResult<()> {
        if node.index() < self.node_count() {
            Ok(())
        } else {
            Err(NetworkError::NodeNotFound(node))
        }
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use pdes_network::{NetworkBuilder, Point};
///
/// let mut b = NetworkBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0));
/// let c = b.add_node(Point::new(500.0, 0.0));
/// b.add_road(a, c, 500.0, 13.9, 1800.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.link_count(), 2); // both directions
/// ```
pub struct NetworkBuilder {
    nodes:     Vec<Point>,
    raw_links: Vec<RawLink>,
}

struct RawLink {
    from:         NodeId,
    to:           NodeId,
    length_m:     f64,
    freespeed:    f64,
    capacity_vph: f64,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_links: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_links: Vec::with_capacity(links),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** link.  Checked in [`build`](Self::build).
    pub fn add_link(
        &mut self,
        from:         NodeId,
        to:           NodeId,
        length_m:     f64,
        freespeed:    f64,
        capacity_vph: f64,
    ) {
        self.raw_links.push(RawLink { from, to, length_m, freespeed, capacity_vph });
    }

    /// Links in **both directions** with the same attributes.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64, freespeed: f64, capacity_vph: f64) {
        self.add_link(a, b, length_m, freespeed, capacity_vph);
        self.add_link(b, a, length_m, freespeed, capacity_vph);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.raw_links.len() }

    /// Consume the builder and produce a [`Network`].
    ///
    /// Every link must join existing nodes and have a finite, strictly
    /// positive length, speed, and capacity: a link's free travel time is
    /// its unit's lookahead.
    pub fn build(self) -> NetworkResult<Network> {
        let node_count = self.nodes.len();

        for l in &self.raw_links {
            if l.from.index() >= node_count {
                return Err(NetworkError::NodeNotFound(l.from));
            }
            if l.to.index() >= node_count {
                return Err(NetworkError::NodeNotFound(l.to));
            }
            for (name, v) in [("length", l.length_m), ("freespeed", l.freespeed), ("capacity", l.capacity_vph)] {
                if !v.is_finite() || v <= 0.0 {
                    return Err(NetworkError::InvalidLink {
                        from:   l.from,
                        to:     l.to,
                        reason: format!("{name} must be finite and > 0, got {v}"),
                    });
                }
            }
        }

        let mut raw = self.raw_links;
        raw.sort_by_key(|l| l.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for l in &raw {
            node_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        Ok(Network {
            node_pos:           self.nodes,
            node_out_start,
            link_from:          raw.iter().map(|l| l.from).collect(),
            link_to:            raw.iter().map(|l| l.to).collect(),
            link_length_m:      raw.iter().map(|l| l.length_m).collect(),
            link_freespeed_mps: raw.iter().map(|l| l.freespeed).collect(),
            link_capacity_vph:  raw.iter().map(|l| l.capacity_vph).collect(),
        })
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
