//! Domain model types for capacitated arc routing.
//!
//! Provides the instance record (required nodes, edges, arcs, and network
//! connections), services under a single global numbering, placements and
//! routes, and a solution that owns the state of every service.

mod instance;
mod route;
mod service;
mod solution;

pub use instance::{
    Connection, ConnectionKind, Instance, InstanceBuilder, RequiredLink, RequiredNode,
};
pub use route::{Placement, Route};
pub use service::{Service, ServiceKind};
pub use solution::{ServiceState, Solution, Violation, ViolationType};
