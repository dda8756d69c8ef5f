// Fabric controller (APIC) client
//
// Token login via `aaaLogin`, node class queries, and per-node running
// firmware lookups. Every response is wrapped in the `{ totalCount, imdata }`
// envelope.

pub mod client;
pub mod models;

pub use client::ApicClient;
pub use models::{FabricNode, NodeFirmware};
