// netinv-api: Async REST clients for the controllers that contribute inventory
//
// `apic` talks to a fabric controller (token cookie auth), `sdwan` to a WAN
// overlay controller (form login + XSRF header). Both share `TransportConfig`.

pub mod apic;
pub mod error;
pub mod sdwan;
pub mod transport;

pub use apic::{ApicClient, FabricNode, NodeFirmware};
pub use error::Error;
pub use sdwan::{SdwanClient, SdwanDevice};
pub use transport::{TlsMode, TransportConfig, controller_url};
