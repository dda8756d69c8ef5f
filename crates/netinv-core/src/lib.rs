// netinv-core: Device collection, per-OS normalization, and report assembly.

pub mod assembler;
pub mod controller;
pub mod error;
pub mod executor;
pub mod extract;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use assembler::{Assembler, DEFAULT_COMMAND_TIMEOUT, InventoryReport, RunOptions};
pub use controller::{
    ControllerCredentials, ControllerKind, ControllerTarget, CredentialProvider,
    StaticCredentials, fetch_controller_inventory,
};
pub use error::CoreError;
pub use executor::execute;
pub use extract::{ExtractionStrategy, extract, strategy_for};
pub use model::{CommandResult, DeviceFacts, DeviceOs, InventoryRecord, PayloadKind};
pub use parser::{ParseError, ParserRegistry};
pub use report::{REPORT_HEADER, read_report, report_file_name, write_report};
pub use session::{CaptureSession, DeviceSession, DeviceSpec, Testbed};

// Transport settings callers need to build controller targets.
pub use netinv_api::{TlsMode, TransportConfig};
