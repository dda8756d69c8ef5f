// ── Domain model ──
//
// The OS tag that drives normalization, the two-variant command result, and
// the flat inventory record every source is normalized into.

pub mod command;
pub mod os;
pub mod record;

pub use command::{CommandResult, PayloadKind};
pub use os::DeviceOs;
pub use record::{
    DeviceFacts, InventoryRecord, SENTINEL_ERROR, SENTINEL_NOT_AVAILABLE, SENTINEL_UNKNOWN,
    SENTINEL_UNSUPPORTED,
};
