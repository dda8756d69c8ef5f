// SD-WAN controller (vManage) client
//
// Form-based session login, XSRF token retrieval, and the device inventory
// listing under `/dataservice`.

pub mod client;
pub mod models;

pub use client::SdwanClient;
pub use models::SdwanDevice;
