//! Per-resource services
//!
//! Each service is a cheap handle around a [`Client`](crate::Client) clone and
//! maps one area of the API to typed calls.

pub mod location;
pub mod mcr;
pub mod mve;
pub mod partner;
pub mod port;
pub mod product;
pub mod service_key;
pub mod user;
pub mod vxc;

pub use location::LocationService;
pub use mcr::McrService;
pub use mve::MveService;
pub use partner::PartnerService;
pub use port::PortService;
pub use product::ProductService;
pub use service_key::ServiceKeyService;
pub use user::UserManagementService;
pub use vxc::VxcService;
