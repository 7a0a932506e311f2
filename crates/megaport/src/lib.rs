//! Megaport Rust SDK
//!
//! An async client for the Megaport network provisioning API: ports, MCRs,
//! MVEs, VXCs, locations, service keys, partner ports and company users.
//!
//! # Example
//!
//! ```rust,no_run
//! use megaport::{BuyPortRequest, Client, ClientConfig, Credentials, Environment, WaitOptions};
//!
//! #[tokio::main]
//! async fn main() -> megaport::Result<()> {
//!     let client = Client::with_config(
//!         ClientConfig::new(Environment::Staging)
//!             .with_credentials(Credentials::access_key("access", "secret")),
//!     )?;
//!
//!     let sydney = client.locations().get_location_by_name("Equinix SY1").await?;
//!
//!     let uids = client
//!         .ports()
//!         .buy_port(BuyPortRequest {
//!             name: "sydney-edge".to_string(),
//!             term: 12,
//!             port_speed: 10000,
//!             location_id: sydney.id,
//!             market: sydney.market.clone(),
//!             wait: WaitOptions::for_provision(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     println!("ordered {:?}", uids);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod services;
pub mod types;
pub mod wait;

pub use auth::{Credentials, TokenProvider};
pub use client::Client;
pub use config::{ClientConfig, Environment};
pub use error::{Error, Result};
pub use services::location::{Country, Location, LocationV3};
pub use services::mcr::{BuyMcrRequest, Mcr, ModifyMcrRequest, PrefixFilterList};
pub use services::mve::{BuyMveRequest, ModifyMveRequest, Mve, VendorConfig};
pub use services::partner::PartnerMegaport;
pub use services::port::{BuyPortRequest, ModifyPortRequest, Port};
pub use services::product::ModifyProductRequest;
pub use services::service_key::{CreateServiceKeyRequest, ServiceKey, UpdateServiceKeyRequest};
pub use services::user::{CreateUserRequest, UpdateUserRequest, User};
pub use services::vxc::{BuyVxcRequest, PartnerConfig, UpdateVxcRequest, Vxc};
pub use types::{ApiResponse, OrderConfirmation, ResourceTag};
pub use wait::WaitOptions;

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
