//! Resolve a QuickConnect ID into the URLs a device can actually be
//! reached on.
//!
//! The directory is asked for the device's topology, every candidate URL
//! that topology implies is ranked by [`AddressType`], and all candidates
//! are probed concurrently. Only URLs that answered and proved the right
//! identity are returned, most preferred first.
//!
//! ```no_run
//! # async fn run() -> quickconnect::Result<()> {
//! use quickconnect::{Client, ClientConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let client = Client::new(ClientConfig::default())?;
//! let urls = client.resolve("my-device", &CancellationToken::new()).await?;
//! println!("best URL: {}", urls[0]);
//! # Ok(())
//! # }
//! ```

pub mod addr_type;
pub mod client;
pub mod directory;
pub mod error;
pub mod identity;
pub mod ping;
pub mod probe;
pub mod record;
pub mod transport;
pub mod urls;

pub use addr_type::{AddressType, Locality, Scheme};
pub use client::{resolve, Client, ClientConfig};
pub use directory::ServerKind;
pub use error::{Error, Result};
pub use probe::{ProbeSummary, DEFAULT_TIMEOUT};
pub use record::{ConnState, Info, Record};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
