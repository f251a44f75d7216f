//! DNS probing for software fingerprinting.
//!
//! - [`catalog`]: the combinatorial space of query option variants and the
//!   subset a trained model needs
//! - [`executor`]: sends one query per probe and turns the response into a
//!   [`Signature`](dnsver_core::Signature)
//! - [`transport`]: the network seam (UDP by default)

#![doc(html_root_url = "https://docs.rs/dnsver-probe/0.1.0")]

pub mod catalog;
mod error;
pub mod executor;
mod extract;
mod query;
pub mod transport;

pub use catalog::{default_dimensions, parse_probe_names, ProbeCatalog};
pub use error::{ProbeError, ProbeResult};
pub use executor::{Executor, Prober, RetryPolicy};
pub use extract::extract_signature;
pub use query::build_query;
pub use transport::{Transport, UdpTransport};
