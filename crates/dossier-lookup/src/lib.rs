//! Lookup clients and run orchestration for the dossier gatherer.
//!
//! Each module wraps one upstream source (DNS, WHOIS, a geo-IP API,
//! scraped search-result pages, the target site itself). The
//! [`InfoGatherer`] chains them with per-step fallback policy and
//! persists the aggregate document through the [`ReportStore`].

mod error;

pub mod cache;
pub mod dns;
pub mod fetch;
pub mod gatherer;
pub mod geo;
pub mod maps;
pub mod robots;
pub mod search;
pub mod tech;
pub mod whois;

pub use cache::ReportStore;
pub use dns::{HostResolver, SystemResolver};
pub use error::{LookupError, LookupResult};
pub use fetch::{FetchRequest, FetchResponse, Fetcher};
pub use gatherer::{InfoGatherer, InfoGathererBuilder};
pub use whois::{parse_whois, WhoisClient, WhoisProvider};
