//! Report document model.

mod report;
mod whois;

pub use report::{Estimate, GeoMaps, ReportDocument};
pub use whois::{WhoisMap, WhoisValue};
