//! Data ingestion, canonicalisation and panel alignment

pub mod align;
pub mod builder;
pub mod canonicalize;
pub mod error;
pub mod ingest;
pub mod panel;

pub use align::{common_dates, resolve_dates, union_dates, AlignMode};
pub use builder::{DataSummary, PanelBuild, PanelBuilder};
pub use canonicalize::Canonicalizer;
pub use error::{DataError, DataWarning};
pub use ingest::{read_csv, read_csv_dir, IngestedSource};
pub use panel::{Panel, PanelKey};
