#![warn(clippy::uninlined_format_args)]

pub mod editor;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod records;
pub mod snapshot;
pub mod usage;

pub use editor::GroupEditor;
pub use error::{GroupEditError, NormalizeError, SnapshotError, StoreError};
pub use normalize::{normalize_group, normalize_group_with_limits, parse_amount};
pub use ports::{GroupStore, InMemoryStore};
pub use records::{RawExpense, RawGroup, RawMember};
pub use snapshot::{export_groups, import_groups, import_groups_with_limits, SNAPSHOT_VERSION};
pub use usage::{usage_report, UsageReport};
