pub mod collector;
pub mod error;
pub mod models;
pub mod session;
pub mod surface;

pub use collector::{CancelToken, CollectOptions, CollectOutcome, ScrollSession, collect_rows};
pub use error::{CollectError, HostError};
pub use models::{CollectStatus, ContentRequest, ContentResponse, ProgressEvent, TableSummary};
pub use session::{CollectionHandle, ContentSession};
pub use surface::{NodeId, Overflow, ScrollMetrics, ScrollSurface, ScrollTarget, find_scroll_target};
