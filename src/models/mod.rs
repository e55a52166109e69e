pub mod alert;
pub mod event;
pub mod listing;
pub mod metrics;
pub mod saved_search;

pub use alert::{Alert, AlertPayload, Delivery};
pub use event::ValuationEvent;
pub use listing::ListingSnapshot;
pub use metrics::UwMetrics;
pub use saved_search::{ChannelKind, NotifyPrefs, SavedSearch, SearchFilter, Thresholds};
