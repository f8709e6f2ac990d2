// In-memory data layer: the daily record model, the collection that owns it,
// and the value objects queries return.

pub mod models;
pub mod serialize_local_time;
pub mod summaries;
pub mod year_collection;

pub use models::*;
pub use summaries::*;
pub use year_collection::{DatedRecord, YearCollection, YearScope};
