// Saved-job collection: persistence glue plus the derived metrics shown on the dashboard.
// Searching and scoring are done by the agent; this module only stores and aggregates.

pub mod handlers;
pub mod metrics;
pub mod models;
pub mod store;
