// Résumé core: section extraction, size/format helpers, record construction.
// The extractor and helpers are pure; persistence sits behind `store::ResumeStore`.

pub mod handlers;
pub mod models;
pub mod objects;
pub mod record;
pub mod sections;
pub mod size;
pub mod store;
