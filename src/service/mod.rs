pub mod lookup;
pub mod upsert;

pub use lookup::LookupService;
pub use upsert::UpsertService;
