pub mod category;
pub mod model;
pub mod rows;
pub mod summary;
pub mod validation;

pub use category::SchoolCategory;
pub use model::{ClassEntry, ClassNumber, FormDataMap, SchoolDetails, SchoolRecord, SubmitPayload};
