pub mod sheet_repo;

pub use sheet_repo::SheetRepository;
