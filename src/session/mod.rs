pub mod dto;
pub mod entry_session;

pub use entry_session::EntrySession;
