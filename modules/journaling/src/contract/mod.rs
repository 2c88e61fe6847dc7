pub mod client;
pub mod error;
pub mod model;

pub use client::JournalingApi;
pub use error::JournalingError;
pub use model::{
    JournalEntry, JournalEntryPatch, JournalStats, ListQuery, MoodTrendPoint, NewJournalEntry,
};
