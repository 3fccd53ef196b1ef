//! Check-in recording and storage

pub mod record;
pub mod recorder;
pub mod store;

pub use record::{CheckInError, CheckInRecord};
pub use recorder::CheckInRecorder;
pub use store::{CheckInStore, JsonFileStore, MemoryStore, StoreError, StoreResult};
