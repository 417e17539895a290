//! Journal Module - Append-only analysis log
//!
//! One pretty-printed JSON array per UTC calendar day, `events_YYYYMMDD.json`.
//! Appends are read-modify-write, serialized per partition and committed
//! with a temp file + rename so a crash never leaves a half-written array.
//!
//! An unparsable partition is moved aside as
//! `events_YYYYMMDD.json.corrupt-<unix_ts>` before a fresh one is started.

pub mod writer;


pub use writer::{partition_file_name, EventJournal, JournalError};
