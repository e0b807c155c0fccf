//! Database access layer.
//!
//! Thin repositories over `sqlx`; all queries are runtime-checked so the
//! workspace builds without a live database.

pub mod videos;

pub use videos::VideoRepository;
