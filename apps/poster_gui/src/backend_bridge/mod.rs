//! Bridge between the UI thread and the backend worker that talks to the poster service.

pub mod commands;
pub mod runtime;
