//! Request middleware.

pub mod debug_log;
