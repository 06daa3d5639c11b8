//! Outlet target and commission calculator.
//!
//! [`calc`] holds the pure tiering and aggregation rules; [`session`] is the editable
//! calculator state; [`cli`] and [`server`] are thin surfaces over both.

pub mod calc;
pub mod cli;
pub mod config;
pub mod data;
pub mod format;
pub mod server;
pub mod session;
