//! Roastctl library: coffee roaster control core.
//!
//! Exposes the session core, its ports and adapters for the host binary,
//! integration testing and embedding on a board that supplies its own
//! `embedded-hal` pins.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod events;
pub mod profile;
pub mod runtime;
pub mod sensors;
pub mod session;
pub mod units;
