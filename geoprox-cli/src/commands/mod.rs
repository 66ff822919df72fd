//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`ask`] - Search described in plain language
//! - [`config`] - Configuration management (path, show, init)
//! - [`layers`] - Feature types offered by a server
//! - [`search`] - Distance search around a point
//! - [`servers`] - Configured WFS servers

pub mod ask;
pub mod config;
pub mod layers;
pub mod output;
pub mod search;
pub mod servers;
