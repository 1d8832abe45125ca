//! # Domain Models
//!
//! Pure types shared by every layer of the client shell: the enumeration
//! taxonomy published to the presentation layer, process roles and startup
//! flags, platform capabilities, lifecycle events and configuration shapes.
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod events;
pub mod instance;
pub mod platform;
pub mod registry;
pub mod settings;
pub mod taxonomy;
