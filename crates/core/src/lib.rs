//! Enhancement logic for the folio portfolio pages.
//!
//! Every component reads the page through a [`dom::Document`] and answers with
//! a list of [`folio_protocol::DomCommand`]s for the host to apply. Nothing in
//! here touches a real browser, so each piece runs against
//! [`memory::MemoryDocument`] in tests and in the headless replay tool.

pub mod anchor;
pub mod config;
pub mod dom;
pub mod init;
pub mod memory;
pub mod nav;
pub mod reveal;
pub mod scroll;
pub mod session;

pub use config::{ConfigError, EnhanceConfig};
pub use dom::{Document, ReadyState};
pub use init::{Enhancer, Installation, StartMode};
