//! Shared provisioning primitives for the PiStats setup utilities
//!
//! Both the Raspberry Pi display provisioner and the gaming-PC agent are
//! sequenced, idempotent system provisioners: they install packages, write
//! configuration files, generate systemd units and start services. This
//! crate holds the pieces common to both hosts.

pub mod activate;
pub mod cmd;
pub mod net;
pub mod output;
pub mod steps;
pub mod textfile;
pub mod units;
