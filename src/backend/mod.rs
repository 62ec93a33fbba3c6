//! Backend integration: credentials, event log, stop notifications.
//!
//! Everything here talks to the backend only through
//! [`HttpPort`](crate::app::ports::HttpPort), so the whole module runs on
//! the host against scripted responses.

pub mod credentials;
pub mod notify;
pub mod sync;
pub mod wire;
