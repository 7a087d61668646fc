//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept, polled)
//! - Fixed pool of worker threads fed over a crossbeam channel
//! - Every request dispatched under one database `Mutex`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
