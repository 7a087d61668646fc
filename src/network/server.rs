//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, SendTimeoutError, Sender};
use parking_lot::Mutex;

use crate::config::Config;
use crate::database::Database;
use crate::error::Result;

use super::Connection;

/// How long the acceptor waits before rechecking shutdown, both when no
/// connection is pending and when every worker is busy
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of passing an accepted connection to the worker pool
#[derive(Debug, PartialEq, Eq)]
enum Handoff {
    Queued,
    Shutdown,
    WorkersGone,
}

/// Cloneable handle that stops a running server
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and return from `run`
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// TCP server for FlatKV
///
/// The database sits behind one `Mutex`, so requests from all connections
/// are applied one at a time.
pub struct Server<D> {
    config: Config,
    db: Arc<Mutex<D>>,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
}

impl<D: Database + Send + 'static> Server<D> {
    /// Create a new server with the given config and database
    pub fn new(config: Config, db: Arc<Mutex<D>>) -> Self {
        Self {
            config,
            db,
            listener: None,
            shutdown: ShutdownHandle::default(),
        }
    }

    /// Bind the listen address, returning the bound address
    pub fn bind(&mut self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(&self.config.listen_addr)?;
        let addr = listener.local_addr()?;
        self.listener = Some(listener);
        tracing::info!("Started listening for requests on {}", addr);
        Ok(addr)
    }

    /// Address the server is bound to, if bound
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Get a handle that can stop the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    /// Start the server (blocking)
    ///
    /// Binds first if `bind` was not called. Returns once shutdown has been
    /// signalled and every worker has finished its connection. A worker
    /// only notices shutdown between connections, so with
    /// `read_timeout_ms == 0` an idle client keeps `run` from returning.
    pub fn run(&mut self) -> Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Ok(()),
        };
        listener.set_nonblocking(true)?;

        let (sender, receiver) = channel::bounded::<TcpStream>(self.config.max_connections);
        let mut workers = Vec::with_capacity(self.config.max_connections);
        for id in 0..self.config.max_connections {
            workers.push(self.spawn_worker(id, receiver.clone())?);
        }
        drop(receiver);

        while !self.shutdown.is_shutdown() {
            match listener.accept() {
                Ok((stream, addr)) => {
                    tracing::debug!("Accepted connection from {}", addr);
                    match hand_off(&sender, stream, &self.shutdown) {
                        Handoff::Queued => {}
                        Handoff::Shutdown => {
                            tracing::debug!("Dropping connection from {} during shutdown", addr);
                            break;
                        }
                        Handoff::WorkersGone => {
                            tracing::warn!("All workers exited; stopping acceptor");
                            break;
                        }
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    // Persistent failures such as EMFILE would otherwise spin
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        // Closing the channel lets idle workers exit
        drop(sender);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Connection worker panicked");
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    fn spawn_worker(&self, id: usize, receiver: Receiver<TcpStream>) -> Result<JoinHandle<()>> {
        let db = Arc::clone(&self.db);
        let read_ms = self.config.read_timeout_ms;
        let write_ms = self.config.write_timeout_ms;

        let handle = thread::Builder::new()
            .name(format!("flatkv-worker-{}", id))
            .spawn(move || {
                for stream in receiver.iter() {
                    if let Err(e) = serve(stream, Arc::clone(&db), read_ms, write_ms) {
                        tracing::warn!("Connection ended with error: {}", e);
                    }
                }
            })?;

        Ok(handle)
    }
}

/// Queue `item` for a worker, giving up if shutdown is signalled while
/// every worker is busy
fn hand_off<T>(sender: &Sender<T>, mut item: T, shutdown: &ShutdownHandle) -> Handoff {
    loop {
        match sender.send_timeout(item, ACCEPT_POLL_INTERVAL) {
            Ok(()) => return Handoff::Queued,
            Err(SendTimeoutError::Timeout(returned)) => {
                if shutdown.is_shutdown() {
                    return Handoff::Shutdown;
                }
                item = returned;
            }
            Err(SendTimeoutError::Disconnected(_)) => return Handoff::WorkersGone,
        }
    }
}

fn serve<D: Database>(
    stream: TcpStream,
    db: Arc<Mutex<D>>,
    read_ms: u64,
    write_ms: u64,
) -> Result<()> {
    // Accepted sockets may inherit the listener's non-blocking mode
    stream.set_nonblocking(false)?;
    let mut connection = Connection::new(stream, db)?;
    connection.set_timeouts(read_ms, write_ms)?;
    connection.handle()
}
