//! Server Tests
//!
//! These tests verify:
//! - Requests over TCP reach the database and get the mapped status
//! - Several requests can share one connection
//! - Concurrent clients are serialized through the database mutex
//! - Shutdown stops the server

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use flatkv::network::{Server, ShutdownHandle};
use flatkv::protocol::{read_response, write_request, Method, Request, Response, Status};
use flatkv::{Config, Database, Engine, MemoryDatabase};
use parking_lot::Mutex;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct Running {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: JoinHandle<()>,
}

impl Running {
    fn stop(self) {
        self.shutdown.shutdown();
        self.thread.join().unwrap();
    }
}

fn start<D: Database + Send + 'static>(db: Arc<Mutex<D>>) -> Running {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(4)
        .read_timeout_ms(500)
        .build();

    let mut server = Server::new(config, db);
    let addr = server.bind().unwrap();
    assert_eq!(server.local_addr(), Some(addr));
    let shutdown = server.shutdown_handle();

    let thread = thread::spawn(move || {
        server.run().unwrap();
    });

    Running {
        addr,
        shutdown,
        thread,
    }
}

struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        Self {
            writer: BufWriter::new(stream.try_clone().unwrap()),
            reader: BufReader::new(stream),
        }
    }

    fn send(&mut self, request: &Request) -> Response {
        write_request(&mut self.writer, request).unwrap();
        read_response(&mut self.reader).unwrap()
    }
}

// =============================================================================
// Request Tests
// =============================================================================

#[test]
fn test_server_round_trip_over_engine() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data");
    let engine = Engine::open_path(&path).unwrap();
    let running = start(Arc::new(Mutex::new(engine)));

    let mut client = Client::connect(running.addr);

    let response = client.send(&Request::put("alice", "30"));
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.text(), "OK");

    client.send(&Request::put("bob", "25"));

    let response = client.send(&Request::get("bob"));
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.payload, Some(b"25".to_vec()));

    let response = client.send(&Request::delete("alice"));
    assert_eq!(response.status, Status::Ok);

    let response = client.send(&Request::get("alice"));
    assert_eq!(response.status, Status::NotFound);

    drop(client);
    running.stop();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "3 bob25");
}

#[test]
fn test_server_bad_request() {
    let running = start(Arc::new(Mutex::new(MemoryDatabase::new())));
    let mut client = Client::connect(running.addr);

    let response = client.send(&Request::new(Method::Get));
    assert_eq!(response.status, Status::BadRequest);
    assert_eq!(response.text(), "error: No key provided");

    // Connection stays usable after a client error
    let response = client.send(&Request::put("k", "v"));
    assert_eq!(response.status, Status::Ok);

    drop(client);
    running.stop();
}

#[test]
fn test_server_concurrent_clients() {
    let db = Arc::new(Mutex::new(MemoryDatabase::new()));
    let running = start(Arc::clone(&db));
    let addr = running.addr;

    let clients: Vec<_> = (0..4)
        .map(|c| {
            thread::spawn(move || {
                let mut client = Client::connect(addr);
                for i in 0..25 {
                    let key = format!("c{}-k{}", c, i);
                    let response = client.send(&Request::put(key.clone(), "v"));
                    assert_eq!(response.status, Status::Ok);
                }
            })
        })
        .collect();

    for client in clients {
        client.join().unwrap();
    }

    running.stop();

    assert_eq!(db.lock().len(), 100);
}

#[test]
fn test_server_shutdown_without_clients() {
    let running = start(Arc::new(Mutex::new(MemoryDatabase::new())));
    running.stop();
}
