//! Accepts players and pairs them into games.
//!
//! Connections wait in a FIFO queue; every second arrival takes the oldest
//! waiting player and the two get their own thread for the whole game.

use crate::error::WarError;
use crate::handle::Handle;
use crate::session::{Session, SessionId};
use std::collections::VecDeque;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub const DEFAULT_PORT: u16 = 4444;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per read/write limit on every connection. `None` waits forever.
    pub io_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            io_timeout: None,
        }
    }
}

/// Players waiting for an opponent, oldest first.
pub struct PairingQueue<T> {
    waiting: Mutex<VecDeque<T>>,
}

impl<T> PairingQueue<T> {
    pub fn new() -> Self {
        PairingQueue {
            waiting: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues `player`, returning the two oldest waiting players once there
    /// are two.
    pub fn push(&self, player: T) -> Option<(T, T)> {
        let mut waiting = self.waiting.lock().unwrap_or_else(|e| e.into_inner());
        waiting.push_back(player);

        if waiting.len() < 2 {
            return None;
        }
        let first = waiting.pop_front()?;
        let second = waiting.pop_front()?;
        Some((first, second))
    }

    pub fn len(&self) -> usize {
        self.waiting.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PairingQueue<T> {
    fn default() -> Self {
        PairingQueue::new()
    }
}

pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    queue: PairingQueue<Handle>,
    next_id: u64,
}

impl Server {
    pub fn bind(config: ServerConfig) -> Result<Server, WarError> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))?;

        Ok(Server {
            listener,
            config,
            queue: PairingQueue::new(),
            next_id: 0,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, WarError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts players forever. Failures on one connection never stop the
    /// loop or touch running games.
    pub fn serve(mut self) -> Result<(), WarError> {
        info!("WAR server listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept() {
                Ok((socket, addr)) => {
                    debug!("Client connected from {}", addr);
                    self.admit(socket);
                }
                Err(e) => warn!("accept failed: {}", e),
            }
        }
    }

    fn admit(&mut self, socket: TcpStream) {
        let handle = match Handle::new(socket) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("dropping connection: {}", e);
                return;
            }
        };
        if let Err(e) = handle.set_timeout(self.config.io_timeout) {
            warn!("dropping connection: {}", e);
            return;
        }

        if let Some((p1, p2)) = self.queue.push(handle) {
            self.start_game(p1, p2);
        }
    }

    fn start_game(&mut self, p1: Handle, p2: Handle) {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        info!(
            "Starting game {} ({:?} vs {:?})",
            id,
            p1.peer_addr(),
            p2.peer_addr()
        );

        let session = Session::new(id, p1, p2);
        let spawned = thread::Builder::new()
            .name(format!("war-session-{}", id.0))
            .spawn(move || {
                // Errors are logged by the session and end only this game.
                let _ = session.run();
            });

        // The closure and both sockets are dropped if the thread never started.
        if let Err(e) = spawned {
            error!("could not start game {}: {}", id, e);
        }
    }
}

/// Listens on `host:port` and referees games until the process exits.
pub fn serve_game(host: &str, port: u16) -> Result<(), WarError> {
    Server::bind(ServerConfig {
        host: host.to_string(),
        port,
        ..ServerConfig::default()
    })?
    .serve()
}
