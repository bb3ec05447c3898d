//! In-process registry of live websocket sessions.

use actix::Addr;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::ws::session::{Shutdown, WsSession};

#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<Uuid, Addr<WsSession>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(&self, conn_id: Uuid, addr: Addr<WsSession>) {
        self.connections.insert(conn_id, addr);
    }

    pub fn unregister_connection(&self, conn_id: Uuid) {
        self.connections.remove(&conn_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Ask every session to close; used on server shutdown.
    pub fn close_all_connections(&self) {
        let count = self.connections.len();
        for entry in self.connections.iter() {
            entry.value().do_send(Shutdown);
        }
        info!(count, "[WS HUB] shutdown sent to all sessions");
    }
}
