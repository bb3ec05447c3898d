use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extractors::ApiKey;
use crate::repos::player_stats::PlayerStat;
use crate::repos::scores::Score;
use crate::state::app_state::AppState;
use crate::store::{ModelStore, Snapshot};
use crate::ws::hub::WsRegistry;
use crate::ws::protocol::{ClientMsg, ErrorCode, ServerMsg, SnapshotItems, Topic, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

/// A snapshot arriving from one of the session's live queries.
#[derive(Message)]
#[rtype(result = "()")]
pub enum TopicPush {
    Scores(Snapshot<Score>),
    PlayerStats(Snapshot<PlayerStat>),
}

impl TopicPush {
    fn topic(&self) -> Topic {
        match self {
            TopicPush::Scores(_) => Topic::Scores,
            TopicPush::PlayerStats(_) => Topic::PlayerStats,
        }
    }
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    _key: ApiKey,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let registry = app_state.websocket_registry();
    let session = WsSession::new(Uuid::new_v4(), app_state, registry);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    registry: Arc<WsRegistry>,
    subscriptions: HashMap<Topic, CancellationToken>,
    last_heartbeat: Instant,
    heartbeat_handle: Option<SpawnHandle>,
    hello_done: bool,
}

impl WsSession {
    fn new(conn_id: Uuid, app_state: web::Data<AppState>, registry: Arc<WsRegistry>) -> Self {
        Self {
            conn_id,
            app_state,
            registry,
            subscriptions: HashMap::new(),
            last_heartbeat: Instant::now(),
            heartbeat_handle: None,
            hello_done: false,
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg<'_>) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(
        &self,
        ctx: &mut ws::WebsocketContext<Self>,
        code: ErrorCode,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                code,
                message: message.into(),
            },
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let handle = ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
        self.heartbeat_handle = Some(handle);
    }

    /// Open a live query for `topic`. Re-subscribing replaces the old query,
    /// so the client always gets the current set right after its ack.
    fn subscribe(&mut self, topic: Topic, ctx: &mut ws::WebsocketContext<Self>) {
        let store = self.app_state.store.as_ref();
        let token = match topic {
            Topic::Scores => {
                let sub = ModelStore::<Score>::observe_query(store);
                let token = sub.cancel_token();
                ctx.add_message_stream(sub.into_stream().map(TopicPush::Scores));
                token
            }
            Topic::PlayerStats => {
                let sub = ModelStore::<PlayerStat>::observe_query(store);
                let token = sub.cancel_token();
                ctx.add_message_stream(sub.into_stream().map(TopicPush::PlayerStats));
                token
            }
        };

        if let Some(previous) = self.subscriptions.insert(topic, token) {
            previous.cancel();
        }
        debug!(conn_id = %self.conn_id, ?topic, "[WS SESSION] subscribed");
    }

    fn unsubscribe(&mut self, topic: Topic) {
        if let Some(token) = self.subscriptions.remove(&topic) {
            token.cancel();
        }
        debug!(conn_id = %self.conn_id, ?topic, "[WS SESSION] unsubscribed");
    }

    fn cancel_all(&mut self) {
        for (_, token) in self.subscriptions.drain() {
            token.cancel();
        }
    }

    fn handle_client_msg(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match cmd {
            ClientMsg::Hello { protocol } => {
                if protocol != PROTOCOL_VERSION {
                    self.send_error_and_close(
                        ctx,
                        ErrorCode::BadProtocol,
                        "Unsupported protocol version",
                    );
                    return;
                }
                self.hello_done = true;
                Self::send_json(
                    ctx,
                    &ServerMsg::HelloAck {
                        protocol: PROTOCOL_VERSION,
                    },
                );
            }
            ClientMsg::Subscribe { topic } => {
                if !self.hello_done {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
                    return;
                }
                // Ack first; the initial snapshot follows from the new query.
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "subscribed",
                        topic,
                    },
                );
                self.subscribe(topic, ctx);
            }
            ClientMsg::Unsubscribe { topic } => {
                if !self.hello_done {
                    self.send_error_and_close(ctx, ErrorCode::BadRequest, "Must send hello first");
                    return;
                }
                self.unsubscribe(topic);
                Self::send_json(
                    ctx,
                    &ServerMsg::Ack {
                        message: "unsubscribed",
                        topic,
                    },
                );
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.registry.register_connection(self.conn_id, ctx.address());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.cancel_all();
        self.registry.unregister_connection(self.conn_id);
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.handle_client_msg(cmd, ctx),
                    Err(_) => self.send_error_and_close(ctx, ErrorCode::BadRequest, "Malformed JSON"),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, ErrorCode::BadRequest, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<TopicPush> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: TopicPush, ctx: &mut Self::Context) -> Self::Result {
        let topic = msg.topic();
        let live = self
            .subscriptions
            .get(&topic)
            .is_some_and(|token| !token.is_cancelled());
        if !live {
            return;
        }

        let (version, items) = match &msg {
            TopicPush::Scores(snap) => (snap.version, SnapshotItems::Scores(snap.items())),
            TopicPush::PlayerStats(snap) => {
                (snap.version, SnapshotItems::PlayerStats(snap.items()))
            }
        };
        Self::send_json(
            ctx,
            &ServerMsg::Snapshot {
                topic,
                version,
                items,
            },
        );
    }
}

impl Handler<Shutdown> for WsSession {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        self.cancel_all();
        self.registry.unregister_connection(self.conn_id);

        if let Some(handle) = self.heartbeat_handle.take() {
            ctx.cancel_future(handle);
        }

        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}
