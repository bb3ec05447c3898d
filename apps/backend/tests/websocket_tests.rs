mod common;

use std::net::TcpListener;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use futures_util::{SinkExt, StreamExt};
use scoreboard_backend::{routes, AppState, ModelStore, NewScore, RequestTrace, Score};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::memory_state;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

async fn start_server(
    state: AppState,
) -> Result<(actix_web::dev::ServerHandle, std::net::SocketAddr), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((handle, addr))
}

async fn send(client: &mut Client, value: Value) {
    client.send(Message::text(value.to_string())).await.unwrap();
}

async fn recv_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("message within timeout")
            .expect("stream open")
            .expect("valid frame");
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

async fn connect_with_header(addr: std::net::SocketAddr, key: &str) -> Client {
    let mut request = format!("ws://{addr}/api/ws").into_client_request().unwrap();
    request.headers_mut().insert("x-api-key", key.parse().unwrap());
    let (client, _) = connect_async(request).await.unwrap();
    client
}

#[actix_web::test]
async fn subscribe_receives_initial_and_live_snapshots() {
    let (state, key) = memory_state().await;
    let store = state.store.clone();
    let (handle, addr) = start_server(state).await.unwrap();

    let mut client = connect_with_header(addr, &key).await;
    send(&mut client, json!({"type": "hello", "protocol": 1})).await;
    assert_eq!(recv_json(&mut client).await, json!({"type": "hello_ack", "protocol": 1}));

    send(&mut client, json!({"type": "subscribe", "topic": "scores"})).await;
    let ack = recv_json(&mut client).await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["topic"], "scores");

    let initial = recv_json(&mut client).await;
    assert_eq!(initial["type"], "snapshot");
    assert_eq!(initial["items"], json!([]));

    ModelStore::<Score>::create(store.as_ref(), NewScore::round(1)).await.unwrap();
    let pushed = recv_json(&mut client).await;
    assert_eq!(pushed["topic"], "scores");
    assert_eq!(pushed["items"][0]["roundNumber"], 1);
    assert!(pushed["version"].as_u64() > initial["version"].as_u64());

    handle.stop(true).await;
}

#[actix_web::test]
async fn query_string_key_is_accepted_for_upgrade() {
    let (state, key) = memory_state().await;
    let (handle, addr) = start_server(state).await.unwrap();

    let (mut client, _) = connect_async(format!("ws://{addr}/api/ws?api_key={key}"))
        .await
        .unwrap();
    send(&mut client, json!({"type": "hello", "protocol": 1})).await;
    assert_eq!(recv_json(&mut client).await["type"], "hello_ack");

    handle.stop(true).await;
}

#[actix_web::test]
async fn upgrade_without_key_is_refused() {
    let (state, _key) = memory_state().await;
    let (handle, addr) = start_server(state).await.unwrap();

    let result = connect_async(format!("ws://{addr}/api/ws")).await;
    assert!(result.is_err());

    handle.stop(true).await;
}

#[actix_web::test]
async fn subscribe_before_hello_is_an_error() {
    let (state, key) = memory_state().await;
    let (handle, addr) = start_server(state).await.unwrap();

    let mut client = connect_with_header(addr, &key).await;
    send(&mut client, json!({"type": "subscribe", "topic": "player_stats"})).await;
    let err = recv_json(&mut client).await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "bad_request");

    handle.stop(true).await;
}

#[actix_web::test]
async fn wrong_protocol_version_is_rejected() {
    let (state, key) = memory_state().await;
    let (handle, addr) = start_server(state).await.unwrap();

    let mut client = connect_with_header(addr, &key).await;
    send(&mut client, json!({"type": "hello", "protocol": 99})).await;
    let err = recv_json(&mut client).await;
    assert_eq!(err["code"], "bad_protocol");

    handle.stop(true).await;
}
