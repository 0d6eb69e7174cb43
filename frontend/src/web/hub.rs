//! 实时聊天 hub 客户端（SignalR JSON 协议）
//!
//! 连接流程：`POST {hub}/negotiate` 取得连接 token，打开 `wss` 连接
//! （`id` 与 `access_token` 放在查询串中），发送 JSON 协议握手，
//! 之后按 `\x1e` 分帧读取调用消息。只处理 `ReceiveMessage`。
//!
//! 帧的解析、地址拼接与重连节奏都是纯函数，连接本身在 [`connect`] 中
//! 由一个 `spawn_local` 任务驱动；丢弃 [`HubHandle`] 即关闭连接。

use adfluencer_shared::HEADER_AUTHORIZATION;
use futures::channel::oneshot;
use futures::future::{Either, select};
use futures::{SinkExt, StreamExt};
use gloo_net::http::{QueryParams, Request};
use gloo_net::websocket::Message as WsMessage;
use gloo_net::websocket::futures::WebSocket;
use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// 帧分隔符
pub const RECORD_SEPARATOR: char = '\u{1e}';

const RECEIVE_MESSAGE: &str = "ReceiveMessage";

/// 客户端心跳间隔，服务端默认 30 秒收不到消息即断开
const KEEP_ALIVE_MS: u32 = 15_000;

/// 第 n 次重连前的等待时间，用尽后放弃
const RECONNECT_DELAYS_MS: [u32; 4] = [0, 2_000, 10_000, 30_000];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HubError {
    #[error("协商失败: {0}")]
    Negotiate(String),
    #[error("连接失败: {0}")]
    Socket(String),
    #[error("握手被拒绝: {0}")]
    Handshake(String),
}

// =========================================================
// 协议（纯函数）
// =========================================================

pub fn handshake_request() -> String {
    format!(r#"{{"protocol":"json","version":1}}{RECORD_SEPARATOR}"#)
}

pub fn ping_frame() -> String {
    format!(r#"{{"type":6}}{RECORD_SEPARATOR}"#)
}

/// 取出缓冲区中所有完整的帧，不完整的尾部留在缓冲区等待后续数据
pub fn drain_frames(buffer: &mut String) -> Vec<String> {
    let Some(last) = buffer.rfind(RECORD_SEPARATOR) else {
        return Vec::new();
    };
    let rest = buffer.split_off(last + RECORD_SEPARATOR.len_utf8());
    let complete = std::mem::replace(buffer, rest);
    complete
        .split(RECORD_SEPARATOR)
        .filter(|frame| !frame.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析后的 hub 帧
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    HandshakeAccepted,
    HandshakeRejected(String),
    MessageReceived { sender_id: i64, content: String },
    Ping,
    Closed { error: Option<String> },
    /// 其它调用、流式消息或无法解析的帧
    Ignored,
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: Option<u8>,
    target: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    error: Option<String>,
}

/// 解析单个帧。握手响应没有 `type` 字段
pub fn parse_frame(frame: &str) -> HubEvent {
    let Ok(raw) = serde_json::from_str::<RawFrame>(frame) else {
        return HubEvent::Ignored;
    };
    match raw.kind {
        None => match raw.error {
            Some(error) => HubEvent::HandshakeRejected(error),
            None => HubEvent::HandshakeAccepted,
        },
        Some(1)
            if raw
                .target
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(RECEIVE_MESSAGE)) =>
        {
            received(&raw.arguments).unwrap_or(HubEvent::Ignored)
        }
        Some(6) => HubEvent::Ping,
        Some(7) => HubEvent::Closed { error: raw.error },
        _ => HubEvent::Ignored,
    }
}

/// `ReceiveMessage(senderId, content)`，发送者 ID 可能被序列化为字符串
fn received(arguments: &[Value]) -> Option<HubEvent> {
    let sender_id = match arguments.first()? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let content = arguments.get(1)?.as_str()?.to_string();
    Some(HubEvent::MessageReceived { sender_id, content })
}

pub fn reconnect_delay(attempt: usize) -> Option<u32> {
    RECONNECT_DELAYS_MS.get(attempt).copied()
}

fn split_query(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base.trim_end_matches('/'), Some(query)),
        None => (url.trim_end_matches('/'), None),
    }
}

pub fn negotiate_url(hub_url: &str) -> String {
    match split_query(hub_url) {
        (base, Some(query)) => format!("{base}/negotiate?{query}&negotiateVersion=1"),
        (base, None) => format!("{base}/negotiate?negotiateVersion=1"),
    }
}

/// 把 hub 地址换成 WebSocket 协议并追加已编码的查询参数
pub fn socket_url(hub_url: &str, encoded_params: &str) -> String {
    let (base, query) = split_query(hub_url);
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    match query {
        Some(query) => format!("{base}?{query}&{encoded_params}"),
        None => format!("{base}?{encoded_params}"),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiateResponse {
    pub connection_token: Option<String>,
    pub connection_id: Option<String>,
    pub url: Option<String>,
    pub access_token: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub available_transports: Vec<TransportInfo>,
}

#[derive(Debug, Deserialize)]
pub struct TransportInfo {
    pub transport: String,
}

/// 协商结果的下一步
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Connect { connection_token: String },
    /// 服务端要求改连另一个 hub（可能附带新的 token）
    Redirect { url: String, access_token: Option<String> },
}

pub fn endpoint(response: NegotiateResponse) -> Result<Endpoint, HubError> {
    if let Some(error) = response.error {
        return Err(HubError::Negotiate(error));
    }
    if let Some(url) = response.url {
        return Ok(Endpoint::Redirect {
            url,
            access_token: response.access_token,
        });
    }
    let transports = &response.available_transports;
    if !transports.is_empty() && !transports.iter().any(|t| t.transport == "WebSockets") {
        return Err(HubError::Negotiate("WebSockets transport not offered".into()));
    }
    // 协商版本 0 的服务端只返回 connectionId
    response
        .connection_token
        .or(response.connection_id)
        .map(|connection_token| Endpoint::Connect { connection_token })
        .ok_or_else(|| HubError::Negotiate("missing connection token".into()))
}

// =========================================================
// 连接
// =========================================================

/// 活动连接的句柄，丢弃即关闭连接并停止重连
pub struct HubHandle {
    _stop: oneshot::Sender<()>,
}

enum SessionEnd {
    Stopped,
    Dropped,
}

/// 在后台建立连接，收到的消息交给 `on_message(sender_id, content)`
pub fn connect(
    hub_url: String,
    token: String,
    on_message: impl Fn(i64, String) + 'static,
) -> HubHandle {
    let (stop_tx, mut stop) = oneshot::channel();

    spawn_local(async move {
        let mut attempt = 0;
        loop {
            match run_session(&hub_url, &token, &on_message, &mut stop, &mut attempt).await {
                Ok(SessionEnd::Stopped) => return,
                Ok(SessionEnd::Dropped) => log_warn!("[Hub] Connection closed by server"),
                Err(e) => log_warn!("[Hub] {}", e),
            }

            let Some(delay) = reconnect_delay(attempt) else {
                log_error!("[Hub] Giving up after {} reconnect attempts", attempt);
                return;
            };
            attempt += 1;
            if let Either::Right(_) = select(TimeoutFuture::new(delay), &mut stop).await {
                return;
            }
        }
    });

    HubHandle { _stop: stop_tx }
}

async fn negotiate(hub_url: &str, token: &str) -> Result<NegotiateResponse, HubError> {
    let request = Request::post(&negotiate_url(hub_url))
        .header(HEADER_AUTHORIZATION, &format!("Bearer {token}"))
        .build()
        .map_err(|e| HubError::Negotiate(e.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|e| HubError::Negotiate(e.to_string()))?;
    if !response.ok() {
        return Err(HubError::Negotiate(format!("HTTP {}", response.status())));
    }
    response
        .json()
        .await
        .map_err(|e| HubError::Negotiate(e.to_string()))
}

async fn open_socket(hub_url: &str, token: &str) -> Result<WebSocket, HubError> {
    let mut hub_url = hub_url.to_string();
    let mut token = token.to_string();

    // 最多跟随一次重定向
    for _ in 0..2 {
        match endpoint(negotiate(&hub_url, &token).await?)? {
            Endpoint::Connect { connection_token } => {
                let params = QueryParams::new();
                params.append("id", &connection_token);
                params.append("access_token", &token);
                let url = socket_url(&hub_url, &params.to_string());
                return WebSocket::open(&url).map_err(|e| HubError::Socket(e.to_string()));
            }
            Endpoint::Redirect { url, access_token } => {
                hub_url = url;
                if let Some(access_token) = access_token {
                    token = access_token;
                }
            }
        }
    }
    Err(HubError::Negotiate("too many redirects".into()))
}

async fn run_session(
    hub_url: &str,
    token: &str,
    on_message: &dyn Fn(i64, String),
    stop: &mut oneshot::Receiver<()>,
    attempt: &mut usize,
) -> Result<SessionEnd, HubError> {
    let socket = open_socket(hub_url, token).await?;
    let (mut write, mut read) = socket.split();
    let socket_error = |e: gloo_net::websocket::WebSocketError| HubError::Socket(e.to_string());

    write
        .send(WsMessage::Text(handshake_request()))
        .await
        .map_err(socket_error)?;

    let mut buffer = String::new();
    let mut connected = false;

    loop {
        let tick = TimeoutFuture::new(KEEP_ALIVE_MS);
        match select(read.next(), select(tick, &mut *stop)).await {
            Either::Left((Some(Ok(WsMessage::Text(text))), _)) => {
                buffer.push_str(&text);
                for frame in drain_frames(&mut buffer) {
                    match parse_frame(&frame) {
                        HubEvent::HandshakeAccepted => {
                            connected = true;
                            *attempt = 0;
                            log_info!("[Hub] Connected");
                        }
                        HubEvent::HandshakeRejected(error) => return Err(HubError::Handshake(error)),
                        HubEvent::MessageReceived { sender_id, content } => {
                            on_message(sender_id, content)
                        }
                        HubEvent::Closed { error } => {
                            if let Some(error) = error {
                                log_warn!("[Hub] Server closed the connection: {}", error);
                            }
                            return Ok(SessionEnd::Dropped);
                        }
                        HubEvent::Ping | HubEvent::Ignored => {}
                    }
                }
            }
            Either::Left((Some(Ok(WsMessage::Bytes(_))), _)) => {}
            Either::Left((Some(Err(e)), _)) => return Err(socket_error(e)),
            Either::Left((None, _)) => return Ok(SessionEnd::Dropped),
            Either::Right((Either::Left(_), _)) => {
                if connected {
                    write
                        .send(WsMessage::Text(ping_frame()))
                        .await
                        .map_err(socket_error)?;
                }
            }
            Either::Right((Either::Right(_), _)) => {
                if let Err(e) = write.close().await {
                    log_warn!("[Hub] Close failed: {}", e);
                }
                return Ok(SessionEnd::Stopped);
            }
        }
    }
}

#[cfg(test)]
mod tests;
