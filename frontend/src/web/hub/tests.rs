use super::*;

fn negotiated(json: &str) -> NegotiateResponse {
    serde_json::from_str(json).unwrap()
}

#[test]
fn handshake_and_ping_are_record_terminated() {
    assert_eq!(handshake_request(), "{\"protocol\":\"json\",\"version\":1}\u{1e}");
    assert_eq!(ping_frame(), "{\"type\":6}\u{1e}");
}

#[test]
fn partial_frames_wait_for_their_separator() {
    let mut buffer = String::from("{}\u{1e}{\"type\":6}\u{1e}{\"type\":1,");
    assert_eq!(drain_frames(&mut buffer), ["{}", "{\"type\":6}"]);
    assert_eq!(buffer, "{\"type\":1,");

    assert!(drain_frames(&mut buffer).is_empty());
    buffer.push_str("\"target\":\"x\"}\u{1e}");
    assert_eq!(drain_frames(&mut buffer), ["{\"type\":1,\"target\":\"x\"}"]);
    assert!(buffer.is_empty());
}

#[test]
fn handshake_response_has_no_type() {
    assert_eq!(parse_frame("{}"), HubEvent::HandshakeAccepted);
    assert_eq!(
        parse_frame(r#"{"error":"Requested protocol 'json' is not available."}"#),
        HubEvent::HandshakeRejected("Requested protocol 'json' is not available.".into())
    );
}

#[test]
fn receive_message_invocations_carry_sender_and_content() {
    assert_eq!(
        parse_frame(r#"{"type":1,"target":"ReceiveMessage","arguments":[42,"hello"]}"#),
        HubEvent::MessageReceived {
            sender_id: 42,
            content: "hello".into()
        }
    );
    assert_eq!(
        parse_frame(r#"{"type":1,"target":"receivemessage","arguments":["7","hi"]}"#),
        HubEvent::MessageReceived {
            sender_id: 7,
            content: "hi".into()
        }
    );
}

#[test]
fn other_frames_are_not_messages() {
    assert_eq!(
        parse_frame(r#"{"type":1,"target":"UserTyping","arguments":[42]}"#),
        HubEvent::Ignored
    );
    assert_eq!(
        parse_frame(r#"{"type":1,"target":"ReceiveMessage","arguments":[42]}"#),
        HubEvent::Ignored
    );
    assert_eq!(parse_frame(r#"{"type":6}"#), HubEvent::Ping);
    assert_eq!(
        parse_frame(r#"{"type":7,"error":"shutting down","allowReconnect":true}"#),
        HubEvent::Closed {
            error: Some("shutting down".into())
        }
    );
    assert_eq!(parse_frame("not json"), HubEvent::Ignored);
}

#[test]
fn reconnect_backs_off_then_gives_up() {
    let delays: Vec<_> = (0..5).map(reconnect_delay).collect();
    assert_eq!(delays, [Some(0), Some(2_000), Some(10_000), Some(30_000), None]);
}

#[test]
fn urls_keep_existing_query_and_switch_scheme() {
    assert_eq!(
        negotiate_url("https://localhost:5003/hubs/chat"),
        "https://localhost:5003/hubs/chat/negotiate?negotiateVersion=1"
    );
    assert_eq!(
        negotiate_url("https://relay.example.com/client/?hub=chat"),
        "https://relay.example.com/client/negotiate?hub=chat&negotiateVersion=1"
    );
    assert_eq!(
        socket_url("https://localhost:5003/hubs/chat", "id=abc&access_token=t"),
        "wss://localhost:5003/hubs/chat?id=abc&access_token=t"
    );
    assert_eq!(
        socket_url("http://relay.example.com/client?hub=chat", "id=abc"),
        "ws://relay.example.com/client?hub=chat&id=abc"
    );
}

#[test]
fn negotiation_yields_token_or_redirect() {
    assert_eq!(
        endpoint(negotiated(
            r#"{"negotiateVersion":1,"connectionId":"c","connectionToken":"tok","availableTransports":[{"transport":"WebSockets","transferFormats":["Text","Binary"]}]}"#
        )),
        Ok(Endpoint::Connect {
            connection_token: "tok".into()
        })
    );
    assert_eq!(
        endpoint(negotiated(r#"{"connectionId":"legacy"}"#)),
        Ok(Endpoint::Connect {
            connection_token: "legacy".into()
        })
    );
    assert_eq!(
        endpoint(negotiated(r#"{"url":"https://relay.example.com/client/?hub=chat","accessToken":"relay"}"#)),
        Ok(Endpoint::Redirect {
            url: "https://relay.example.com/client/?hub=chat".into(),
            access_token: Some("relay".into())
        })
    );
}

#[test]
fn negotiation_failures_are_reported() {
    assert!(matches!(
        endpoint(negotiated(r#"{"error":"Unauthorized"}"#)),
        Err(HubError::Negotiate(e)) if e == "Unauthorized"
    ));
    assert!(endpoint(negotiated(
        r#"{"connectionToken":"tok","availableTransports":[{"transport":"LongPolling"}]}"#
    ))
    .is_err());
    assert!(endpoint(NegotiateResponse::default()).is_err());
}
