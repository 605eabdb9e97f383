//! Session-level tests against a scripted mock server.

use std::time::Duration;

use tokio::time::{ sleep, timeout };
use tokio_util::sync::CancellationToken;

use super::{ initialize_result_json, initialized_session, mock_transport };
use crate::client::lifecycle::SessionState;
use crate::client::session::ClientSession;
use crate::protocol::{ Error, Method };
use crate::types::CallToolParams;

async fn wait_for_state(session: &ClientSession, want: SessionState) {
    for _ in 0..100 {
        if session.state() == want {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("session never reached {:?} (currently {:?})", want, session.state());
}

#[tokio::test]
async fn initialize_performs_the_full_handshake() {
    let (transport, mut server) = mock_transport();
    let session = std::sync::Arc::new(ClientSession::new(transport));
    assert_eq!(session.state(), SessionState::Uninitialized);

    let handshake = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };

    let request = server.expect_request().await;
    assert_eq!(request.id, 1);
    assert_eq!(request.method, "initialize");
    let params = request.params.unwrap();
    assert_eq!(params["protocolVersion"], "2024-11-05");
    assert!(params["clientInfo"]["name"].is_string());
    assert!(params["capabilities"].is_object());

    server.reply(request.id, initialize_result_json());

    // The handshake ends with the one-way initialized notification, with an
    // explicit null payload.
    let notification = server.expect_notification().await;
    assert_eq!(notification.method, "notifications/initialized");
    assert_eq!(notification.params, Some(serde_json::Value::Null));

    let result = handshake.await.unwrap().unwrap();
    assert_eq!(result.server_info.name, "mock");
    assert_eq!(result.protocol_version, "2024-11-05");
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.server_info().await.is_some());
}

#[tokio::test]
async fn request_before_initialize_is_rejected_without_writing() {
    let (transport, mut server) = mock_transport();
    let session = ClientSession::new(transport);

    let result = session.send_request(Method::Ping, serde_json::Value::Null).await;

    assert!(matches!(result, Err(Error::InvalidState(_))));
    assert!(server.no_frames_written());
}

#[tokio::test]
async fn initialize_twice_is_rejected() {
    let (session, _server) = initialized_session().await;
    assert!(matches!(session.initialize().await, Err(Error::InvalidState(_))));
}

#[tokio::test]
async fn direct_initialize_request_is_reserved_for_the_session() {
    let (session, _server) = initialized_session().await;
    let result = session.send_request(Method::Initialize, serde_json::Value::Null).await;
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

#[tokio::test]
async fn concurrent_requests_are_correlated_across_out_of_order_replies() {
    let (session, mut server) = initialized_session().await;

    let tools = {
        let session = session.clone();
        tokio::spawn(async move { session.list_tools(None).await })
    };
    let resources = {
        let session = session.clone();
        tokio::spawn(async move { session.list_resources(None).await })
    };

    let first = server.expect_request().await;
    let second = server.expect_request().await;
    assert_ne!(first.id, second.id);
    assert!([first.id, second.id].iter().all(|id| *id == 2 || *id == 3));

    let (tools_id, resources_id) = if first.method == "tools/list" {
        assert_eq!(second.method, "resources/list");
        (first.id, second.id)
    } else {
        assert_eq!(first.method, "resources/list");
        assert_eq!(second.method, "tools/list");
        (second.id, first.id)
    };

    // Reply to the later request first; each caller must still get its own
    // result.
    server.reply(resources_id, serde_json::json!({ "resources": [] }));
    server.reply(tools_id, serde_json::json!({ "tools": [] }));

    assert!(tools.await.unwrap().unwrap().tools.is_empty());
    assert!(resources.await.unwrap().unwrap().resources.is_empty());
}

#[tokio::test]
async fn cancellation_token_cancels_and_late_reply_is_discarded() {
    let (session, mut server) = initialized_session().await;
    let token = CancellationToken::new();

    let call = {
        let session = session.clone();
        let token = token.clone();
        tokio::spawn(async move {
            session.send_request_cancellable(
                Method::ToolsCall,
                serde_json::json!({ "name": "slow-tool" }),
                &token
            ).await
        })
    };

    let request = server.expect_request().await;
    assert_eq!(request.method, "tools/call");

    token.cancel();
    assert!(matches!(call.await.unwrap(), Err(Error::Cancelled)));

    // The reply lands after cancellation and goes down the unsolicited
    // path; the session stays Ready and usable.
    server.reply(request.id, serde_json::json!({ "content": [] }));

    let ping = {
        let session = session.clone();
        tokio::spawn(async move { session.ping().await })
    };
    let request = server.expect_request().await;
    assert_eq!(request.method, "ping");
    server.reply(request.id, serde_json::json!({}));
    ping.await.unwrap().unwrap();

    assert_eq!(session.state(), SessionState::Ready);
}

#[tokio::test]
async fn dropping_the_request_future_cancels_the_pending_slot() {
    let (session, mut server) = initialized_session().await;

    let result = timeout(
        Duration::from_millis(5),
        session.call_tool(CallToolParams {
            name: "slow-tool".to_string(),
            arguments: None,
        })
    ).await;
    assert!(result.is_err(), "expected the caller's timeout to fire first");

    let request = server.expect_request().await;
    server.reply(request.id, serde_json::json!({ "content": [] }));

    // Late reply discarded; next request still round-trips.
    let ping = {
        let session = session.clone();
        tokio::spawn(async move { session.ping().await })
    };
    let request = server.expect_request().await;
    server.reply(request.id, serde_json::json!({}));
    ping.await.unwrap().unwrap();
}

#[tokio::test]
async fn server_error_reply_reaches_only_that_caller() {
    let (session, mut server) = initialized_session().await;

    let read = {
        let session = session.clone();
        tokio::spawn(async move {
            session.send_request(
                Method::ResourcesRead,
                serde_json::json!({ "uri": "file:///missing" })
            ).await
        })
    };

    let request = server.expect_request().await;
    server.reply_error(request.id, -32002, "resource not found");

    match read.await.unwrap() {
        Err(Error::Protocol { code, message, .. }) => {
            assert_eq!(code, -32002);
            assert_eq!(message, "resource not found");
        }
        other => panic!("expected protocol error, got {:?}", other),
    }

    // A per-request error leaves the session Ready.
    assert_eq!(session.state(), SessionState::Ready);
}

#[tokio::test]
async fn observers_see_notifications_from_registration_onwards() {
    let (session, server) = initialized_session().await;

    let (early_tx, mut early_rx) = tokio::sync::mpsc::unbounded_channel();
    session.subscribe_notifications(move |n| {
        let tx = early_tx.clone();
        async move {
            tx.send(n).unwrap();
            Ok(())
        }
    }).await;

    server.notify("notifications/resources/updated", serde_json::json!({ "uri": "file:///x" }));

    let seen = timeout(Duration::from_secs(1), early_rx.recv()).await.unwrap().unwrap();
    assert_eq!(seen.method, "notifications/resources/updated");
    assert_eq!(seen.params.unwrap()["uri"], "file:///x");

    // A second observer registered now must not see the first notification.
    let (late_tx, mut late_rx) = tokio::sync::mpsc::unbounded_channel();
    session.subscribe_notifications(move |n| {
        let tx = late_tx.clone();
        async move {
            tx.send(n.method).unwrap();
            Ok(())
        }
    }).await;

    server.notify("notifications/tools/list_changed", serde_json::json!({}));

    let late_first = timeout(Duration::from_secs(1), late_rx.recv()).await.unwrap().unwrap();
    assert_eq!(late_first, "notifications/tools/list_changed");

    // The early observer saw both, exactly once each.
    let early_second = timeout(Duration::from_secs(1), early_rx.recv()).await.unwrap().unwrap();
    assert_eq!(early_second.method, "notifications/tools/list_changed");
    sleep(Duration::from_millis(50)).await;
    assert!(early_rx.try_recv().is_err());
    assert!(late_rx.try_recv().is_err());
}

#[tokio::test]
async fn server_death_aborts_all_waiters_and_closes_the_session() {
    let (session, mut server) = initialized_session().await;

    let ping = {
        let session = session.clone();
        tokio::spawn(async move { session.ping().await })
    };
    let tools = {
        let session = session.clone();
        tokio::spawn(async move { session.list_tools(None).await })
    };

    // Both requests are in flight when the server's output closes.
    server.expect_request().await;
    server.expect_request().await;
    server.hang_up();

    assert!(matches!(ping.await.unwrap(), Err(Error::TransportClosed)));
    assert!(matches!(tools.await.unwrap(), Err(Error::TransportClosed)));

    wait_for_state(&session, SessionState::Closed).await;

    // Later requests fail up front, writing nothing.
    let result = session.send_request(Method::Ping, serde_json::Value::Null).await;
    assert!(matches!(result, Err(Error::TransportClosed)));
    assert!(server.no_frames_written());

    // Close still works and is idempotent afterwards.
    assert!(session.close().await.unwrap().is_none());
    assert!(session.close().await.unwrap().is_none());
}

#[tokio::test]
async fn close_is_idempotent() {
    let (session, _server) = initialized_session().await;

    assert!(session.close().await.unwrap().is_none());
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.close().await.unwrap().is_none());

    let result = session.send_request(Method::Ping, serde_json::Value::Null).await;
    assert!(matches!(result, Err(Error::TransportClosed)));
}

#[tokio::test]
async fn failed_handshake_closes_the_session() {
    let (transport, mut server) = mock_transport();
    let session = std::sync::Arc::new(ClientSession::new(transport));

    let handshake = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };

    let request = server.expect_request().await;
    server.reply_error(request.id, -32600, "unsupported protocol version");

    match handshake.await.unwrap() {
        Err(Error::Protocol { code, .. }) => assert_eq!(code, -32600),
        other => panic!("expected protocol error, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::Closed);

    let result = session.send_request(Method::Ping, serde_json::Value::Null).await;
    assert!(matches!(result, Err(Error::TransportClosed)));
}

#[tokio::test]
async fn typed_surface_round_trips_params_and_results() {
    let (session, mut server) = initialized_session().await;

    let call = {
        let session = session.clone();
        tokio::spawn(async move {
            session.call_tool(CallToolParams {
                name: "echo".to_string(),
                arguments: Some(
                    [("text".to_string(), serde_json::json!("hi"))].into_iter().collect()
                ),
            }).await
        })
    };

    let request = server.expect_request().await;
    assert_eq!(request.method, "tools/call");
    let params = request.params.unwrap();
    assert_eq!(params["name"], "echo");
    assert_eq!(params["arguments"]["text"], "hi");

    server.reply(
        request.id,
        serde_json::json!({
            "content": [{ "type": "text", "text": "hi" }],
            "isError": false
        })
    );

    let result = call.await.unwrap().unwrap();
    assert_eq!(result.content.len(), 1);
    assert_eq!(result.is_error, Some(false));
}
