use super::*;

#[tokio::test]
async fn when_client_connects_then_version_check_names_its_connection() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let mut ws = ws_connect(addr).await;
    let handshake = ws_recv_server(&mut ws).await;

    match handshake {
        ServerMessage::VersionCheck {
            server_version,
            min_client_version,
            connection_id,
        } => {
            assert_eq!(server_version, tablerelay_shared::SERVER_VERSION);
            assert_eq!(min_client_version, tablerelay_shared::MIN_CLIENT_VERSION);
            assert!(!connection_id.is_nil());
        }
        other => panic!("expected VersionCheck, got {other:?}"),
    }

    server.abort();
}

#[tokio::test]
async fn when_player_syncs_then_joins_then_dm_sees_new_participant() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut dm_ws, _dm_id) = ws_connect_client(addr).await;
    let (mut player_ws, player_id) = ws_connect_client(addr).await;

    let code = create_session(&mut dm_ws).await;
    let _ = ws_expect_message(&mut dm_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::AssignDm)
    })
    .await;

    // Sync before joining: read-only snapshot.
    let snapshot = sync_session(&mut player_ws, &code).await;
    assert!(snapshot.session_exists);
    assert!(snapshot.has_dm);
    assert!(snapshot.tokens.is_empty());

    let joined = join_session(&mut player_ws, &code, "Mira").await;
    assert!(joined.joined);
    assert_eq!(joined.scene_reference, None);

    let announce = ws_expect_message(&mut dm_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::AddPlayer { .. })
    })
    .await;
    assert_eq!(
        announce,
        ServerMessage::AddPlayer {
            player: player_id.to_string(),
            player_name: Some("Mira".into()),
            initiative: None,
            initiative_modifier: None,
            is_dummy: false,
        }
    );

    // The newcomer prompts everyone to re-announce.
    let resync = ws_recv_server(&mut dm_ws).await;
    assert_eq!(resync, ServerMessage::SyncPlayerData);

    server.abort();
}

#[tokio::test]
async fn when_joining_unknown_session_then_not_found() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut ws, _) = ws_connect_client(addr).await;
    let result = ws_request(
        &mut ws,
        "join-missing",
        RequestPayload::JoinSession {
            session_code: "doesnotexist".into(),
            player_name: None,
            initiative: None,
            initiative_modifier: None,
        },
    )
    .await;

    assert_eq!(result.error_code(), Some(ErrorCode::NotFound));

    let snapshot = sync_session(&mut ws, "doesnotexist").await;
    assert!(!snapshot.session_exists);

    server.abort();
}

#[tokio::test]
async fn when_player_leaves_then_remaining_members_see_removal() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut dm_ws, _) = ws_connect_client(addr).await;
    let (mut player_ws, player_id) = ws_connect_client(addr).await;

    let code = create_session(&mut dm_ws).await;
    join_session(&mut player_ws, &code, "Mira").await;

    let result = ws_request(
        &mut player_ws,
        "leave",
        RequestPayload::LeaveSession {
            session_code: code.clone(),
        },
    )
    .await;
    assert!(result.data_as::<SessionLeft>().unwrap().left);

    let removal = ws_expect_message(&mut dm_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::RemovePlayer { .. })
    })
    .await;
    assert_eq!(
        removal,
        ServerMessage::RemovePlayer {
            player: player_id.to_string()
        }
    );

    server.abort();
}

#[tokio::test]
async fn when_solo_dm_disconnects_then_session_is_deleted() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state.clone()).await;

    let (mut dm_ws, _) = ws_connect_client(addr).await;
    let (mut observer_ws, _) = ws_connect_client(addr).await;

    let code = create_session(&mut dm_ws).await;
    assert_eq!(state.app.session_count().await, 1);

    dm_ws.close(None).await.unwrap();

    // Disconnect handling is asynchronous; poll until the session is gone.
    let deleted = tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            if !sync_session(&mut observer_ws, &code).await.session_exists {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(deleted.is_ok());
    assert_eq!(state.app.session_count().await, 0);

    server.abort();
}

#[tokio::test]
async fn when_request_is_malformed_then_it_is_ignored() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut ws, _) = ws_connect_client(addr).await;

    // No request_id: no reply continuation, so nothing is answered.
    ws.send(tokio_tungstenite::tungstenite::Message::Text(
        json!({"type": "Request", "payload": {"type": "CreateSession"}}).to_string(),
    ))
    .await
    .unwrap();

    ws_expect_no_message_matching(&mut ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::Response { .. })
    })
    .await;

    // The connection is still usable.
    ws_send_client(&mut ws, &ClientMessage::Heartbeat).await;
    let pong = ws_recv_server(&mut ws).await;
    assert_eq!(pong, ServerMessage::Pong);

    server.abort();
}
