use super::*;

#[tokio::test]
async fn when_dm_disconnects_then_first_remaining_member_becomes_dm() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut a_ws, a_id) = ws_connect_client(addr).await;
    let (mut b_ws, b_id) = ws_connect_client(addr).await;
    let (mut c_ws, _c_id) = ws_connect_client(addr).await;

    let code = create_session(&mut a_ws).await;
    join_session(&mut b_ws, &code, "Bryn").await;
    join_session(&mut c_ws, &code, "Cato").await;

    a_ws.close(None).await.unwrap();

    // B joined first, so B is promoted.
    let _ = ws_expect_message(&mut b_ws, RECV_TIMEOUT, |m| matches!(m, ServerMessage::AssignDm)).await;
    let _ = ws_expect_message(&mut b_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::RemovePlayer { player } if *player == a_id.to_string())
    })
    .await;

    // C observes vacancy, reassignment, re-sync, then the departure.
    assert_eq!(
        ws_recv_server(&mut c_ws).await,
        ServerMessage::DmRemoved { previous: a_id }
    );
    assert_eq!(
        ws_recv_server(&mut c_ws).await,
        ServerMessage::DmAssigned { dm: b_id }
    );
    assert_eq!(ws_recv_server(&mut c_ws).await, ServerMessage::SyncPlayerData);
    assert_eq!(
        ws_recv_server(&mut c_ws).await,
        ServerMessage::RemovePlayer {
            player: a_id.to_string()
        }
    );

    let snapshot = sync_session(&mut c_ws, &code).await;
    assert!(snapshot.has_dm);

    server.abort();
}

#[tokio::test]
async fn when_dm_hands_off_then_new_dm_publishes_scene() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;

    let (mut x_ws, _x_id) = ws_connect_client(addr).await;
    let (mut y_ws, y_id) = ws_connect_client(addr).await;
    let (mut z_ws, _z_id) = ws_connect_client(addr).await;

    let code = create_session(&mut x_ws).await;
    join_session(&mut y_ws, &code, "Yara").await;
    join_session(&mut z_ws, &code, "Zed").await;

    ws_send_client(
        &mut x_ws,
        &ClientMessage::TransferDm {
            session_code: code.clone(),
            player: y_id,
        },
    )
    .await;
    let _ = ws_expect_message(&mut y_ws, RECV_TIMEOUT, |m| matches!(m, ServerMessage::AssignDm)).await;
    let _ = ws_expect_message(&mut z_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::DmAssigned { dm } if *dm == y_id)
    })
    .await;

    let url = "https://maps.example/tavern.png";
    ws_send_client(
        &mut y_ws,
        &ClientMessage::LoadMap {
            session_code: code.clone(),
            url: url.to_string(),
        },
    )
    .await;

    for ws in [&mut x_ws, &mut z_ws] {
        let loaded = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::LoadMap { .. })
        })
        .await;
        assert_eq!(loaded, ServerMessage::LoadMap { url: url.to_string() });
    }
    ws_expect_no_message_matching(&mut y_ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::LoadMap { .. })
    })
    .await;

    let snapshot = sync_session(&mut z_ws, &code).await;
    assert_eq!(snapshot.scene_reference.as_deref(), Some(url));

    server.abort();
}

#[tokio::test]
async fn when_reassignment_is_disabled_then_member_claims_vacant_slot() {
    let settings = EngineSettings {
        auto_reassign_dm: false,
        ..EngineSettings::default()
    };
    let state = build_test_state(settings);
    let (addr, server) = spawn_ws_server(state).await;

    let (mut a_ws, a_id) = ws_connect_client(addr).await;
    let (mut b_ws, b_id) = ws_connect_client(addr).await;

    let code = create_session(&mut a_ws).await;
    join_session(&mut b_ws, &code, "Bryn").await;

    let claim = || RequestPayload::ClaimDm {
        session_code: code.clone(),
    };
    let conflict = ws_request(&mut b_ws, "claim-1", claim()).await;
    assert_eq!(conflict.error_code(), Some(ErrorCode::Conflict));

    a_ws.close(None).await.unwrap();
    let _ = ws_expect_message(&mut b_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::DmRemoved { previous } if *previous == a_id)
    })
    .await;
    assert!(!sync_session(&mut b_ws, &code).await.has_dm);

    let claimed = ws_request(&mut b_ws, "claim-2", claim()).await;
    assert_eq!(
        claimed.data_as::<tablerelay_shared::DmClaimed>().unwrap().dm,
        b_id
    );
    let _ = ws_expect_message(&mut b_ws, RECV_TIMEOUT, |m| matches!(m, ServerMessage::AssignDm)).await;

    server.abort();
}
