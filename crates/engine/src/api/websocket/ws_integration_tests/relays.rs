use super::*;

/// DM plus two players, all joined and drained of join traffic.
async fn table_of_three(addr: std::net::SocketAddr) -> (String, [(TestWs, Uuid); 3]) {
    let (mut dm_ws, dm_id) = ws_connect_client(addr).await;
    let (mut p1_ws, p1_id) = ws_connect_client(addr).await;
    let (mut p2_ws, p2_id) = ws_connect_client(addr).await;

    let code = create_session(&mut dm_ws).await;
    join_session(&mut p1_ws, &code, "Mira").await;
    join_session(&mut p2_ws, &code, "Tobin").await;

    // Heartbeat round-trips flush earlier roster traffic.
    for ws in [&mut dm_ws, &mut p1_ws, &mut p2_ws] {
        ws_send_client(ws, &ClientMessage::Heartbeat).await;
        let _ = ws_expect_message(ws, RECV_TIMEOUT, |m| matches!(m, ServerMessage::Pong)).await;
    }

    (code, [(dm_ws, dm_id), (p1_ws, p1_id), (p2_ws, p2_id)])
}

#[tokio::test]
async fn when_player_publishes_scene_then_nothing_is_relayed() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;
    let (code, [(mut dm_ws, _), (mut p1_ws, _), (mut p2_ws, _)]) = table_of_three(addr).await;

    ws_send_client(
        &mut p1_ws,
        &ClientMessage::LoadMap {
            session_code: code.clone(),
            url: "https://maps.example/hijack.png".into(),
        },
    )
    .await;

    for ws in [&mut dm_ws, &mut p2_ws] {
        ws_expect_no_message_matching(ws, QUIET_PERIOD, |m| {
            matches!(m, ServerMessage::LoadMap { .. })
        })
        .await;
    }
    assert_eq!(sync_session(&mut p1_ws, &code).await.scene_reference, None);

    server.abort();
}

#[tokio::test]
async fn when_player_edits_sheet_then_only_dm_receives_it() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;
    let (code, [(mut dm_ws, _), (mut p1_ws, p1_id), (mut p2_ws, _)]) = table_of_three(addr).await;

    let sheet = json!({"name": "Mira", "str": 14, "dex": 17});
    ws_send_client(
        &mut p1_ws,
        &ClientMessage::UpdateSheet {
            session_code: code.clone(),
            sheet: sheet.clone(),
        },
    )
    .await;

    let update = ws_expect_message(&mut dm_ws, RECV_TIMEOUT, |m| {
        matches!(m, ServerMessage::SheetUpdated { .. })
    })
    .await;
    assert_eq!(
        update,
        ServerMessage::SheetUpdated {
            player: p1_id,
            sheet
        }
    );
    ws_expect_no_message_matching(&mut p2_ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::SheetUpdated { .. })
    })
    .await;

    server.abort();
}

#[tokio::test]
async fn when_dm_publishes_tokens_then_players_receive_snapshot() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;
    let (code, [(mut dm_ws, _), (mut p1_ws, _), (mut p2_ws, _)]) = table_of_three(addr).await;

    let tokens = vec![
        json!({"id": "t1", "x": 4, "y": 2}),
        json!({"id": "t2", "x": 0, "y": 7}),
    ];
    ws_send_client(
        &mut dm_ws,
        &ClientMessage::PublishTokens {
            session_code: code.clone(),
            tokens: tokens.clone(),
        },
    )
    .await;

    for ws in [&mut p1_ws, &mut p2_ws] {
        let update = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::TokensUpdated { .. })
        })
        .await;
        assert_eq!(
            update,
            ServerMessage::TokensUpdated {
                tokens: tokens.clone()
            }
        );
    }
    assert_eq!(sync_session(&mut p2_ws, &code).await.tokens, tokens);

    server.abort();
}

#[tokio::test]
async fn when_dm_adds_dummy_then_players_see_dummy_participant() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;
    let (code, [(mut dm_ws, _), (mut p1_ws, _), (mut p2_ws, _)]) = table_of_three(addr).await;

    ws_send_client(
        &mut dm_ws,
        &ClientMessage::AddDummy {
            session_code: code.clone(),
            dummy_id: "owlbear".into(),
            name: "Owlbear".into(),
            initiative_modifier: Some(json!(1)),
        },
    )
    .await;

    for ws in [&mut p1_ws, &mut p2_ws] {
        let added = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::AddPlayer { is_dummy: true, .. })
        })
        .await;
        assert_eq!(
            added,
            ServerMessage::AddPlayer {
                player: "owlbear".into(),
                player_name: Some("Owlbear".into()),
                initiative: None,
                initiative_modifier: Some(json!(1)),
                is_dummy: true,
            }
        );
    }

    server.abort();
}

#[tokio::test]
async fn when_player_updates_own_initiative_then_table_sees_it() {
    let state = build_test_state(EngineSettings::default());
    let (addr, server) = spawn_ws_server(state).await;
    let (code, [(mut dm_ws, _), (mut p1_ws, p1_id), (mut p2_ws, _)]) = table_of_three(addr).await;

    ws_send_client(
        &mut p1_ws,
        &ClientMessage::UpdateInitiative {
            session_code: code.clone(),
            player: p1_id.to_string(),
            initiative: json!(19),
        },
    )
    .await;

    for ws in [&mut dm_ws, &mut p2_ws] {
        let update = ws_expect_message(ws, RECV_TIMEOUT, |m| {
            matches!(m, ServerMessage::InitiativeUpdated { .. })
        })
        .await;
        assert_eq!(
            update,
            ServerMessage::InitiativeUpdated {
                player: p1_id.to_string(),
                initiative: json!(19)
            }
        );
    }

    // Someone else's initiative is not theirs to change.
    ws_send_client(
        &mut p2_ws,
        &ClientMessage::UpdateInitiative {
            session_code: code,
            player: p1_id.to_string(),
            initiative: json!(1),
        },
    )
    .await;
    ws_expect_no_message_matching(&mut dm_ws, QUIET_PERIOD, |m| {
        matches!(m, ServerMessage::InitiativeUpdated { .. })
    })
    .await;

    server.abort();
}
