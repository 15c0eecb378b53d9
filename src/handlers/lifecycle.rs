//! 입장/퇴장 핸들러

use crate::broadcast::{broadcast_all, send_to};
use crate::protocol::ServerMessage;
use crate::session::Session;
use crate::state::AppState;
use std::sync::Arc;

/// 입장 처리
pub async fn handle_join(state: &Arc<AppState>, conn_id: &str, participant: &str) {
    let mut session = state.session.lock().await;

    let newly_added = session.participants.add(participant);

    // 같은 ID로 다시 들어오면 마지막 연결이 ID를 가져간다. 이전 연결은 열린 채로 남는다.
    for other in state.connections.connections_of(participant) {
        if other != conn_id {
            state.connections.dissociate(&other);
            tracing::info!(
                conn_id = %other,
                participant = %participant,
                "Connection orphaned by rejoin"
            );
        }
    }

    // 한 연결이 다른 ID로 다시 입장하면 이전 ID는 퇴장으로 처리
    if let Some(previous) = state.connections.associate(conn_id, participant) {
        if previous != participant {
            tracing::info!(
                conn_id = %conn_id,
                previous = %previous,
                participant = %participant,
                "Connection switched participant"
            );
            depart(state, &mut session, &previous);
        }
    }

    send_to(
        &state.connections,
        conn_id,
        &ServerMessage::Init {
            players: session.participants.all(),
            history: session.history.snapshot(),
        },
    );

    broadcast_all(
        &state.connections,
        &ServerMessage::Join {
            id: participant.to_string(),
        },
    );
    broadcast_all(
        &state.connections,
        &ServerMessage::PlayerCountUpdate {
            count: session.participants.count(),
        },
    );

    tracing::info!(
        conn_id = %conn_id,
        participant = %participant,
        newly_added = newly_added,
        player_count = session.participants.count(),
        "Participant joined"
    );
}

/// 연결 종료 시 퇴장 처리
pub async fn handle_leave(state: &Arc<AppState>, conn_id: &str) {
    let mut session = state.session.lock().await;

    let participant = state.connections.dissociate(conn_id);
    if let Some(conn) = state.connections.unregister(conn_id) {
        tracing::debug!(
            conn_id = %conn_id,
            connected_for = ?conn.connected_at.elapsed(),
            "Connection unregistered"
        );
    }

    match participant {
        Some(participant) => depart(state, &mut session, &participant),
        None => tracing::debug!(conn_id = %conn_id, "Connection closed without a participant"),
    }
}

/// 참가자 제거, 알림, 마지막 참가자였다면 세션 초기화
fn depart(state: &Arc<AppState>, session: &mut Session, participant: &str) {
    session.participants.remove(participant);
    let passed_turn = session.turns.remove_participant(participant);

    broadcast_all(
        &state.connections,
        &ServerMessage::PlayerCountUpdate {
            count: session.participants.count(),
        },
    );
    broadcast_all(
        &state.connections,
        &ServerMessage::Leave {
            id: Some(participant.to_string()),
        },
    );

    tracing::info!(
        participant = %participant,
        remaining = session.participants.count(),
        "Participant left"
    );

    if session.participants.is_empty() {
        session.reset();
        tracing::info!("Last participant left, session reset");
        return;
    }

    if let Some(next) = passed_turn {
        tracing::info!(
            departed = %participant,
            current_turn = %next.current_turn,
            round = next.round,
            "Turn passed after departure"
        );
        super::turn::announce_turn(state, session, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handlers::connection::handle_connection;
    use crate::session::TurnPhase;
    use serde_json::{json, Value};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(Config::default()))
    }

    fn connect(state: &AppState) -> (String, UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (handle_connection(state, tx), rx)
    }

    fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(serde_json::from_str(&frame).unwrap());
        }
        frames
    }

    #[tokio::test]
    async fn join_sends_init_then_join_and_count() {
        let state = state();
        let (a, mut rx_a) = connect(&state);

        handle_join(&state, &a, "alice").await;

        assert_eq!(
            drain(&mut rx_a),
            vec![
                json!({"type": "init", "players": ["alice"], "history": []}),
                json!({"type": "join", "id": "alice"}),
                json!({"type": "player_count_update", "count": 1}),
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_join_is_idempotent() {
        let state = state();
        let (a, mut rx_a) = connect(&state);

        handle_join(&state, &a, "alice").await;
        handle_join(&state, &a, "alice").await;

        assert_eq!(state.session.lock().await.participants.count(), 1);
        let frames = drain(&mut rx_a);
        let init = frames.iter().filter(|f| f["type"] == "init").last().unwrap();
        assert_eq!(init["players"], json!(["alice"]));
        assert!(frames
            .iter()
            .filter(|f| f["type"] == "player_count_update")
            .all(|f| f["count"] == 1));
    }

    #[tokio::test]
    async fn late_joiner_receives_full_history_in_order() {
        let state = state();
        let (a, _rx_a) = connect(&state);
        handle_join(&state, &a, "alice").await;
        {
            let mut session = state.session.lock().await;
            for i in 0..4 {
                session.history.append(json!({"type": "paint", "seq": i}));
            }
        }

        let (b, mut rx_b) = connect(&state);
        handle_join(&state, &b, "bob").await;

        let init = drain(&mut rx_b).remove(0);
        assert_eq!(init["type"], "init");
        assert_eq!(
            init["history"],
            json!([
                {"type": "paint", "seq": 0},
                {"type": "paint", "seq": 1},
                {"type": "paint", "seq": 2},
                {"type": "paint", "seq": 3},
            ])
        );
        let mut players: Vec<String> =
            serde_json::from_value(init["players"].clone()).unwrap();
        players.sort();
        assert_eq!(players, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn leave_broadcasts_count_and_departed_id() {
        let state = state();
        let (a, _rx_a) = connect(&state);
        let (b, mut rx_b) = connect(&state);
        handle_join(&state, &a, "alice").await;
        handle_join(&state, &b, "bob").await;
        drain(&mut rx_b);

        handle_leave(&state, &a).await;

        assert_eq!(
            drain(&mut rx_b),
            vec![
                json!({"type": "player_count_update", "count": 1}),
                json!({"type": "leave", "id": "alice"}),
            ]
        );
        assert_eq!(state.connections.len(), 1);
    }

    #[tokio::test]
    async fn leave_without_join_is_pure_cleanup() {
        let state = state();
        let (a, _rx_a) = connect(&state);
        let (b, mut rx_b) = connect(&state);
        handle_join(&state, &b, "bob").await;
        drain(&mut rx_b);

        handle_leave(&state, &a).await;

        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(state.connections.len(), 1);
        assert_eq!(state.session.lock().await.participants.count(), 1);
    }

    #[tokio::test]
    async fn last_leave_resets_session() {
        let state = state();
        let (a, _rx_a) = connect(&state);
        let (b, _rx_b) = connect(&state);
        handle_join(&state, &a, "alice").await;
        handle_join(&state, &b, "bob").await;
        {
            let mut session = state.session.lock().await;
            session.history.append(json!({"type": "paint"}));
            session.turns.begin(vec!["alice".into(), "bob".into()], 'x');
        }

        handle_leave(&state, &a).await;
        handle_leave(&state, &b).await;

        {
            let session = state.session.lock().await;
            assert!(session.is_pristine());
            assert_eq!(session.turns.phase(), TurnPhase::Idle);
        }

        let (c, mut rx_c) = connect(&state);
        handle_join(&state, &c, "carol").await;
        assert_eq!(
            drain(&mut rx_c)[0],
            json!({"type": "init", "players": ["carol"], "history": []})
        );
    }

    #[tokio::test]
    async fn rejoin_with_same_id_orphans_previous_connection() {
        let state = state();
        let (old, _rx_old) = connect(&state);
        let (new, _rx_new) = connect(&state);
        let (other, mut rx_other) = connect(&state);
        handle_join(&state, &old, "alice").await;
        handle_join(&state, &other, "bob").await;
        handle_join(&state, &new, "alice").await;

        assert_eq!(state.connections.participant_of(&old), None);
        assert_eq!(state.connections.participant_of(&new).as_deref(), Some("alice"));
        drain(&mut rx_other);

        // 고아가 된 연결이 닫혀도 alice는 남아 있다
        handle_leave(&state, &old).await;
        assert!(drain(&mut rx_other).is_empty());
        assert!(state.session.lock().await.participants.contains("alice"));
    }

    #[tokio::test]
    async fn departure_of_current_player_announces_next_turn() {
        let state = state();
        let (a, _rx_a) = connect(&state);
        let (b, mut rx_b) = connect(&state);
        handle_join(&state, &a, "alice").await;
        handle_join(&state, &b, "bob").await;
        state
            .session
            .lock()
            .await
            .turns
            .begin(vec!["alice".into(), "bob".into()], 'm');
        drain(&mut rx_b);

        handle_leave(&state, &a).await;

        let frames = drain(&mut rx_b);
        assert_eq!(
            frames.last().unwrap(),
            &json!({"type": "next_turn", "currentTurn": "bob", "turnOrder": ["bob"], "round": 1})
        );
    }
}
