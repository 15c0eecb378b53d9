//! 턴 진행 핸들러

use crate::broadcast::broadcast_all;
use crate::protocol::ServerMessage;
use crate::session::{Session, TurnSnapshot};
use crate::state::AppState;
use std::fmt;
use std::sync::Arc;

/// 턴을 넘기는 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    TurnEnd,
    DrawingTimeUp,
    AnsweringTimeUp,
    /// 서버 타이머 만료
    ServerTimeout,
}

impl fmt::Display for AdvanceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AdvanceReason::TurnEnd => "turn_end",
            AdvanceReason::DrawingTimeUp => "drawing_time_up",
            AdvanceReason::AnsweringTimeUp => "answering_time_up",
            AdvanceReason::ServerTimeout => "server_timeout",
        };
        f.write_str(reason)
    }
}

/// 게임 시작 처리
pub async fn handle_start(state: &Arc<AppState>, conn_id: &str) {
    let mut session = state.session.lock().await;
    let participants = session.participants.all();

    let start = match session.turns.start(participants, &mut rand::thread_rng()) {
        Ok(start) => start,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Start rejected");
            return;
        }
    };

    tracing::info!(
        conn_id = %conn_id,
        first_char = %start.first_char,
        turn_order = ?start.turn_order,
        "Round started"
    );

    broadcast_all(
        &state.connections,
        &ServerMessage::Start {
            first_char: start.first_char,
            turn_order: start.turn_order,
            round: start.round,
        },
    );
    announce_turn(state, &session, start.first_turn);
}

/// 턴 종료/시간 초과 처리. 턴 종료는 현재 차례인 참가자만 보낼 수 있다.
pub async fn handle_advance(state: &Arc<AppState>, conn_id: &str, reason: AdvanceReason) {
    let mut session = state.session.lock().await;

    if reason == AdvanceReason::TurnEnd {
        let sender = state.connections.participant_of(conn_id);
        let current = session.turns.current_turn();
        if sender.is_none() || sender.as_deref() != current {
            tracing::warn!(
                conn_id = %conn_id,
                sender = ?sender,
                current_turn = ?current,
                "Turn end from non-current player dropped"
            );
            return;
        }
    }

    advance_locked(state, &mut session, reason, Some(conn_id));
}

/// 그림 완료 알림. 턴은 넘기지 않는다.
pub fn handle_drawing_completed(conn_id: &str) {
    tracing::debug!(conn_id = %conn_id, "Drawing completed");
}

fn advance_locked(
    state: &Arc<AppState>,
    session: &mut Session,
    reason: AdvanceReason,
    conn_id: Option<&str>,
) {
    match session.turns.advance() {
        Ok(next) => {
            tracing::info!(
                conn_id = ?conn_id,
                reason = %reason,
                current_turn = %next.current_turn,
                round = next.round,
                "Turn advanced"
            );
            announce_turn(state, session, next);
        }
        Err(e) => {
            tracing::warn!(conn_id = ?conn_id, reason = %reason, error = %e, "Advance rejected");
        }
    }
}

/// `next_turn` 브로드캐스트 후 서버 타이머를 건다
pub(crate) fn announce_turn(state: &Arc<AppState>, session: &Session, next: TurnSnapshot) {
    broadcast_all(
        &state.connections,
        &ServerMessage::NextTurn {
            current_turn: next.current_turn,
            turn_order: next.turn_order,
            round: next.round,
        },
    );
    arm_turn_timer(state, session.turns.serial());
}

/// 서버 측 턴 타이머. 만료 시점까지 턴이 바뀌지 않았을 때만 넘긴다.
fn arm_turn_timer(state: &Arc<AppState>, serial: u64) {
    let Some(timeout) = state.config.game.turn_timeout else {
        return;
    };

    let state = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;

        let mut session = state.session.lock().await;
        if session.turns.serial() != serial {
            return;
        }
        advance_locked(&state, &mut session, AdvanceReason::ServerTimeout, None);
    });
}
