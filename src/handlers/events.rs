//! 게임 이벤트 중계 핸들러

use crate::broadcast::{broadcast_except, broadcast_raw};
use crate::protocol::{GameEvent, ServerMessage};
use crate::state::AppState;
use serde_json::Value;

/// 그림 이미지 중계. 보낸 쪽에는 다시 보내지 않는다.
pub async fn handle_image(state: &AppState, conn_id: &str, image_data: Value) {
    let _session = state.session.lock().await;
    let delivered = broadcast_except(
        &state.connections,
        &ServerMessage::ImageSended { image_data },
        conn_id,
    );
    tracing::debug!(from = %conn_id, delivered = delivered, "Relayed image");
}

/// paint, undo, redo, 채팅 등. 기록에 남기고 원본 그대로 모두에게 전달한다.
pub async fn handle_game_event(state: &AppState, conn_id: &str, event: GameEvent) {
    let mut session = state.session.lock().await;
    session.history.append(event.payload);
    let delivered = broadcast_raw(&state.connections, &event.raw, None);
    tracing::debug!(
        from = %conn_id,
        kind = %event.kind,
        history_len = session.history.len(),
        delivered = delivered,
        "Relayed game event"
    );
}
