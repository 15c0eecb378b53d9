//! 브로드캐스트 디스패처
//!
//! 열린 연결에만 보낸다. 닫힌 연결이나 전송 실패는 건너뛰고 나머지에게 계속 보낸다.

use crate::protocol::ServerMessage;
use crate::registry::ConnectionRegistry;

/// 모든 열린 연결에 전송. 실제로 보낸 수를 돌려준다.
pub fn broadcast_all(registry: &ConnectionRegistry, message: &ServerMessage) -> usize {
    match encode(message) {
        Some(frame) => broadcast_raw(registry, &frame, None),
        None => 0,
    }
}

/// 한 연결을 제외하고 전송
pub fn broadcast_except(
    registry: &ConnectionRegistry,
    message: &ServerMessage,
    excluded: &str,
) -> usize {
    match encode(message) {
        Some(frame) => broadcast_raw(registry, &frame, Some(excluded)),
        None => 0,
    }
}

/// 이미 직렬화된 프레임을 그대로 전송 (중계 이벤트용)
pub fn broadcast_raw(registry: &ConnectionRegistry, frame: &str, excluded: Option<&str>) -> usize {
    let mut delivered = 0;
    for conn in registry.live_connections() {
        if excluded == Some(conn.id.as_str()) {
            continue;
        }
        if conn.send(frame) {
            delivered += 1;
        } else {
            tracing::debug!(conn_id = %conn.id, "Skipped closed connection");
        }
    }
    delivered
}

/// 특정 연결에만 전송
pub fn send_to(registry: &ConnectionRegistry, conn_id: &str, message: &ServerMessage) -> bool {
    let Some(conn) = registry.get(conn_id) else {
        return false;
    };
    encode(message).is_some_and(|frame| conn.send(&frame))
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize server message");
            None
        }
    }
}
