//! 연결 핸들러

use crate::registry::ConnectionId;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// 새 연결 처리
pub fn handle_connection(state: &AppState, sender: UnboundedSender<String>) -> ConnectionId {
    let conn_id = state.connections.register(sender);
    tracing::info!(
        conn_id = %conn_id,
        connections = state.connections.len(),
        "New connection established"
    );
    conn_id
}

/// 연결 해제 처리
pub async fn handle_disconnect(state: &Arc<AppState>, conn_id: &str) {
    super::lifecycle::handle_leave(state, conn_id).await;
    tracing::info!(conn_id = %conn_id, "Connection closed");
}
