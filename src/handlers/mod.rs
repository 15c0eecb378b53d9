//! 핸들러 모듈

pub mod connection;
pub mod events;
pub mod lifecycle;
pub mod turn;

pub use connection::*;
pub use events::*;
pub use lifecycle::*;
pub use turn::*;

use crate::protocol::{ClientMessage, Inbound};
use crate::state::AppState;
use std::sync::Arc;

/// 메시지 타입별 분기
pub async fn handle_inbound(state: &Arc<AppState>, conn_id: &str, msg: Inbound) {
    match msg {
        Inbound::Control(ClientMessage::Join { id }) => {
            handle_join(state, conn_id, &id).await;
        }
        Inbound::Control(ClientMessage::Start) => {
            handle_start(state, conn_id).await;
        }
        Inbound::Control(ClientMessage::TurnEnd) => {
            handle_advance(state, conn_id, AdvanceReason::TurnEnd).await;
        }
        Inbound::Control(ClientMessage::DrawingTimeUp) => {
            handle_advance(state, conn_id, AdvanceReason::DrawingTimeUp).await;
        }
        Inbound::Control(ClientMessage::AnsweringTimeUp) => {
            handle_advance(state, conn_id, AdvanceReason::AnsweringTimeUp).await;
        }
        Inbound::Control(ClientMessage::DrawingCompleted) => {
            handle_drawing_completed(conn_id);
        }
        Inbound::Control(ClientMessage::ImageSended { image_data }) => {
            handle_image(state, conn_id, image_data).await;
        }
        Inbound::Event(event) => {
            handle_game_event(state, conn_id, event).await;
        }
    }
}
