//! 클라이언트-서버 메시지 프로토콜 정의

use crate::error::ProtocolError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 세션 로직이 직접 처리하는 메시지 타입. 나머지는 게임 이벤트로 중계된다.
pub const CONTROL_TYPES: &[&str] = &[
    "join",
    "start",
    "turn_end",
    "end_turn",
    "drawing_time_up",
    "answering_time_up",
    "drawing_completed",
    "image_sended",
];

/// 클라이언트 → 서버 제어 메시지
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    // Session
    Join {
        #[serde(deserialize_with = "participant_id")]
        id: String,
    },

    // Turn
    Start,
    #[serde(alias = "end_turn")]
    TurnEnd,
    DrawingTimeUp,
    AnsweringTimeUp,
    DrawingCompleted,

    // Relay
    ImageSended {
        #[serde(rename = "imageData")]
        image_data: Value,
    },
}

/// 기록 후 전체 중계되는 게임 이벤트 (paint, undo, redo, chat ...)
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    pub kind: String,
    pub payload: Value,
    /// 수신한 원본 텍스트. 수정 없이 그대로 전달한다.
    pub raw: String,
}

/// 파싱된 수신 프레임
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Control(ClientMessage),
    Event(GameEvent),
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let payload: Value = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;
        let kind = payload
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_string();

        if CONTROL_TYPES.contains(&kind.as_str()) {
            let message = ClientMessage::deserialize(&payload)
                .map_err(|source| ProtocolError::InvalidPayload { kind, source })?;
            return Ok(Inbound::Control(message));
        }

        Ok(Inbound::Event(GameEvent {
            kind,
            payload,
            raw: text.to_string(),
        }))
    }
}

/// 서버 → 클라이언트 메시지
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    // Session
    Init {
        players: Vec<String>,
        history: Vec<Value>,
    },
    Join {
        id: String,
    },
    Leave {
        id: Option<String>,
    },
    PlayerCountUpdate {
        count: usize,
    },

    // Turn
    #[serde(rename_all = "camelCase")]
    Start {
        first_char: char,
        turn_order: Vec<String>,
        round: u32,
    },
    #[serde(rename_all = "camelCase")]
    NextTurn {
        current_turn: String,
        turn_order: Vec<String>,
        round: u32,
    },

    // Relay
    #[serde(rename_all = "camelCase")]
    ImageSended {
        image_data: Value,
    },
}

/// 참가자 ID는 문자열 또는 숫자로 올 수 있다
fn participant_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "participant id must be a string or number, got {other}"
        ))),
    }
}
