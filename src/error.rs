//! 에러 타입

use thiserror::Error;

/// 세션 상태 전이 에러. 핸들러에서 로그만 남기고 버린다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no active round")]
    NotActive,
    #[error("a round is already in progress")]
    AlreadyActive,
    #[error("cannot start a round without participants")]
    NoParticipants,
    #[error("turn order is empty")]
    EmptyTurnOrder,
}

/// 수신 메시지 파싱 에러
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("message has no string `type` field")]
    MissingType,
    #[error("invalid `{kind}` payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
