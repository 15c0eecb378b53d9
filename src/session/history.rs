//! 이벤트 기록
//!
//! 늦게 들어온 참가자에게 그대로 재생하는 append-only 로그.

use serde_json::Value;

/// 세션 초기화 때만 비워진다. 개별 항목은 삭제하지 않는다.
#[derive(Debug, Default)]
pub struct EventHistory {
    events: Vec<Value>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Value) {
        self.events.push(event);
    }

    /// 마지막 초기화 이후의 모든 이벤트 (추가 순서)
    pub fn snapshot(&self) -> Vec<Value> {
        self.events.clone()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
