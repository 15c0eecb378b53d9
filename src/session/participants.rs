//! 참가자 집합

use std::collections::HashSet;

/// 현재 입장한 참가자 ID 집합. 같은 ID는 한 번만 존재한다.
#[derive(Debug, Default)]
pub struct ParticipantSet {
    ids: HashSet<String>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새로 추가되었으면 true
    pub fn add(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn all(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
