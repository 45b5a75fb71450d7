//! Transcript：一次运行内 (动作, 观察) 的有序日志
//!
//! 只追加，不重排、不原地修改；由循环独占持有，会话结束即丢弃。

use crate::agent::AgentAction;

/// 一条记录：已执行的动作与得到的观察
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub action: AgentAction,
    pub observation: String,
}

/// 只追加的记录序列
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: AgentAction, observation: String) {
        self.entries.push(TranscriptEntry {
            action,
            observation,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
