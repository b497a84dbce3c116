use serde::{Deserialize, Serialize};

use crate::movecode::MoveCode;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAuthor {
    Local,
    Engine,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct HistoryEntry {
    pub move_code: MoveCode,
    pub notation: String,
    pub author: MoveAuthor,
}

// Moves of the current session. Only grows during play; undo takes back one full move (the
// player's and the engine's), new game starts over.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MoveHistory {
    entries: Vec<HistoryEntry>,
}

impl MoveHistory {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> &[HistoryEntry] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn last(&self) -> Option<&HistoryEntry> { self.entries.last() }

    pub fn push(&mut self, entry: HistoryEntry) { self.entries.push(entry); }

    pub fn undo(&mut self) {
        let len = self.entries.len().saturating_sub(2);
        self.entries.truncate(len);
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    // Rows of the move list: "1. e4 e5", "2. Nf3". Games always start from the initial position,
    // so even entries are white moves.
    pub fn numbered_rows(&self) -> Vec<String> {
        self.entries
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| {
                let moves: Vec<&str> = pair.iter().map(|e| e.notation.as_str()).collect();
                format!("{}. {}", i + 1, moves.join(" "))
            })
            .collect()
    }
}
