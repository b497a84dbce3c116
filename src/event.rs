// Messages exchanged with the game server. Every message is a JSON object of the form
//   {"event": "<name>", "data": {...}}
//
// Inbound payloads keep positions, move codes and outcome tags as strings: a value that cannot be
// decoded must only invalidate its own field, not the whole message.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::force::Force;


pub const MIN_SEARCH_DEPTH: u32 = 1;
pub const MAX_SEARCH_DEPTH: u32 = 8;
pub const MIN_ENGINE_TIME_SECS: u32 = 1;
pub const MAX_ENGINE_TIME_SECS: u32 = 30;

#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumString, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameAction {
    Undo,
    NewGame,
    Flip,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Move {
        #[serde(rename = "move")]
        move_code: String,
    },
    SelectColor {
        color: Force,
    },
    GameAction {
        action: GameAction,
    },
    SetDepth {
        depth: u32,
    },
    // Engine thinking time, in seconds.
    UpdateTime {
        time: u32,
    },
}

// Reply to `ClientEvent::Move`. When the move is accepted and the game goes on, the server also
// makes the engine move, so `fen` and `moves` describe the position after the engine reply.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveResponse {
    pub valid: bool,
    pub message: Option<String>,
    pub fen: Option<String>,
    pub moves: Option<Vec<String>>,
    pub check: Option<bool>,
    pub game_over: Option<bool>,
    pub outcome: Option<String>,
    pub last_move: Option<String>,
    pub engine_move: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    // A move was applied without being requested by this client (e.g. the engine opened the game
    // after the player picked black).
    MoveMade {
        #[serde(default)]
        fen: Option<String>,
        #[serde(default, rename = "move")]
        move_code: Option<String>,
    },
    MoveResponse(MoveResponse),
    BoardUpdate {
        action: GameAction,
        #[serde(default)]
        fen: Option<String>,
    },
    TimeUpdated {
        time: u32,
    },
    DepthUpdated {
        depth: u32,
    },
}

// Full authoritative state, as returned by the status endpoint.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub fen: String,
    #[serde(default)]
    pub moves: Vec<String>,
    pub turn: Force,
    #[serde(default)]
    pub player_color: Option<Force>,
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_game_over: bool,
    #[serde(default)]
    pub outcome: Option<String>,
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn client_event_wire_format() {
        let event = ClientEvent::Move { move_code: "e2e4".to_owned() };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"move","data":{"move":"e2e4"}}"#
        );
        let event = ClientEvent::GameAction { action: GameAction::NewGame };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"event":"game_action","data":{"action":"new_game"}}"#
        );
    }

    #[test]
    fn move_response_tolerates_missing_fields() {
        let event: ServerEvent = serde_json::from_str(
            r#"{"event":"move_response","data":{"valid":false,"message":"Illegal move"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ServerEvent::MoveResponse(MoveResponse {
                valid: false,
                message: Some("Illegal move".to_owned()),
                ..MoveResponse::default()
            })
        );
    }

    #[test]
    fn board_update_without_position() {
        let event: ServerEvent =
            serde_json::from_str(r#"{"event":"board_update","data":{"action":"flip"}}"#).unwrap();
        assert_eq!(event, ServerEvent::BoardUpdate { action: GameAction::Flip, fen: None });
    }
}
