use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::force::Force;


// How a game ended. All tags except `Timeout` come from the server; `Timeout` is declared by the
// client when a local clock runs out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumString, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Checkmate,
    Stalemate,
    Draw,
    InsufficientMaterial,
    #[strum(to_string = "fifty_moves", serialize = "seventyfive_moves")]
    #[serde(alias = "seventyfive_moves")]
    FiftyMoves,
    #[strum(to_string = "threefold_repetition", serialize = "fivefold_repetition")]
    #[serde(alias = "fivefold_repetition")]
    ThreefoldRepetition,
    Timeout,
}

impl Outcome {
    pub fn is_draw(self) -> bool {
        match self {
            Outcome::Checkmate | Outcome::Timeout => false,
            Outcome::Stalemate
            | Outcome::Draw
            | Outcome::InsufficientMaterial
            | Outcome::FiftyMoves
            | Outcome::ThreefoldRepetition => true,
        }
    }

    // `loser` is the side that was mated or flagged. Ignored for draws.
    pub fn ui_string(self, loser: Force) -> String {
        let winner = loser.opponent().title();
        match self {
            Outcome::Checkmate => format!("Checkmate! {winner} wins."),
            Outcome::Timeout => format!("{} ran out of time. {winner} wins.", loser.title()),
            Outcome::Stalemate => "Draw by stalemate.".to_owned(),
            Outcome::Draw => "Draw.".to_owned(),
            Outcome::InsufficientMaterial => "Draw by insufficient material.".to_owned(),
            Outcome::FiftyMoves => "Draw by the move-count rule.".to_owned(),
            Outcome::ThreefoldRepetition => "Draw by repetition.".to_owned(),
        }
    }
}
