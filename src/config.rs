use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::clock::TimeControl;


#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumString, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UiVariant {
    // Move list, captured pieces, clock, promotion prompt.
    Full,
    // Board only. Promotion always picks a queen.
    Minimal,
}

impl UiVariant {
    pub fn has_clock(self) -> bool { self == UiVariant::Full }
    pub fn has_history(self) -> bool { self == UiVariant::Full }
    pub fn prompts_promotion(self) -> bool { self == UiVariant::Full }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub ui_variant: UiVariant,
    pub time_control: TimeControl,
    // Directory (or URL prefix) with piece images named like "wn.png".
    pub piece_dir: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            ui_variant: UiVariant::Full,
            time_control: TimeControl::default(),
            piece_dir: "static/pieces".to_owned(),
        }
    }
}
