// Terminal input line -> client command. Squares act like clicks: "e2" then "e4".

use worstchess::coord::Coord;
use worstchess::event::GameAction;
use worstchess::force::Force;
use worstchess::piece::PieceKind;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConsoleCommand {
    Square(Coord),
    SelectColor(Force),
    Action(GameAction),
    Depth(u32),
    EngineTime(u32),
    Promote(PieceKind),
    Cancel,
    Quit,
}

pub fn parse_command(input: &str) -> Result<ConsoleCommand, String> {
    let input = input.trim();
    let Some(cmd) = input.strip_prefix('/') else {
        return Coord::from_algebraic(&input.to_ascii_lowercase())
            .map(ConsoleCommand::Square)
            .ok_or_else(|| format!("Not a square: '{input}'"));
    };
    let (name, arg) = match cmd.split_once(' ') {
        Some((name, arg)) => (name, Some(arg.trim())),
        None => (cmd, None),
    };
    let number = || -> Result<u32, String> {
        let arg = arg.ok_or_else(|| format!("Command '/{name}' needs a number"))?;
        arg.parse().map_err(|_| format!("Not a number: '{arg}'"))
    };
    Ok(match name {
        "white" => ConsoleCommand::SelectColor(Force::White),
        "black" => ConsoleCommand::SelectColor(Force::Black),
        "undo" => ConsoleCommand::Action(GameAction::Undo),
        "new" => ConsoleCommand::Action(GameAction::NewGame),
        "flip" => ConsoleCommand::Action(GameAction::Flip),
        "depth" => ConsoleCommand::Depth(number()?),
        "time" => ConsoleCommand::EngineTime(number()?),
        "q" | "r" | "b" | "n" => {
            let letter = name.chars().next().unwrap_or('q');
            match PieceKind::from_promotion_letter(letter) {
                Some(kind) => ConsoleCommand::Promote(kind),
                None => return Err(format!("Unknown command: '/{name}'")),
            }
        }
        "cancel" => ConsoleCommand::Cancel,
        "quit" => ConsoleCommand::Quit,
        _ => return Err(format!("Unknown command: '/{name}'")),
    })
}
