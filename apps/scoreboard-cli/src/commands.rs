//! Line commands understood by the terminal client.

use scoreboard_backend::sync::{ScoreField, StatField};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddRound,
    Edit { round: i32 },
    Set { field: ScoreField, raw: String },
    Save,
    Cancel,
    Delete { round: i32 },
    InitStats,
    StatEdit { player: String },
    StatSet { field: StatField, raw: String },
    StatSave,
    StatCancel,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  add                      add a round numbered after the highest one
  edit <round>             start editing a round
  set <player> <points>    change a field of the round being edited
  save | cancel            commit or discard the round edit
  delete <round>           delete a round (asks first)
  init-stats               create the four player stat rows
  stat-edit <player>       start editing a player's stats
  stat-set <field> <n>     fields: winByOthers selfDrawn paidOut specialBonus (or 食胡 自摸 出統 特別賞罰)
  stat-save | stat-cancel  commit or discard the stat edit
  show | help | quit";

fn round_arg(arg: Option<&str>, usage: &str) -> Result<i32, String> {
    let raw = arg.ok_or_else(|| format!("usage: {usage}"))?;
    raw.parse::<i32>()
        .map_err(|_| format!("'{raw}' is not a round number"))
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    // Points are free text; parsing to a number happens in the edit buffer.
    let rest = words.collect::<Vec<_>>().join(" ");

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" => Command::AddRound,
        "edit" => Command::Edit {
            round: round_arg(arg, "edit <round>")?,
        },
        "set" => {
            let field = arg.ok_or("usage: set <player> <points>")?;
            Command::Set {
                field: field.parse().map_err(|e| format!("{e}"))?,
                raw: rest,
            }
        }
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" | "del" => Command::Delete {
            round: round_arg(arg, "delete <round>")?,
        },
        "init-stats" => Command::InitStats,
        "stat-edit" => Command::StatEdit {
            player: arg.ok_or("usage: stat-edit <player>")?.to_string(),
        },
        "stat-set" => {
            let field = arg.ok_or("usage: stat-set <field> <n>")?;
            Command::StatSet {
                field: field.parse().map_err(|e| format!("{e}"))?,
                raw: rest,
            }
        }
        "stat-save" => Command::StatSave,
        "stat-cancel" => Command::StatCancel,
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}
