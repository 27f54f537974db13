//! Command parsing for one-shot arguments and interactive input lines.

use anyhow::{anyhow, bail, Result};
use dexcache_core::random::ALL_GENERATIONS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up by name or id
    Show(String),
    /// Random record within a generation tag
    Random(String),
    /// Random member of an elemental type
    Type(String),
    /// Step to the next/previous id, from an explicit id or the current record
    Next(Option<u32>),
    Prev(Option<u32>),
    /// Name suggestions for a generation tag
    List(String),
    /// Toggle a favorite, defaulting to the current record
    Fav(Option<String>),
    Favs,
    Stats,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  show <name|id>   look up a record
  random [gen]     random record (gen: 1, 2, 3, all)
  type <name>      random record of an elemental type
  next [id]        next record
  prev [id]        previous record
  list [gen]       names in a generation
  fav [name]       toggle a favorite (current record by default)
  favs             list favorites
  stats            request count and cache sizes
  help             this text
  quit             leave the session";

fn parse_id(arg: Option<&str>) -> Result<Option<u32>> {
    arg.map(|a| a.parse::<u32>().map_err(|_| anyhow!("'{}' is not a numeric id", a)))
        .transpose()
}

/// Parse one command from whitespace-separated words.
pub fn parse<'a>(mut words: impl Iterator<Item = &'a str>) -> Result<Command> {
    let Some(verb) = words.next() else {
        bail!("No command given");
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        bail!("Unexpected argument '{}' (names use hyphens, e.g. mr-mime)", extra);
    }

    let command = match verb.to_lowercase().as_str() {
        "show" | "search" => match arg {
            Some(a) => Command::Show(a.to_string()),
            None => bail!("Usage: show <name|id>"),
        },
        "random" => Command::Random(arg.unwrap_or(ALL_GENERATIONS).to_string()),
        "type" => match arg {
            Some(a) => Command::Type(a.to_lowercase()),
            None => bail!("Usage: type <name>"),
        },
        "next" => Command::Next(parse_id(arg)?),
        "prev" => Command::Prev(parse_id(arg)?),
        "list" => Command::List(arg.unwrap_or(ALL_GENERATIONS).to_string()),
        "fav" => Command::Fav(arg.map(str::to_string)),
        "favs" => Command::Favs,
        "stats" => Command::Stats,
        "help" | "-h" | "--help" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '{}'", other),
    };
    Ok(command)
}

pub fn parse_line(line: &str) -> Result<Command> {
    parse(line.split_whitespace())
}
