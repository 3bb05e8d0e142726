//! Line-oriented host loop for the binary.
//!
//! The host drives the app one command per line. After every command pending
//! re-renders are flushed and the document markup is written out, one line
//! per mount point.

use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::app::App;
use crate::settings::AppSettings;
use crate::state::counter::UnknownIntent;
use crate::state::CounterIntent;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Click(String),
    Key(String),
    Dispatch(CounterIntent),
    Navigate(String),
    Render,
    State,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}`")]
    Unknown(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Intent(#[from] UnknownIntent),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, arg.trim()),
            None => (line, ""),
        };
        let required = |name: &'static str| {
            if arg.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(arg.to_string())
            }
        };

        match word {
            "" => Err(CommandError::Empty),
            "click" => required("click").map(Command::Click),
            "key" => required("key").map(Command::Key),
            "dispatch" => Ok(Command::Dispatch(required("dispatch")?.parse()?)),
            "navigate" => required("navigate").map(Command::Navigate),
            "render" => Ok(Command::Render),
            "state" => Ok(Command::State),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Interpret the first input line. A JSON object there carries the host's
/// settings; anything else is handed back to be run as a normal command.
pub fn handshake(first_line: &str) -> anyhow::Result<(AppSettings, Option<String>)> {
    if first_line.trim_start().starts_with('{') {
        return Ok((AppSettings::from_json(first_line)?, None));
    }
    let pending = Some(first_line.to_string()).filter(|l| !l.trim().is_empty());
    Ok((AppSettings::default(), pending))
}

/// Decode one raw input line. Invalid UTF-8 is replaced rather than ending
/// the session; the resulting command is then rejected like any other typo.
pub fn decode_line(raw: &[u8]) -> String {
    let line = String::from_utf8_lossy(raw);
    if let Cow::Owned(_) = line {
        warn!(bytes = raw.len(), "host line is not valid UTF-8");
    }
    line.into_owned()
}

pub fn run<R: BufRead, W: Write>(app: &mut App, input: R, mut out: W) -> anyhow::Result<()> {
    writeln!(out, "{}", app.document().markup())?;

    for raw in input.split(b'\n') {
        let line = decode_line(&raw?);
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                warn!(%err, line = %line.trim(), "ignoring host command");
                continue;
            }
        };
        debug!(?command, "host command");

        match command {
            Command::Quit => break,
            Command::State => {
                let state = app.store().select(|s| s.clone());
                writeln!(out, "{}", serde_json::to_string(&state)?)?;
                continue;
            }
            Command::Click(id) => {
                if let Err(err) = app.document().click(&id) {
                    warn!(%err, "click ignored");
                }
            }
            Command::Key(key) => {
                app.document().key(&key);
            }
            Command::Dispatch(intent) => app.store().dispatch(intent),
            Command::Navigate(path) => app.navigator().navigate(&path),
            Command::Render => app.request_render(),
        }

        app.flush()?;
        writeln!(out, "{}", app.document().markup())?;
    }
    out.flush()?;
    Ok(())
}
