//! Shell commands.
//!
//! Commands live in a static table and are looked up by name
//! (case-insensitive) with [`find_command`]. Each handler gets the session,
//! the rest of the input line, and the output to write to.

use std::borrow::Cow;
use std::io::{self, Write};

use settings::Block;

use crate::session::Session;

/// What the shell does after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

type Handler = fn(&mut Session, &str, &mut dyn Write) -> io::Result<Flow>;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub func: Handler,
}

pub static COMMANDS: &[Command] = &[
    Command {
        name: "LIST",
        usage: "LIST              list blocks with their filters",
        func: cmd_list,
    },
    Command {
        name: "SHOW",
        usage: "SHOW [name]       print one block (no name: the unnamed block)",
        func: cmd_show,
    },
    Command {
        name: "CHECK",
        usage: "CHECK expr        validate an event filter expression",
        func: cmd_check,
    },
    Command {
        name: "STATS",
        usage: "STATS             block and error counts",
        func: cmd_stats,
    },
    Command {
        name: "RELOAD",
        usage: "RELOAD            decode the blob again",
        func: cmd_reload,
    },
    Command {
        name: "HELP",
        usage: "HELP              this list",
        func: cmd_help,
    },
    Command {
        name: "EXIT",
        usage: "EXIT / QUIT       leave the shell",
        func: cmd_exit,
    },
    Command {
        name: "QUIT",
        usage: "",
        func: cmd_exit,
    },
];

pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Runs one input line. Empty lines do nothing.
pub fn execute(session: &mut Session, line: &str, out: &mut dyn Write) -> io::Result<Flow> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Flow::Continue);
    }
    let (name, args) = match line.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (line, ""),
    };
    match find_command(name) {
        Some(command) => (command.func)(session, args, out),
        None => {
            writeln!(out, "unknown command: {}", name)?;
            Ok(Flow::Continue)
        }
    }
}

fn or_none(value: &[u8]) -> String {
    if value.is_empty() {
        "(none)".to_string()
    } else {
        String::from_utf8_lossy(value).into_owned()
    }
}

fn cmd_list(session: &mut Session, _args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    let doc = session.document();
    if doc.is_empty() {
        writeln!(out, "(empty)")?;
        return Ok(Flow::Continue);
    }
    for block in doc {
        let filter = if block.is_unfiltered() {
            Cow::Borrowed("(always)")
        } else {
            block.filter_lossy()
        };
        let mut flags = String::new();
        if !block.base_settings_error.is_empty() {
            flags.push_str(" [settings error]");
        }
        if !block.filter_error.is_empty() {
            flags.push_str(" [filter error]");
        }
        writeln!(out, "{:?} {}{}", block.name_lossy(), filter, flags)?;
    }
    writeln!(out, "({} blocks)", doc.len())?;
    Ok(Flow::Continue)
}

fn show_block(block: &Block, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "name: {:?}", block.name_lossy())?;
    writeln!(out, "filter: {}", or_none(&block.filter_string))?;
    writeln!(out, "filter error: {}", or_none(&block.filter_error))?;
    writeln!(out, "settings error: {}", or_none(&block.base_settings_error))
}

fn cmd_show(session: &mut Session, args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    match session.document().get(args.as_bytes()) {
        Some(block) => show_block(block, out)?,
        None => writeln!(out, "(nil)")?,
    }
    Ok(Flow::Continue)
}

fn cmd_check(_session: &mut Session, args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    if args.is_empty() {
        writeln!(out, "ERR usage: CHECK expr")?;
        return Ok(Flow::Continue);
    }
    match filter::parse(args) {
        Ok(expr) => writeln!(out, "OK {}", expr)?,
        Err(e) => writeln!(out, "ERR {}", e)?,
    }
    Ok(Flow::Continue)
}

fn cmd_stats(session: &mut Session, _args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    let doc = session.document();
    let unfiltered = doc.blocks().filter(|b| b.is_unfiltered()).count();
    let settings_errors = doc
        .blocks()
        .filter(|b| !b.base_settings_error.is_empty())
        .count();
    let filter_errors = doc.blocks().filter(|b| !b.filter_error.is_empty()).count();
    writeln!(
        out,
        "path={} blocks={} full_size={} unfiltered={} settings_errors={} filter_errors={}",
        session.config().blob_path.display(),
        doc.len(),
        doc.full_size(),
        unfiltered,
        settings_errors,
        filter_errors
    )?;
    Ok(Flow::Continue)
}

fn cmd_reload(session: &mut Session, _args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    match session.reload() {
        Ok(blocks) => writeln!(out, "OK ({} blocks)", blocks)?,
        Err(e) => writeln!(out, "ERR {}", e)?,
    }
    Ok(Flow::Continue)
}

fn cmd_help(_session: &mut Session, _args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    for command in COMMANDS.iter().filter(|c| !c.usage.is_empty()) {
        writeln!(out, "{}", command.usage)?;
    }
    Ok(Flow::Continue)
}

fn cmd_exit(_session: &mut Session, _args: &str, out: &mut dyn Write) -> io::Result<Flow> {
    writeln!(out, "bye")?;
    Ok(Flow::Exit)
}
