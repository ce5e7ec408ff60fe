//! MIDI output port selection.
//!
//! A port is picked by index, by case-insensitive name substring, by
//! creating a virtual port (Unix), or interactively from a numbered list.
//! Cancelling the prompt is not an error; the caller exits quietly.

use std::io::{self, BufRead, Write};

use midir::{MidiOutput, MidiOutputPort};
use thiserror::Error;
use tracing::info;

use crate::sink::MidirSink;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("MIDI init error: {0}")]
    Init(String),
    #[error("no MIDI output ports found")]
    NoPorts,
    #[error("port index {index} out of range ({count} ports)")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("no MIDI output port matching {0:?}")]
    NotFound(String),
    #[error("failed to connect to {port:?}: {reason}")]
    Connect { port: String, reason: String },
    #[error("virtual MIDI ports are not supported on this platform")]
    VirtualUnsupported,
    #[error("reading port choice: {0}")]
    Io(#[from] io::Error),
}

/// How the user asked for a port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortChoice {
    /// Position in the port list.
    Index(usize),
    /// First port whose name contains this text (case-insensitive).
    Name(String),
    /// Create a virtual output port with this name.
    Virtual(String),
    /// Ask on the terminal.
    Prompt,
}

impl PortChoice {
    /// Interpret a port argument: digits select by index, anything else by
    /// name.
    pub fn parse(arg: &str) -> Self {
        match arg.trim().parse::<usize>() {
            Ok(i)  => PortChoice::Index(i),
            Err(_) => PortChoice::Name(arg.trim().to_string()),
        }
    }
}

/// Outcome of [`open_output`].
pub enum PortSelection {
    Connected(MidirSink),
    /// The user declined to pick a port.
    Cancelled,
}

/// What the interactive prompt returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    Port(usize),
    Virtual,
}

// ════════════════════════════════════════════════════════════════════════════
// Port enumeration
// ════════════════════════════════════════════════════════════════════════════

fn midi_output(client_name: &str) -> Result<MidiOutput, PortError> {
    MidiOutput::new(client_name).map_err(|e| PortError::Init(e.to_string()))
}

fn port_names(out: &MidiOutput, ports: &[MidiOutputPort]) -> Vec<String> {
    ports.iter()
        .map(|p| out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect()
}

/// Names of every MIDI output port, in index order.
pub fn list_ports(client_name: &str) -> Result<Vec<String>, PortError> {
    let out = midi_output(client_name)?;
    let ports = out.ports();
    Ok(port_names(&out, &ports))
}

/// Resolve an index or name choice against the port list.
pub fn resolve(choice: &PortChoice, names: &[String]) -> Result<usize, PortError> {
    match choice {
        PortChoice::Index(index) => {
            if *index < names.len() {
                Ok(*index)
            } else if names.is_empty() {
                Err(PortError::NoPorts)
            } else {
                Err(PortError::IndexOutOfRange { index: *index, count: names.len() })
            }
        }
        PortChoice::Name(wanted) => {
            let wanted_lc = wanted.to_lowercase();
            names.iter()
                .position(|n| n.to_lowercase().contains(&wanted_lc))
                .ok_or_else(|| PortError::NotFound(wanted.clone()))
        }
        PortChoice::Virtual(_) | PortChoice::Prompt => Err(PortError::NotFound(String::new())),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Interactive prompt
// ════════════════════════════════════════════════════════════════════════════

/// Show the numbered port list and read a choice.
///
/// Accepts a port number, `v` for a virtual port (Unix only), or `q`.
/// End of input and `q` return `None`.  Anything else re-prompts.
pub fn prompt_port<R: BufRead, W: Write>(
    names:  &[String],
    input:  &mut R,
    output: &mut W,
) -> Result<Option<Pick>, PortError> {
    let virtual_ok = cfg!(unix);

    writeln!(output, "  Available MIDI output ports:")?;
    for (i, name) in names.iter().enumerate() {
        writeln!(output, "    {i}: {name}")?;
    }
    if names.is_empty() {
        writeln!(output, "    (none)")?;
    }

    loop {
        if virtual_ok {
            write!(output, "  Port number, v = virtual port, q = quit: ")?;
        } else {
            write!(output, "  Port number, q = quit: ")?;
        }
        output.flush()?;

        let mut buf = String::new();
        if input.read_line(&mut buf)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }
        match buf.trim() {
            "q" | "Q"                => return Ok(None),
            "v" | "V" if virtual_ok  => return Ok(Some(Pick::Virtual)),
            other => match other.parse::<usize>() {
                Ok(i) if i < names.len() => return Ok(Some(Pick::Port(i))),
                _ => writeln!(output, "  ⚠  Not a valid choice.")?,
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_output
// ════════════════════════════════════════════════════════════════════════════

/// Open the chosen output and wrap it as a sink on `channel`.
pub fn open_output(
    choice:      &PortChoice,
    client_name: &str,
    channel:     u8,
) -> Result<PortSelection, PortError> {
    let out = midi_output(client_name)?;
    let ports = out.ports();
    let names = port_names(&out, &ports);

    let index = match choice {
        PortChoice::Virtual(name) => {
            return open_virtual(out, name, channel).map(PortSelection::Connected);
        }
        PortChoice::Prompt => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut stdout = io::stdout();
            match prompt_port(&names, &mut input, &mut stdout)? {
                Some(Pick::Port(i)) => i,
                Some(Pick::Virtual) => {
                    return open_virtual(out, client_name, channel).map(PortSelection::Connected);
                }
                None => {
                    info!("no port chosen");
                    return Ok(PortSelection::Cancelled);
                }
            }
        }
        other => resolve(other, &names)?,
    };

    let name = names[index].clone();
    info!(port = %name, index, channel, "opening MIDI output");
    let conn = out.connect(&ports[index], client_name)
        .map_err(|e| PortError::Connect { port: name, reason: e.to_string() })?;
    Ok(PortSelection::Connected(MidirSink::new(conn, channel)))
}

#[cfg(unix)]
fn open_virtual(out: MidiOutput, name: &str, channel: u8) -> Result<MidirSink, PortError> {
    use midir::os::unix::VirtualOutput;

    info!(port = %name, channel, "creating virtual MIDI output");
    let conn = out.create_virtual(name)
        .map_err(|e| PortError::Connect { port: name.to_string(), reason: e.to_string() })?;
    Ok(MidirSink::new(conn, channel))
}

#[cfg(not(unix))]
fn open_virtual(_out: MidiOutput, _name: &str, _channel: u8) -> Result<MidirSink, PortError> {
    Err(PortError::VirtualUnsupported)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn names() -> Vec<String> {
        vec!["Midi Through Port-0".into(), "FLUID Synth (1234)".into(), "IAC Driver Bus 1".into()]
    }

    fn prompt(text: &str) -> (Option<Pick>, String) {
        let mut input = Cursor::new(text.as_bytes().to_vec());
        let mut output = Vec::new();
        let pick = prompt_port(&names(), &mut input, &mut output).unwrap();
        (pick, String::from_utf8(output).unwrap())
    }

    #[test]
    fn parse_digits_as_index() {
        assert_eq!(PortChoice::parse("2"), PortChoice::Index(2));
        assert_eq!(PortChoice::parse(" fluid "), PortChoice::Name("fluid".into()));
    }

    #[test]
    fn resolve_by_index_and_name() {
        let n = names();
        assert_eq!(resolve(&PortChoice::Index(1), &n).unwrap(), 1);
        assert_eq!(resolve(&PortChoice::Name("fluid".into()), &n).unwrap(), 1);
        assert_eq!(resolve(&PortChoice::Name("IAC".into()), &n).unwrap(), 2);
    }

    #[test]
    fn resolve_failures() {
        let n = names();
        assert!(matches!(resolve(&PortChoice::Index(3), &n),
                         Err(PortError::IndexOutOfRange { index: 3, count: 3 })));
        assert!(matches!(resolve(&PortChoice::Index(0), &[]), Err(PortError::NoPorts)));
        assert!(matches!(resolve(&PortChoice::Name("loopMIDI".into()), &n),
                         Err(PortError::NotFound(_))));
    }

    #[test]
    fn prompt_lists_ports_and_takes_number() {
        let (pick, shown) = prompt("1\n");
        assert_eq!(pick, Some(Pick::Port(1)));
        assert!(shown.contains("1: FLUID Synth (1234)"));
    }

    #[test]
    fn prompt_reprompts_on_bad_input() {
        let (pick, shown) = prompt("9\nabc\n2\n");
        assert_eq!(pick, Some(Pick::Port(2)));
        assert_eq!(shown.matches("Not a valid choice").count(), 2);
    }

    #[test]
    fn prompt_eof_and_quit_cancel() {
        assert_eq!(prompt("").0, None);
        assert_eq!(prompt("q\n").0, None);
    }

    #[cfg(unix)]
    #[test]
    fn prompt_offers_virtual_on_unix() {
        assert_eq!(prompt("v\n").0, Some(Pick::Virtual));
    }
}
