//! Console command parsing and table output.
//!
//! Record numbers typed by the user are 1-based, as shown in the table.

use std::path::PathBuf;

use pothole_core::board::Point;
use pothole_core::pothole::Pothole;
use pothole_core::summary::Summary;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add { width: f64, length: f64 },
    /// `position` is 1-based; `len + 1` appends.
    Insert { position: usize, width: f64, length: f64 },
    /// `index` is 0-based.
    Update { index: usize, width: f64, length: f64 },
    /// `index` is 0-based.
    Remove { index: usize },
    Reset,
    Save { name: String },
    Load { name: String },
    Export { name: String },
    Import { path: PathBuf },
    Report { name: String },
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Snapshot { path: PathBuf },
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(String);

pub const HELP: &str = "\
commands:
  add <width> <length>
  insert <position> <width> <length>
  update <number> <width> <length>
  remove <number>
  reset
  save <name> | load <name>
  export <name>            spreadsheet into the output directory
  import <path>
  report <name>            PDF into the output directory
  down <x> <y> | move <x> <y> | up
  snapshot <path>          board PNG
  show | help | quit";

fn real(name: &str, raw: &str) -> Result<f64, ParseError> {
    raw.parse::<f64>()
        .map_err(|_| ParseError(format!("{name} must be a number, got '{raw}'")))
}

fn whole(name: &str, raw: &str) -> Result<usize, ParseError> {
    raw.parse::<usize>()
        .map_err(|_| ParseError(format!("{name} must be a whole number, got '{raw}'")))
}

/// A table number (1-based) as a 0-based index.
fn record_index(raw: &str) -> Result<usize, ParseError> {
    match whole("number", raw)? {
        0 => Err(ParseError("record numbers start at 1".into())),
        n => Ok(n - 1),
    }
}

fn point(args: &[&str]) -> Result<Point, ParseError> {
    Ok(Point::new(real("x", args[0])?, real("y", args[1])?))
}

/// Parse one console line. Blank lines are `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let expect = |count: usize, usage: &str| {
        if args.len() == count {
            Ok(())
        } else {
            Err(ParseError(format!("usage: {usage}")))
        }
    };

    let verb = verb.to_ascii_lowercase();
    let command = match verb.as_str() {
        "add" => {
            expect(2, "add <width> <length>")?;
            Command::Add {
                width: real("width", args[0])?,
                length: real("length", args[1])?,
            }
        }
        "insert" => {
            expect(3, "insert <position> <width> <length>")?;
            Command::Insert {
                position: whole("position", args[0])?,
                width: real("width", args[1])?,
                length: real("length", args[2])?,
            }
        }
        "update" => {
            expect(3, "update <number> <width> <length>")?;
            Command::Update {
                index: record_index(args[0])?,
                width: real("width", args[1])?,
                length: real("length", args[2])?,
            }
        }
        "remove" => {
            expect(1, "remove <number>")?;
            Command::Remove {
                index: record_index(args[0])?,
            }
        }
        "reset" => Command::Reset,
        "save" | "load" | "export" | "report" => {
            // Names may contain spaces; keep everything after the verb.
            if args.is_empty() {
                return Err(ParseError(format!("usage: {verb} <name>")));
            }
            let name = args.join(" ");
            match verb.as_str() {
                "save" => Command::Save { name },
                "load" => Command::Load { name },
                "export" => Command::Export { name },
                _ => Command::Report { name },
            }
        }
        "import" => {
            expect(1, "import <path>")?;
            Command::Import {
                path: PathBuf::from(args[0]),
            }
        }
        "down" => {
            expect(2, "down <x> <y>")?;
            Command::PointerDown(point(&args)?)
        }
        "move" => {
            expect(2, "move <x> <y>")?;
            Command::PointerMove(point(&args)?)
        }
        "up" => Command::PointerUp,
        "snapshot" => {
            expect(1, "snapshot <path>")?;
            Command::Snapshot {
                path: PathBuf::from(args[0]),
            }
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError(format!("unknown command '{other}' (try 'help')"))),
    };
    Ok(Some(command))
}

/// Table of records (number, width, length, area) followed by the summary.
pub fn format_table(potholes: &[Pothole], summary: &Summary) -> String {
    let mut out = format!("{:>4}  {:>10}  {:>10}  {:>10}\n", "No.", "Width (m)", "Length (m)", "Area (m²)");
    if potholes.is_empty() {
        out.push_str("  (no potholes)\n");
    }
    for (i, p) in potholes.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:>10.2}  {:>10.2}  {:>10.2}\n",
            i + 1,
            p.width,
            p.length,
            p.area
        ));
    }
    for line in summary.lines() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
