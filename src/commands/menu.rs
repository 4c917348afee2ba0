use std::io::{self, BufRead, Write};

use super::Command;
use crate::constants::DEFAULT_PORT;

const MENU: &str = "\
1. Run Development Server (default port 8000)
2. Run Development Server (custom port)
3. Run Migrations
4. Collect Static Files
5. Create Superuser
6. Run Tests
7. Show URLs
8. SQL Shell
9. Check System
0. Exit";

/// Shows the menu until a valid choice is made. `None` means exit.
/// End of input also exits.
pub fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Option<Command>> {
    loop {
        writeln!(output, "\n{}", "=".repeat(60))?;
        writeln!(output, "🎯 PORTFOLIO SITE - DEVELOPMENT MENU")?;
        writeln!(output, "{}", "=".repeat(60))?;
        writeln!(output, "{MENU}")?;
        writeln!(output, "{}", "-".repeat(60))?;
        write!(output, "Select option (0-9): ")?;
        output.flush()?;

        let Some(choice) = read_line(input)? else {
            return Ok(None);
        };

        let command = match choice.as_str() {
            "1" => Command::Runserver { port: Some(DEFAULT_PORT) },
            "2" => {
                write!(output, "Enter port number (default {DEFAULT_PORT}): ")?;
                output.flush()?;
                let raw = read_line(input)?.unwrap_or_default();
                match parse_port(&raw) {
                    Some(port) => Command::Runserver { port: Some(port) },
                    None => {
                        writeln!(output, "❌ Invalid port. Please try again.")?;
                        continue;
                    }
                }
            }
            "3" => Command::Migrate,
            "4" => Command::Collectstatic,
            "5" => Command::Createsuperuser { email: None, password: None },
            "6" => Command::Test { args: Vec::new() },
            "7" => Command::Urls,
            "8" => Command::Shell,
            "9" => Command::Check,
            "0" => return Ok(None),
            _ => {
                writeln!(output, "❌ Invalid option. Please try again.")?;
                continue;
            }
        };
        return Ok(Some(command));
    }
}

pub fn prompt_stdin() -> io::Result<Option<Command>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    prompt(&mut input, &mut output)
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Blank input means the default port.
fn parse_port(raw: &str) -> Option<u16> {
    if raw.trim().is_empty() {
        return Some(DEFAULT_PORT);
    }
    raw.trim().parse().ok().filter(|port| *port > 0)
}
