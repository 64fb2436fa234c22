//! Terminal interaction.
//!
//! Everything the session prints or reads goes through a [`Console`], so the
//! whole interactive flow can be driven by a script in tests.
//! [`TerminalConsole`] is the real thing: line input from stdin, a single
//! raw-mode key press for the "another file?" question, and ANSI screen
//! clearing via crossterm.

use std::io::{self, BufRead, IsTerminal, Stdin, Stdout, Write};

use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, terminal,
};
use log::debug;

use crate::error::DvdollError;

/// Banner printed at start-up and after clearing the screen.
pub const HEADER: &str = "DVDoll - FFmpeg DVD remuxer";

/// The two answers to "process another file?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueKey {
    /// Enter (or any key other than Esc).
    Continue,
    /// Esc, end of input, or a read error.
    Stop,
}

/// A text sink that can also read user input.
pub trait Console: Write {
    /// Read one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Wait for the user to choose between another file and quitting.
    fn read_continue_key(&mut self) -> io::Result<ContinueKey>;

    /// Clear the screen and move the cursor home.
    fn clear_screen(&mut self) -> io::Result<()>;
}

/// [`Console`] on the process's stdin and stdout.
pub struct TerminalConsole {
    stdin: Stdin,
    stdout: Stdout,
}

impl TerminalConsole {
    /// Console on the process's stdin and stdout.
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }

    fn read_raw_key(&mut self) -> io::Result<ContinueKey> {
        let key = loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key.code),
                Ok(_) => continue,
                Err(error) => break Err(error),
            }
        };
        // Restore cooked mode before acting on the key, even after a read error.
        terminal::disable_raw_mode()?;

        match key {
            Ok(KeyCode::Esc) => Ok(ContinueKey::Stop),
            Ok(_) => Ok(ContinueKey::Continue),
            Err(error) => {
                debug!("key read failed: {error}");
                Ok(ContinueKey::Stop)
            }
        }
    }

    fn read_line_continue(&mut self) -> io::Result<ContinueKey> {
        write!(
            self,
            "{}",
            "(press Enter to continue, type 'esc' to exit) ".bright_black()
        )?;
        let answer = self.read_line()?;
        Ok(continue_key_from_line(answer.as_deref()))
    }
}

/// Interpret a line typed at the continue prompt: `esc` or end of input
/// stops, anything else continues.
fn continue_key_from_line(answer: Option<&str>) -> ContinueKey {
    match answer {
        Some(answer) if !answer.trim().eq_ignore_ascii_case("esc") => ContinueKey::Continue,
        _ => ContinueKey::Stop,
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for TerminalConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Console for TerminalConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.stdout.flush()?;
        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_continue_key(&mut self) -> io::Result<ContinueKey> {
        self.stdout.flush()?;
        // crossterm falls back to /dev/tty for raw mode; piped input must
        // answer on stdin instead.
        if !self.stdin.is_terminal() {
            debug!("stdin is not a terminal, using line input");
            return self.read_line_continue();
        }
        if let Err(error) = terminal::enable_raw_mode() {
            debug!("raw mode unavailable ({error}), falling back to line input");
            return self.read_line_continue();
        }
        self.read_raw_key()
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(
            self.stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )
    }
}

/// Ask for a value.
///
/// In non-interactive mode nothing is printed or read and the answer is
/// empty, which the caller turns into a "required" error or a default.
///
/// # Errors
///
/// Returns [`DvdollError::IoError`] if the console cannot be written or read.
pub fn prompt<C: Console + ?Sized>(
    console: &mut C,
    label: &str,
    non_interactive: bool,
) -> Result<String, DvdollError> {
    if non_interactive {
        return Ok(String::new());
    }
    write!(console, "{}", format!("{label}: ").cyan())?;
    console.flush()?;
    Ok(console
        .read_line()?
        .map(|line| line.trim().to_string())
        .unwrap_or_default())
}

/// Ask whether to process another file.
///
/// # Errors
///
/// Returns [`DvdollError::IoError`] if the console cannot be written.
pub fn prompt_continue<C: Console + ?Sized>(
    console: &mut C,
    non_interactive: bool,
) -> Result<bool, DvdollError> {
    if non_interactive {
        return Ok(false);
    }
    writeln!(
        console,
        "{} {} {}",
        "Press".bright_black(),
        "Enter".cyan(),
        "to process another file".bright_black()
    )?;
    writeln!(
        console,
        "{} {} {}",
        "Press".bright_black(),
        "ESC".red(),
        "to close".bright_black()
    )?;

    let key = console.read_continue_key().unwrap_or_else(|error| {
        debug!("continue prompt failed: {error}");
        ContinueKey::Stop
    });
    Ok(key == ContinueKey::Continue)
}

/// Print the banner followed by a blank line.
///
/// # Errors
///
/// Returns [`DvdollError::IoError`] if the console cannot be written.
pub fn print_header<C: Console + ?Sized>(console: &mut C) -> Result<(), DvdollError> {
    writeln!(console, "{}", HEADER.red())?;
    writeln!(console)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ContinueKey, continue_key_from_line};

    #[test]
    fn line_answers_at_the_continue_prompt() {
        assert_eq!(continue_key_from_line(Some("")), ContinueKey::Continue);
        assert_eq!(continue_key_from_line(Some("y")), ContinueKey::Continue);
        assert_eq!(continue_key_from_line(Some(" ESC ")), ContinueKey::Stop);
        assert_eq!(continue_key_from_line(None), ContinueKey::Stop);
    }
}
