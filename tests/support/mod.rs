//! Scripted stand-ins for ffprobe/ffmpeg and the terminal.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::io::{self, Write};
use std::path::PathBuf;

use dvdoll::{CommandRunner, Console, ContinueKey, DvdollError};

/// One title as the scripted ffprobe reports it.
#[derive(Debug, Clone)]
pub struct ScriptedTitle {
    pub duration: String,
    pub chapters: usize,
    pub audio_codec: String,
}

impl ScriptedTitle {
    pub fn new(duration: &str, chapters: usize, audio_codec: &str) -> Self {
        Self {
            duration: duration.to_string(),
            chapters,
            audio_codec: audio_codec.to_string(),
        }
    }
}

/// A recorded subprocess call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub attached: bool,
}

/// Answers ffprobe queries from a list of titles and records every call.
///
/// Titles past the end of the list fail like ffprobe does for a title the
/// disc does not have.
#[derive(Default)]
pub struct ScriptedRunner {
    pub titles: Vec<ScriptedTitle>,
    pub missing_programs: HashSet<String>,
    pub failing_chapter_probes: HashSet<u32>,
    pub fail_remux: bool,
    pub invocations: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn with_titles(titles: Vec<ScriptedTitle>) -> Self {
        Self {
            titles,
            ..Self::default()
        }
    }

    /// Arguments of every attached (ffmpeg) run.
    pub fn remux_calls(&self) -> Vec<Vec<String>> {
        self.invocations
            .borrow()
            .iter()
            .filter(|invocation| invocation.attached)
            .map(|invocation| invocation.args.clone())
            .collect()
    }

    /// Title numbers passed to ffprobe, in call order.
    pub fn probed_titles(&self) -> Vec<u32> {
        self.invocations
            .borrow()
            .iter()
            .filter(|invocation| !invocation.attached)
            .filter_map(|invocation| title_argument(&invocation.args))
            .collect()
    }

    fn failure(program: &str, message: &str) -> DvdollError {
        DvdollError::Spawn {
            program: program.to_string(),
            source: io::Error::other(message.to_string()),
        }
    }
}

fn title_argument(args: &[String]) -> Option<u32> {
    let position = args.iter().position(|arg| arg == "-title")?;
    args.get(position + 1)?.parse().ok()
}

impl CommandRunner for ScriptedRunner {
    fn locate(&self, program: &str) -> Result<PathBuf, DvdollError> {
        if self.missing_programs.contains(program) {
            return Err(DvdollError::ToolNotFound(program.to_string()));
        }
        Ok(PathBuf::from("/usr/bin").join(program))
    }

    fn capture(&self, program: &str, args: &[String]) -> Result<String, DvdollError> {
        self.invocations.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            attached: false,
        });

        let number = title_argument(args).ok_or_else(|| Self::failure(program, "no -title"))?;
        let title = number
            .checked_sub(1)
            .and_then(|index| self.titles.get(index as usize))
            .ok_or_else(|| Self::failure(program, "title not found"))?;

        if args.iter().any(|arg| arg == "format=duration") {
            Ok(format!("{}\n", title.duration))
        } else if args.iter().any(|arg| arg == "chapter=index") {
            if self.failing_chapter_probes.contains(&number) {
                return Err(Self::failure(program, "chapter probe failed"));
            }
            Ok((0..title.chapters).map(|index| format!("{index}\n")).collect())
        } else if args.iter().any(|arg| arg == "stream=codec_name") {
            Ok(format!("{}\n", title.audio_codec))
        } else {
            Err(Self::failure(program, "unexpected query"))
        }
    }

    fn run(&self, program: &str, args: &[String]) -> Result<(), DvdollError> {
        self.invocations.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            attached: true,
        });
        if self.fail_remux {
            return Err(Self::failure(program, "remux failed"));
        }
        Ok(())
    }
}

/// Feeds prepared answers and captures everything written.
#[derive(Default)]
pub struct ScriptedConsole {
    pub lines: VecDeque<String>,
    pub keys: VecDeque<ContinueKey>,
    pub output: Vec<u8>,
    pub clears: Cell<usize>,
}

impl ScriptedConsole {
    pub fn answering(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_keys(mut self, keys: &[ContinueKey]) -> Self {
        self.keys = keys.iter().copied().collect();
        self
    }

    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Write for ScriptedConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    fn read_continue_key(&mut self) -> io::Result<ContinueKey> {
        Ok(self.keys.pop_front().unwrap_or(ContinueKey::Stop))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.clears.set(self.clears.get() + 1);
        Ok(())
    }
}

/// Build an owned argument vector from string literals.
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
