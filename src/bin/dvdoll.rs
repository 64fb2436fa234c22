use std::cell::RefCell;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use dvdoll::{
    FfmpegLogLevel, ProgressCallback, ProgressInfo, Session, SessionOptions, SystemRunner,
    TerminalConsole, Toolchain,
    ffmpeg::{FFMPEG_ENV, FFPROBE_ENV},
};
use indicatif::{ProgressBar, ProgressStyle};

const CLI_AFTER_HELP: &str = "Examples:\n  dvdoll                                   # fully interactive\n  dvdoll /media/dvd --list                 # list titles and exit\n  dvdoll movie.iso --list --json           # machine-readable title list\n  dvdoll movie.iso --title 1 --chapter-start 2 --chapter-end 5 --output part\n  dvdoll movie.iso --title 3 --chapter-start 0 --start-time 00:10:00 --end-time end\n  dvdoll movie.iso --title 1 --chapter-start 1 --chapter-end 9 --non-interactive --overwrite\n  dvdoll completions zsh > _dvdoll";

#[derive(Debug, Parser)]
#[command(
    name = "dvdoll",
    version,
    about = "Remux DVD titles into Matroska files with ffmpeg",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input DVD path or ISO file (same as --input).
    #[arg(value_name = "INPUT")]
    positional_input: Option<String>,

    /// Input DVD path or ISO file.
    #[arg(long)]
    input: Option<String>,

    /// Title number.
    #[arg(long, allow_negative_numbers = true)]
    title: Option<i64>,

    /// First chapter, or a time (0 or HH:MM:SS) to select a time range.
    #[arg(long)]
    chapter_start: Option<String>,

    /// Last chapter.
    #[arg(long, allow_negative_numbers = true)]
    chapter_end: Option<i64>,

    /// Start time (-ss) in HH:MM:SS.
    #[arg(long)]
    start_time: Option<String>,

    /// End time (-to) in HH:MM:SS.
    #[arg(long)]
    end_time: Option<String>,

    /// Output filename (mkv).
    #[arg(long)]
    output: Option<String>,

    /// Only list titles and exit.
    #[arg(long)]
    list: bool,

    /// Print the title list as JSON.
    #[arg(long, requires = "list")]
    json: bool,

    /// Disable prompts and fail on missing values.
    #[arg(long)]
    non_interactive: bool,

    /// Let ffmpeg overwrite an existing output file.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level for the remux (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    ffmpeg_log_level: Option<FfmpegLogLevel>,

    /// ffmpeg program to run.
    #[arg(long, env = FFMPEG_ENV, default_value = "ffmpeg")]
    ffmpeg: String,

    /// ffprobe program to run.
    #[arg(long, env = FFPROBE_ENV, default_value = "ffprobe")]
    ffprobe: String,

    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            input: self.input.clone().or_else(|| self.positional_input.clone()),
            title: self.title,
            chapter_start: self.chapter_start.clone(),
            chapter_end: self.chapter_end,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            output: self.output.clone(),
            list_only: self.list,
            json: self.json,
            non_interactive: self.non_interactive,
            overwrite: self.overwrite,
        }
    }

    fn toolchain(&self) -> Toolchain {
        let toolchain = Toolchain::default()
            .with_ffmpeg(&self.ffmpeg)
            .with_ffprobe(&self.ffprobe);
        match self.ffmpeg_log_level {
            Some(level) => toolchain.with_log_level(level),
            None => toolchain,
        }
    }
}

/// Spinner shown on stderr while titles are probed; one bar per scan.
struct TitleScanSpinner {
    style: ProgressStyle,
    bar: RefCell<Option<ProgressBar>>,
}

impl TitleScanSpinner {
    fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            style: ProgressStyle::with_template("{spinner:.green} {msg}")?,
            bar: RefCell::new(None),
        })
    }
}

impl ProgressCallback for TitleScanSpinner {
    fn on_progress(&self, info: &ProgressInfo) {
        let mut slot = self.bar.borrow_mut();
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner().with_style(self.style.clone());
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        });
        bar.set_message(format!(
            "Probing title {} ({} found)",
            info.title, info.found
        ));
    }

    fn on_finish(&self, _info: &ProgressInfo) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "dvdoll", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);

    let spinner = TitleScanSpinner::new()?;
    let mut session = Session::new(SystemRunner, TerminalConsole::new(), cli.toolchain());
    session.run(cli.session_options(), &spinner)?;
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        println!("{} {error}", "ERROR:".red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn input_flag_wins_over_positional() {
        let cli = Cli::parse_from(["dvdoll", "--input", "a.iso", "b.iso"]);
        assert_eq!(cli.session_options().input.as_deref(), Some("a.iso"));

        let cli = Cli::parse_from(["dvdoll", "b.iso"]);
        assert_eq!(cli.session_options().input.as_deref(), Some("b.iso"));
    }

    #[test]
    fn flags_fill_session_options() {
        let cli = Cli::parse_from([
            "dvdoll",
            "disc.iso",
            "--title",
            "2",
            "--chapter-start",
            "3",
            "--chapter-end",
            "7",
            "--output",
            "part",
            "--non-interactive",
            "--overwrite",
            "--ffmpeg-log-level",
            "warning",
        ]);
        let options = cli.session_options();
        assert_eq!(options.title, Some(2));
        assert_eq!(options.chapter_start.as_deref(), Some("3"));
        assert_eq!(options.chapter_end, Some(7));
        assert_eq!(options.output.as_deref(), Some("part"));
        assert!(options.non_interactive);
        assert!(options.overwrite);
        assert_eq!(
            cli.toolchain().log_level,
            Some(dvdoll::FfmpegLogLevel::Warning)
        );
    }

    #[test]
    fn json_requires_list() {
        assert!(Cli::try_parse_from(["dvdoll", "disc.iso", "--json"]).is_err());
        assert!(Cli::try_parse_from(["dvdoll", "disc.iso", "--list", "--json"]).is_ok());
    }

    #[test]
    fn negative_numbers_reach_the_session() {
        let cli = Cli::try_parse_from(["dvdoll", "disc.iso", "--title", "-3", "--chapter-end", "-1"])
            .unwrap();
        let options = cli.session_options();
        assert_eq!(options.title, Some(-3));
        assert_eq!(options.chapter_end, Some(-1));
    }

    #[test]
    fn completions_subcommand() {
        let cli = Cli::parse_from(["dvdoll", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }
}
