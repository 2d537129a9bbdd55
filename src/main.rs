use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use trackscore::instruments::DEFAULT_TABLE_FILE;
use trackscore::playback::{perform, Transcript};
use trackscore::{compile_file, CompiledScore, InstrumentTable};

/// Extension tried when the input path names no existing file.
const SCORE_EXTENSION: &str = "mymidi";

#[derive(Parser, Debug)]
#[command(name = "trackscore", version, about = "Compile score text into per-track event streams")]
struct Cli {
    /// Score file to compile
    input: PathBuf,

    /// Instrument name table (`name: code` per line); missing means no numeric names resolve
    #[arg(short, long, default_value = DEFAULT_TABLE_FILE)]
    instruments: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Yaml,
    Json,
    /// The ordered calls a backend would receive
    Listing,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// `song` falls back to `song.mymidi` when only the latter exists.
fn resolve_input(input: &Path) -> PathBuf {
    if !input.exists() && input.extension().is_none() {
        let with_extension = input.with_extension(SCORE_EXTENSION);
        if with_extension.exists() {
            return with_extension;
        }
    }
    input.to_path_buf()
}

fn render(score: &CompiledScore, format: Format) -> Result<String, String> {
    match format {
        Format::Yaml => serde_yaml::to_string(score).map_err(|e| e.to_string()),
        Format::Json => serde_json::to_string_pretty(score)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
        Format::Listing => {
            let mut transcript = Transcript::new();
            match perform(score, &mut transcript) {
                Ok(()) => Ok(transcript.listing()),
                Err(never) => match never {},
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let table = InstrumentTable::load_or_empty(&cli.instruments);
    let input = resolve_input(&cli.input);

    let score = match compile_file(&input, &table) {
        Ok(score) => score,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            process::exit(1);
        }
    };

    let text = match render(&score, cli.format) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error rendering output: {}", e);
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &text) {
                eprintln!("Error writing to '{}': {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Wrote {} track(s) to {}", score.tracks.len(), path.display());
        }
        None => print!("{}", text),
    }
}
