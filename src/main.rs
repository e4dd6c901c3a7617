use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use transloader::config::Config;
use transloader::interactive::run_interactive;
use transloader::loader::{self, CommandRegistry};
use transloader::translate::{parse_string_list, TranslateOptions, Translator};

#[derive(Parser)]
#[command(name = "transloader")]
#[command(version, about = "Translate text and load command descriptors")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a piece of text
    Translate {
        text: String,

        /// Source language code or name (defaults to auto-detect)
        #[arg(short, long)]
        from: Option<String>,

        /// Target language code or name (defaults to the configured target)
        #[arg(short, long)]
        to: Option<String>,

        /// Include the raw endpoint response
        #[arg(long)]
        raw: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate a word list into several languages
    Preload {
        /// Comma-separated target languages
        #[arg(short, long, value_delimiter = ',', required = true)]
        languages: Vec<String>,

        /// Comma-separated words or phrases
        #[arg(short, long, value_delimiter = ',', conflicts_with = "words_file")]
        words: Vec<String>,

        /// JSON file holding an array of words
        #[arg(long)]
        words_file: Option<PathBuf>,
    },

    /// Load command descriptors from a directory
    Commands {
        /// Directory to scan (defaults to the configured commands_dir)
        dir: Option<PathBuf>,

        /// Do not print the directory tree
        #[arg(short, long)]
        silent: bool,
    },

    /// Translate interactively
    Interactive,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn read_words(words: Vec<String>, words_file: Option<PathBuf>) -> Result<Vec<String>> {
    let Some(path) = words_file else {
        return Ok(words);
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(parse_string_list(&value)?)
}

fn build_translator(config: &Config) -> Result<Translator> {
    config
        .validate()
        .context("Configuration validation failed")?;
    Translator::from_config(config).context("Failed to create translator")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Command::Translate {
            text,
            from,
            to,
            raw,
            json,
        } => {
            let translator = build_translator(&config)?;
            let options = TranslateOptions { from, to, raw };
            let result = translator.translate(&text, &options).await?;

            if json || raw {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.text);
                if result.from.text.did_you_mean {
                    info!("Did you mean: {}", result.from.text.value);
                }
            }
        }

        Command::Preload {
            languages,
            words,
            words_file,
        } => {
            let words = read_words(words, words_file)?;
            let translator = build_translator(&config)?;

            let pb = ProgressBar::new((languages.len() * words.len()) as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap(),
            );
            pb.enable_steady_tick(Duration::from_millis(100));

            let loaded = translator
                .load_languages_with(&languages, &words, |lang, word| {
                    pb.set_message(format!("{} → {}", word, lang));
                    pb.inc(1);
                })
                .await;
            pb.finish_and_clear();

            println!("{}", serde_json::to_string_pretty(&loaded?)?);
        }

        Command::Commands { dir, silent } => {
            let dir = dir
                .or_else(|| config.commands_dir.clone())
                .context("No directory given and commands_dir is not configured")?;

            let mut registry = CommandRegistry::new();
            loader::load(&mut registry, &dir, silent)?;

            for command in registry.commands.values() {
                match &command.description {
                    Some(description) => println!("{:<16} {}", command.name, description),
                    None => println!("{}", command.name),
                }
            }
        }

        Command::Interactive => {
            let translator = build_translator(&config)?;
            run_interactive(&translator).await?;
        }
    }

    Ok(())
}
