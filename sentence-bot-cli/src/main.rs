use std::collections::HashSet;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use clap::{ArgAction, Parser};
use log::{LevelFilter, warn};

use sentence_bot_core::cache::BotCache;
use sentence_bot_core::catalog::BotCatalog;
use sentence_bot_core::error::GenerateError;
use sentence_bot_core::io::{read_document, read_stop_words};

#[derive(Parser, Debug)]
#[command(name = "sentence-bot")]
#[command(about = "Talk to Markov sentence bots trained on book corpora")]
struct Args {
	/// Bot catalog (JSON); the stock catalog is used when absent
	#[arg(short, long)]
	catalog: Option<PathBuf>,

	/// Whitespace-separated stop-word list
	#[arg(long, default_value = "stop_words.txt")]
	stop_words: PathBuf,

	/// Banner printed at start-up
	#[arg(long, default_value = "title.txt")]
	title: PathBuf,

	/// Speak every sentence with `say -v <VOICE>`
	#[arg(long)]
	voice: Option<String>,

	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, action = ArgAction::Count)]
	quiet: u8,
}

/// One line typed by the user: `<bot> [-c] [seed words...]`.
#[derive(Debug, PartialEq)]
struct Request {
	bot: String,
	/// `-c`: answer the seed instead of continuing it.
	respond: bool,
	seed: String,
}

impl Request {
	/// Returns `None` for a blank line.
	fn parse(line: &str) -> Option<Self> {
		let mut words = line.split_whitespace().peekable();
		let bot = words.next()?.to_owned();
		let respond = words.next_if_eq(&"-c").is_some();
		let seed = words.collect::<Vec<_>>().join(" ");
		Some(Self { bot, respond, seed })
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = match (quiet, verbose) {
		(0, 0) => LevelFilter::Info,
		(0, 1) => LevelFilter::Debug,
		(0, _) => LevelFilter::Trace,
		(1, _) => LevelFilter::Warn,
		_ => LevelFilter::Error,
	};

	let mut builder = env_logger::Builder::new();
	builder.format_timestamp(None);
	builder.filter_level(level);
	let _ = builder.try_init();
}

/// Turns a generation failure into the message shown to the user.
fn user_message(e: &GenerateError) -> &'static str {
	match e {
		GenerateError::KeyTooShort { .. } => "Please give me a longer key",
		GenerateError::UnknownKey(_) => "Sorry, we cannot generate a sentence with that initial key",
	}
}

fn answer(request: &Request, catalog: &BotCatalog, cache: &BotCache, stop_words: &HashSet<String>) -> Result<String, Box<dyn Error>> {
	let model = cache.get_or_train(&request.bot, catalog)?;
	let result = if request.seed.is_empty() {
		model.generate()
	} else if request.respond {
		model.respond(&request.seed, stop_words)
	} else {
		model.generate_from_key(&request.seed)
	};

	Ok(result.unwrap_or_else(|e| user_message(&e).to_owned()))
}

/// Tells whether the next answer from `bot` needs training first.
fn training_status(bot: &str, catalog: &BotCatalog, cache: &BotCache) -> String {
	match catalog.resolve(bot) {
		Some((resolved, _)) if cache.is_trained(resolved) => format!("Trained model for {resolved} found!"),
		Some((resolved, _)) => format!("Training {resolved}..."),
		None => format!("No bot named {bot}"),
	}
}

fn speak(voice: &str, text: &str) {
	if let Err(e) = Command::new("say").args(["-v", voice, text]).spawn() {
		warn!("Cannot run text-to-speech: {e}");
	}
}

fn main() -> Result<(), Box<dyn Error>> {
	let args = Args::parse();
	init_logging(args.verbose, args.quiet);

	let catalog = match &args.catalog {
		Some(path) => BotCatalog::from_file(path)?,
		None => BotCatalog::default(),
	};
	let stop_words = read_stop_words(&args.stop_words).unwrap_or_else(|e| {
		warn!("Cannot read stop words from {}: {e}", args.stop_words.display());
		HashSet::new()
	});
	let cache = BotCache::new();

	if let Ok(title) = read_document(&args.title) {
		println!("{title}\n\n\n  Ready!\n\n");
	}

	let stdin = io::stdin();
	loop {
		print!("Enter command below:\n> ");
		io::stdout().flush()?;

		let mut line = String::new();
		if stdin.lock().read_line(&mut line)? == 0 {
			break;
		}
		let Some(request) = Request::parse(&line) else {
			continue;
		};

		println!("\n    {}", training_status(&request.bot, &catalog, &cache));
		println!("\n    Generating sentence for {} ...", request.bot);
		match answer(&request, &catalog, &cache, &stop_words) {
			Ok(output) => {
				println!("    $> {output}\n");
				if let Some(voice) = &args.voice {
					speak(voice, &output);
				}
			}
			Err(e) => println!("    !! {e}\n"),
		}
	}

	Ok(())
}
