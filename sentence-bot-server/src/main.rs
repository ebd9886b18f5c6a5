use std::collections::HashSet;
use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use sentence_bot_core::cache::BotCache;
use sentence_bot_core::catalog::BotCatalog;
use sentence_bot_core::error::{ConfigError, GenerateError};
use sentence_bot_core::io::{list_files, read_stop_words};

#[derive(Parser, Debug)]
#[command(name = "sentence-bot-server")]
#[command(about = "HTTP front end for the Markov sentence bots")]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to bind
	#[arg(short, long, default_value_t = 5000)]
	port: u16,

	/// Bot catalog (JSON); the stock catalog is used when absent
	#[arg(short, long)]
	catalog: Option<PathBuf>,

	/// Whitespace-separated stop-word list
	#[arg(long, default_value = "stop_words.txt")]
	stop_words: PathBuf,
}

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	bot: Option<String>,
	seed: Option<String>,
	respond: Option<bool>,
}

/// State shared by every worker. Models are trained lazily, once per bot,
/// and read without locking afterwards.
struct SharedData {
	catalog: BotCatalog,
	cache: BotCache,
	stop_words: HashSet<String>,
}

fn generate_error_response(e: GenerateError) -> HttpResponse {
	match e {
		GenerateError::KeyTooShort { .. } => HttpResponse::BadRequest().body(e.to_string()),
		GenerateError::UnknownKey(_) => HttpResponse::NotFound().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// - no `seed`: free sentence
/// - `seed`: sentence continuing the seed key
/// - `seed` and `respond=true`: conversational reply to the seed
#[get("/v1/generate")]
async fn get_generated(data: web::Data<SharedData>, query: web::Query<GenerateParams>) -> impl Responder {
	let bot = query.bot.clone().unwrap_or_else(|| data.catalog.default_bot.clone());

	// First use of a bot reads its whole corpus: keep it off the async workers.
	let shared = data.clone();
	let model = match web::block(move || shared.cache.get_or_train(&bot, &shared.catalog)).await {
		Ok(Ok(m)) => m,
		Ok(Err(e @ ConfigError::UnknownBot(_))) => return HttpResponse::NotFound().body(e.to_string()),
		Ok(Err(e)) => return HttpResponse::InternalServerError().body(e.to_string()),
		Err(_) => return HttpResponse::InternalServerError().body("Training task failed"),
	};

	let seed = query.seed.as_deref().map(str::trim).filter(|s| !s.is_empty());
	let result = match (seed, query.respond.unwrap_or(false)) {
		(None, _) => model.generate(),
		(Some(seed), false) => model.generate_from_key(seed),
		(Some(seed), true) => model.respond(seed, &data.stop_words),
	};

	match result {
		Ok(sentence) => HttpResponse::Ok().body(sentence),
		Err(e) => generate_error_response(e),
	}
}

#[get("/v1/bots")]
async fn get_bots(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.catalog.names().join("\n"))
}

#[get("/v1/loaded_bots")]
async fn get_loaded_bots(data: web::Data<SharedData>) -> impl Responder {
	HttpResponse::Ok().body(data.cache.trained_names().join("\n"))
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<SharedData>) -> impl Responder {
	match list_files(&data.catalog.texts_dir, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpus files"),
	}
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(get_bots)
		.service(get_loaded_bots)
		.service(get_corpora);
}

/// Main entry point for the server.
///
/// Loads the bot catalog and stop words, then serves generation requests.
/// Models are trained on the first request for each bot.
#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let catalog = match &args.catalog {
		Some(path) => BotCatalog::from_file(path)?,
		None => BotCatalog::default(),
	};
	let stop_words = read_stop_words(&args.stop_words).unwrap_or_else(|e| {
		warn!("Cannot read stop words from {}: {e}", args.stop_words.display());
		HashSet::new()
	});

	info!("Serving {} bots on {}:{}", catalog.names().len(), args.host, args.port);
	let shared_data = web::Data::new(SharedData {
		catalog,
		cache: BotCache::new(),
		stop_words,
	});

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.configure(configure)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	Ok(())
}
