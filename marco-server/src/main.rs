use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use log::{error, info, warn};
use marco_core::{Markov, MarkovConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;

mod bot;
mod commands;
mod config;
mod routes;

use bot::Bot;
use config::ServerConfig;
use routes::AppState;

/// Loads the model from `path`, or starts an empty one.
///
/// A missing file is expected on first run. A file that cannot be restored
/// is reported and an empty model is used instead; it is overwritten on
/// the next save.
fn load_model(path: &Path, max_walk: usize) -> Markov {
	let mut config = MarkovConfig::default();
	if let Err(e) = config.set_max_walk(max_walk) {
		warn!("{e}, keeping default walk bound");
	}

	if !path.exists() {
		info!("No model at {}, starting empty", path.display());
		return Markov::new(config);
	}

	match Markov::load(path) {
		Ok(mut model) => {
			if let Err(e) = model.set_max_walk(max_walk) {
				warn!("{e}, keeping stored walk bound");
			}
			info!("Loaded model from {} ({} contexts)", path.display(), model.context_count());
			model
		}
		Err(e) => {
			error!("{e}; starting with an empty model");
			Markov::new(config)
		}
	}
}

/// Saves the model if it changed since the last save.
fn autosave(state: &AppState) {
	let mut bot = match state.bot.lock() {
		Ok(bot) => bot,
		Err(_) => {
			error!("Autosave skipped: model lock failed");
			return;
		}
	};
	if !bot.is_dirty() {
		return;
	}
	match bot.save(&state.db_path) {
		Ok(()) => info!("Autosaved model to {}", state.db_path.display()),
		Err(e) => error!("Autosave failed: {e}"),
	}
}

/// Main entry point for the server.
///
/// Loads the model, wraps it in a `Mutex` so learning, generation and
/// snapshots are serialized, and starts an Actix-web HTTP server.
/// The model is saved periodically and once more on shutdown.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::from_env();
	let model = load_model(&config.db_path, config.max_walk);
	let bot = Bot::new(model, config.chat_freq, StdRng::from_os_rng());
	let state = web::Data::new(AppState { bot: Mutex::new(bot), db_path: config.db_path.clone() });

	if let Some(period) = config.autosave {
		let state = state.clone();
		actix_web::rt::spawn(async move {
			let mut interval = actix_web::rt::time::interval(period);
			// the first tick completes immediately
			interval.tick().await;
			loop {
				interval.tick().await;
				autosave(&state);
			}
		});
		info!("Autosave every {}s", period.as_secs());
	}

	info!("Listening on {}:{}", config.host, config.port);
	let app_state = state.clone();
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET", "POST", "PUT"]))
			.app_data(app_state.clone())
			.configure(routes::configure)
	})
	.shutdown_timeout(5)
	.bind((config.host.as_str(), config.port))?
	.run()
	.await?;

	autosave(&state);
	Ok(())
}
