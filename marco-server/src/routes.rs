use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use actix_web::{get, post, put, web, HttpResponse, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::bot::Bot;

/// State shared by every handler.
///
/// The bot sits behind a single `Mutex`: learning, generation and snapshots
/// never interleave.
pub struct AppState {
	pub bot: Mutex<Bot>,
	pub db_path: PathBuf,
}

/// Query parameters of `/v1/message`.
#[derive(Deserialize)]
struct MessageQuery {
	mention: Option<bool>,
}

#[derive(Serialize)]
struct Stats {
	contexts: usize,
	continuations: usize,
	silent: bool,
	unsaved_changes: bool,
}

macro_rules! lock_bot {
	($data:expr) => {
		match $data.bot.lock() {
			Ok(bot) => bot,
			Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
		}
	};
}

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(post_learn)
		.service(post_unlearn)
		.service(get_generated)
		.service(post_message)
		.service(put_save)
		.service(get_stats);
}

/// HTTP POST endpoint `/v1/learn`
///
/// Learns the request body as one message.
#[post("/v1/learn")]
async fn post_learn(data: web::Data<AppState>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::BadRequest().body("Missing or empty text");
	}
	let mut bot = lock_bot!(data);
	bot.learn(&body);
	HttpResponse::Ok().body("Learned provided message.")
}

/// HTTP POST endpoint `/v1/unlearn`
///
/// Retracts the request body. Text that was never learned is accepted too.
#[post("/v1/unlearn")]
async fn post_unlearn(data: web::Data<AppState>, body: String) -> impl Responder {
	if body.trim().is_empty() {
		return HttpResponse::BadRequest().body("Missing or empty text");
	}
	let mut bot = lock_bot!(data);
	bot.unlearn(&body);
	HttpResponse::Ok().body("Unlearned provided message.")
}

/// HTTP GET endpoint `/v1/generate`
///
/// Returns a generated sentence, or `204 No Content` when the model has
/// nothing to say.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<AppState>) -> impl Responder {
	let mut bot = lock_bot!(data);
	match bot.output() {
		Some(text) => HttpResponse::Ok().body(text),
		None => HttpResponse::NoContent().finish(),
	}
}

/// HTTP POST endpoint `/v1/message`
///
/// Feeds a chat message to the bot (command or ordinary text). Returns the
/// reply, or `204 No Content` if the bot stays quiet.
#[post("/v1/message")]
async fn post_message(data: web::Data<AppState>, query: web::Query<MessageQuery>, body: String) -> impl Responder {
	let mut bot = lock_bot!(data);
	match bot.message(&body, query.mention.unwrap_or(false), Instant::now()) {
		Some(reply) => HttpResponse::Ok().body(reply),
		None => HttpResponse::NoContent().finish(),
	}
}

/// HTTP PUT endpoint `/v1/save`
#[put("/v1/save")]
async fn put_save(data: web::Data<AppState>) -> impl Responder {
	let mut bot = lock_bot!(data);
	match bot.save(&data.db_path) {
		Ok(()) => {
			info!("Model saved to {}", data.db_path.display());
			HttpResponse::Ok().body("Model saved")
		}
		Err(e) => {
			error!("Failed to save model: {e}");
			HttpResponse::InternalServerError().body(format!("Failed to save model: {e}"))
		}
	}
}

#[get("/v1/stats")]
async fn get_stats(data: web::Data<AppState>) -> impl Responder {
	let bot = lock_bot!(data);
	HttpResponse::Ok().json(Stats {
		contexts: bot.model().context_count(),
		continuations: bot.model().continuation_count(),
		silent: bot.is_silent(Instant::now()),
		unsaved_changes: bot.is_dirty(),
	})
}
