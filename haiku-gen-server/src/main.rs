use std::path::PathBuf;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use clap::Parser;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use haiku_gen_core::config::{DEFAULT_MAX_LINE_ATTEMPTS, DEFAULT_MAX_LINE_COUNT};
use haiku_gen_core::model::successor_table::SuccessorTable;
use haiku_gen_core::{GenerationConfig, PoemError, RejectionPolicy, ResourcePaths, Resources};

/// Command-line options of the server
#[derive(Parser)]
#[command(name = "haiku-gen-server", version)]
struct Options {
	/// Directory holding the tables, sentence patterns and corpora
	#[arg(long, default_value = "./data")]
	data_dir: PathBuf,

	/// Corpus imitated by `/v1/haiku` (defaults to the bundled sonnets)
	#[arg(long)]
	corpus: Option<PathBuf>,

	#[arg(long, default_value = "127.0.0.1")]
	bind: String,

	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Highest `max_attempts` a request may ask for, and the default
	#[arg(long, default_value_t = DEFAULT_MAX_LINE_ATTEMPTS)]
	max_attempts: usize,

	/// Highest `lines` a request may ask for
	#[arg(long, default_value_t = DEFAULT_MAX_LINE_COUNT)]
	max_lines: usize,
}

/// Struct representing query parameters for the `/v1/haiku` endpoint
#[derive(Deserialize)]
struct HaikuParams {
	start: String,
	seed: Option<u64>,
	max_attempts: Option<usize>,
	rejection: Option<RejectionPolicy>,
}

/// Struct representing query parameters for the `/v1/freeform` endpoint
#[derive(Deserialize)]
struct FreeformParams {
	theme: String,
	lines: Option<usize>,
	seed: Option<u64>,
}

/// Read-only state shared by every worker; no lock needed.
///
/// `config` holds the server-wide ceilings; a request may lower them but
/// never raise them.
struct SharedData {
	resources: Resources,
	successors: SuccessorTable,
	config: GenerationConfig,
}

/// Per-request configuration: the server's, narrowed by the query.
fn haiku_config(server: &GenerationConfig, query: &HaikuParams) -> Result<GenerationConfig, PoemError> {
	let mut config = server.clone();
	if let Some(attempts) = query.max_attempts {
		if attempts > server.max_line_attempts() {
			return Err(PoemError::InvalidConfig(format!(
				"max_attempts may not exceed {}, got {attempts}",
				server.max_line_attempts()
			)));
		}
		config.set_max_line_attempts(attempts)?;
	}
	if let Some(rejection) = query.rejection {
		config.rejection = rejection;
	}
	Ok(config)
}

/// One generator per request, seeded when the caller wants reproducibility.
fn request_rng(seed: Option<u64>) -> StdRng {
	match seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	}
}

/// Maps a generation error to a response: bad input is the caller's fault,
/// anything else is ours.
fn error_response(e: PoemError) -> HttpResponse {
	match e {
		PoemError::UnknownStartWord(_)
		| PoemError::InvalidStartWord { .. }
		| PoemError::UnknownTheme(_)
		| PoemError::InvalidLineCount(_)
		| PoemError::InvalidConfig(_) => HttpResponse::BadRequest().body(e.to_string()),
		e => {
			error!("generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// Runs a generation off the async workers and turns its outcome into a
/// response.
async fn generate<F>(work: F) -> HttpResponse
where
	F: FnOnce() -> Result<String, PoemError> + Send + 'static,
{
	match web::block(work).await {
		Ok(Ok(poem)) => HttpResponse::Ok().body(poem),
		Ok(Err(e)) => error_response(e),
		Err(e) => {
			error!("generation task failed: {e}");
			HttpResponse::InternalServerError().finish()
		}
	}
}

/// HTTP GET endpoint `/v1/haiku`
///
/// Writes a haiku from the loaded corpus starting with `start`.
#[get("/v1/haiku")]
async fn get_haiku(data: web::Data<SharedData>, query: web::Query<HaikuParams>) -> impl Responder {
	let query = query.into_inner();
	let config = match haiku_config(&data.config, &query) {
		Ok(config) => config,
		Err(e) => return error_response(e),
	};

	generate(move || {
		let mut rng = request_rng(query.seed);
		let poem = data.resources.haiku(&data.successors, &query.start, &config, &mut rng)?;
		Ok(poem.to_string())
	})
	.await
}

/// HTTP GET endpoint `/v1/freeform`
///
/// Writes a freeform poem on `theme`.
#[get("/v1/freeform")]
async fn get_freeform(data: web::Data<SharedData>, query: web::Query<FreeformParams>) -> impl Responder {
	let query = query.into_inner();
	let lines = query.lines.unwrap_or(data.config.default_line_count());

	generate(move || {
		let mut rng = request_rng(query.seed);
		let poem = data.resources.freeform(&query.theme, lines, &data.config, &mut rng)?;
		Ok(poem.to_string())
	})
	.await
}

#[get("/v1/themes")]
async fn get_themes(data: web::Data<SharedData>) -> impl Responder {
	let themes: Vec<&str> = data.resources.themes().themes().collect();
	HttpResponse::Ok().body(themes.join("\n"))
}

/// Main entry point for the server.
///
/// Loads the tables and the corpus once, shares them read-only with every
/// worker, and serves the poem endpoints.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let options = Options::parse();

	let paths = ResourcePaths::default();
	let resources = Resources::load(&options.data_dir, &paths).map_err(std::io::Error::other)?;
	let corpus = options.corpus.unwrap_or_else(|| paths.resolve(&options.data_dir).default_corpus);
	let successors = SuccessorTable::load(&corpus).map_err(std::io::Error::other)?;
	info!("serving on {}:{} with corpus {}", options.bind, options.port, corpus.display());

	let mut config = GenerationConfig::default();
	config.set_max_line_attempts(options.max_attempts).map_err(std::io::Error::other)?;
	config.set_max_line_count(options.max_lines).map_err(std::io::Error::other)?;

	let shared_data = web::Data::new(SharedData { resources, successors, config });

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_haiku)
			.service(get_freeform)
			.service(get_themes)
	})
		.bind((options.bind.as_str(), options.port))?
		.run()
		.await
}

#[cfg(test)]
mod tests {
	use actix_web::http::StatusCode;
	use actix_web::{App, test};

	use haiku_gen_core::lexicon::pattern::SentencePattern;
	use haiku_gen_core::lexicon::pos_table::PosTable;
	use haiku_gen_core::lexicon::theme_table::ThemeTable;
	use haiku_gen_core::model::syllable_table::SyllableTable;

	use super::*;

	fn shared_data() -> web::Data<SharedData> {
		let syllables: SyllableTable = [("sun", 1), ("sets", 1), ("on", 1), ("the", 1), ("sea", 1)].into_iter().collect();
		let parts_of_speech: PosTable = [('A', vec!["quiet"]), ('i', vec!["sleeps"])].into_iter().collect();
		let themes: ThemeTable = [("ocean", vec!["wave"]), ("forest", vec!["moss"])].into_iter().collect();
		let patterns = vec![SentencePattern::parse("The [A] [N] [i].").unwrap()];
		let mut successors = SuccessorTable::new();
		for pair in ["sun", "sets", "on", "the", "sea", "sun"].windows(2) {
			successors.add_transition(pair[0], pair[1]);
		}

		web::Data::new(SharedData {
			resources: Resources::new(syllables, parts_of_speech, themes, patterns),
			successors,
			config: GenerationConfig::default(),
		})
	}

	#[actix_web::test]
	async fn haiku_endpoint_writes_three_lines() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_haiku)).await;
		let request = test::TestRequest::get().uri("/v1/haiku?start=sun&seed=3").to_request();
		let body = test::call_and_read_body(&app, request).await;

		assert_eq!(
			std::str::from_utf8(&body).unwrap(),
			"Sun sets on the sea\nSun sets on the sea sun sets\nOn the sea sun sets"
		);
	}

	#[actix_web::test]
	async fn unknown_start_word_is_a_bad_request() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_haiku)).await;
		let request = test::TestRequest::get().uri("/v1/haiku?start=moon").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn freeform_endpoint_honors_line_count() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_freeform)).await;
		let request = test::TestRequest::get().uri("/v1/freeform?theme=ocean&lines=2").to_request();
		let body = test::call_and_read_body(&app, request).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "The quiet wave sleeps.\nThe quiet wave sleeps.");

		let request = test::TestRequest::get().uri("/v1/freeform?theme=desert").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn attempts_above_the_server_ceiling_are_refused() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_haiku)).await;

		let uri = format!("/v1/haiku?start=sun&max_attempts={}", DEFAULT_MAX_LINE_ATTEMPTS + 1);
		let response = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let request = test::TestRequest::get().uri("/v1/haiku?start=sun&max_attempts=10000000000").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let request = test::TestRequest::get().uri("/v1/haiku?start=sun&max_attempts=0").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let request = test::TestRequest::get().uri("/v1/haiku?start=sun&max_attempts=5").to_request();
		let response = test::call_service(&app, request).await;
		assert_eq!(response.status(), StatusCode::OK);
	}

	#[actix_web::test]
	async fn line_count_above_the_ceiling_is_refused() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_freeform)).await;

		let uri = format!("/v1/freeform?theme=ocean&lines={}", usize::MAX);
		let response = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
		assert_eq!(response.status(), StatusCode::BAD_REQUEST);

		let uri = format!("/v1/freeform?theme=ocean&lines={}", DEFAULT_MAX_LINE_COUNT);
		let body = test::call_and_read_body(&app, test::TestRequest::get().uri(&uri).to_request()).await;
		assert_eq!(std::str::from_utf8(&body).unwrap().lines().count(), DEFAULT_MAX_LINE_COUNT);
	}

	#[actix_web::test]
	async fn themes_are_listed_sorted() {
		let app = test::init_service(App::new().app_data(shared_data()).service(get_themes)).await;
		let request = test::TestRequest::get().uri("/v1/themes").to_request();
		let body = test::call_and_read_body(&app, request).await;
		assert_eq!(std::str::from_utf8(&body).unwrap(), "forest\nocean");
	}
}
