//! Single binary web server: JSON API over the bracket logic.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use tournament_brackets::{
    create_tournament, get_match, get_tournament_view, list_tournaments, record_score,
    GameMatch, MemoryStore, ScoreOutcome, Storage, TournamentError, TournamentId,
};

/// Storage shared by all workers, injected into every handler.
type AppState = Data<dyn Storage>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    players: Vec<String>,
}

#[derive(Deserialize)]
struct SetScoreBody {
    player1_score: u32,
    player2_score: u32,
}

#[derive(Serialize)]
struct SetScoreResponse {
    done: bool,
    outcome: ScoreOutcome,
    #[serde(rename = "match")]
    game: Option<GameMatch>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: String,
}

/// JSON error body with a status picked from the error kind.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.client_message() });
    match e {
        TournamentError::MatchNotFound(_) | TournamentError::TournamentNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::AlreadyScored | TournamentError::BothSlotsFilled => {
            HttpResponse::Conflict().json(body)
        }
        TournamentError::Storage(err) => {
            log::error!("Storage failure: {}", err);
            HttpResponse::InternalServerError().json(body)
        }
        TournamentError::InvalidResult
        | TournamentError::IncompletePlayers
        | TournamentError::MinimumPlayers => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-brackets",
    })
}

/// List all tournaments, oldest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    match list_tournaments(state.get_ref()).await {
        Ok(tournaments) => HttpResponse::Ok().json(tournaments),
        Err(e) => error_response(&e),
    }
}

/// Create a tournament from a name and player names; returns the drawn bracket.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Tournament name is required" }));
    }
    let players: Vec<String> = body
        .players
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    match create_tournament(state.get_ref(), name, &players).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

/// Get a tournament with its bracket (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match get_tournament_view(state.get_ref(), path.id).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match get_match(state.get_ref(), &path.id).await {
        Ok(game) => HttpResponse::Ok().json(game),
        Err(e) => error_response(&e),
    }
}

/// Record a match score; the winner advances (or the tournament finishes).
#[post("/api/matches/{id}/score")]
async fn api_set_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SetScoreBody>,
) -> HttpResponse {
    let store = state.get_ref();
    match record_score(store, &path.id, body.player1_score, body.player2_score).await {
        Ok(outcome) => {
            log::info!("Match {} won by {}", path.id, outcome.winner());
            // The score is committed at this point; a failed re-read only drops the echo.
            let game = get_match(store, &path.id).await.ok();
            HttpResponse::Ok().json(SetScoreResponse {
                done: true,
                outcome,
                game,
            })
        }
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store: std::sync::Arc<dyn Storage> = std::sync::Arc::new(MemoryStore::new());
    let state: AppState = Data::from(store);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_get_match)
            .service(api_set_score)
    })
    .bind(bind)?
    .run()
    .await
}
