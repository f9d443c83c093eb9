//! Single binary web server: JSON API over an in-memory tournament store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, RUST_LOG,
//! MATCH_TIME_SECS (default timer duration offered to clients).

use actix_web::{
    delete, get, post, put,
    web::{Bytes, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use karate_bracket_web::config::ServerConfig;
use karate_bracket_web::timer::{format_clock, TimerPreset, TIMER_PRESETS};
use karate_bracket_web::{
    add_player, bracket_summary, clear_senshu, complete_match, create_tournament,
    delete_tournament, generate_bracket, import_roster, record_point, remove_player,
    rename_player, shuffle_seeds, start_match, toggle_senshu, ErrorKind, MatchId, MemoryStore,
    PlayerId, PointChange, ScoreCategory, Store, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// One store for the whole process; every request takes the write lock, so
/// operations never interleave.
type AppState = Data<RwLock<MemoryStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    size: u32,
}

#[derive(Deserialize)]
struct PlayerNameBody {
    name: String,
}

#[derive(Deserialize)]
struct RecordPointBody {
    player_id: PlayerId,
    category: ScoreCategory,
    #[serde(default)]
    change: PointChange,
}

#[derive(Deserialize)]
struct SenshuBody {
    player_id: PlayerId,
}

#[derive(Serialize)]
struct TimerPresetsResponse {
    default_seconds: u32,
    default_label: String,
    presets: &'static [TimerPreset],
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct RoundPath {
    id: TournamentId,
    round: u32,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body),
    }
}

/// Run `op` against the store under the write lock and render the result as JSON.
fn with_store<T, F>(state: &AppState, op: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut MemoryStore) -> Result<T, TournamentError>,
{
    let mut store = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match op(&mut *store) {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::debug!("Request rejected: {}", e);
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "karate-bracket-web",
    })
}

/// List tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    with_store(&state, |store| Ok(store.tournaments()))
}

/// Create a tournament (size 16 or 32). The client keeps the returned id.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    with_store(&state, |store| create_tournament(store, &body.name, body.size))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| store.tournament(path.id))
}

/// Delete a tournament with its players and matches.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| {
        delete_tournament(store, path.id)?;
        Ok(serde_json::json!({ "deleted": path.id }))
    })
}

/// Players in seed order.
#[get("/api/tournaments/{id}/players")]
async fn api_list_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| {
        store.tournament(path.id)?;
        Ok(store.players_by_tournament(path.id))
    })
}

/// Register a player (tournament must be in Setup).
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    with_store(&state, |store| add_player(store, path.id, &body.name))
}

/// Import players from a CSV body, one name per row.
#[post("/api/tournaments/{id}/players/import")]
async fn api_import_players(state: AppState, path: Path<TournamentPath>, body: Bytes) -> HttpResponse {
    with_store(&state, |store| import_roster(store, path.id, &body[..]))
}

/// Randomize seed positions (Setup only).
#[post("/api/tournaments/{id}/players/shuffle")]
async fn api_shuffle_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| shuffle_seeds(store, path.id))
}

#[put("/api/tournaments/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<PlayerNameBody>,
) -> HttpResponse {
    with_store(&state, |store| {
        if store.player(path.player_id)?.tournament_id != path.id {
            return Err(TournamentError::PlayerNotFound(path.player_id));
        }
        rename_player(store, path.player_id, &body.name)
    })
}

/// Remove a player (Setup only); later seeds move up.
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_remove_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    with_store(&state, |store| {
        if store.player(path.player_id)?.tournament_id != path.id {
            return Err(TournamentError::PlayerNotFound(path.player_id));
        }
        remove_player(store, path.player_id)?;
        Ok(store.players_by_tournament(path.id))
    })
}

/// Generate the bracket and start the tournament.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| {
        generate_bracket(store, path.id)?;
        bracket_summary(&*store, path.id)
    })
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_get_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| bracket_summary(&*store, path.id))
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_store(&state, |store| {
        store.tournament(path.id)?;
        Ok(store.matches_by_tournament(path.id))
    })
}

#[get("/api/tournaments/{id}/rounds/{round}/matches")]
async fn api_list_round_matches(state: AppState, path: Path<RoundPath>) -> HttpResponse {
    with_store(&state, |store| {
        store.tournament(path.id)?;
        Ok(store.matches_by_round(path.id, path.round))
    })
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_store(&state, |store| store.get_match(path.id))
}

#[post("/api/matches/{id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_store(&state, |store| start_match(store, path.id))
}

/// Add or remove ippon/wazari/yuko/warning for one player.
#[post("/api/matches/{id}/points")]
async fn api_record_point(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordPointBody>,
) -> HttpResponse {
    with_store(&state, |store| {
        record_point(store, path.id, body.player_id, body.category, body.change)
    })
}

#[post("/api/matches/{id}/senshu")]
async fn api_toggle_senshu(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SenshuBody>,
) -> HttpResponse {
    with_store(&state, |store| toggle_senshu(store, path.id, body.player_id))
}

#[delete("/api/matches/{id}/senshu")]
async fn api_clear_senshu(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_store(&state, |store| clear_senshu(store, path.id))
}

/// Complete on the current score; ties need senshu.
#[post("/api/matches/{id}/complete")]
async fn api_complete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_store(&state, |store| complete_match(store, path.id))
}

#[get("/api/timer/presets")]
async fn api_timer_presets(config: Data<ServerConfig>) -> HttpResponse {
    HttpResponse::Ok().json(TimerPresetsResponse {
        default_seconds: config.match_time_secs,
        default_label: format_clock(config.match_time_secs),
        presets: &TIMER_PRESETS,
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = ServerConfig::from_env();
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(MemoryStore::new()));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_list_players)
            .service(api_add_player)
            .service(api_import_players)
            .service(api_shuffle_players)
            .service(api_rename_player)
            .service(api_remove_player)
            .service(api_generate_bracket)
            .service(api_get_bracket)
            .service(api_list_matches)
            .service(api_list_round_matches)
            .service(api_get_match)
            .service(api_start_match)
            .service(api_record_point)
            .service(api_toggle_senshu)
            .service(api_clear_senshu)
            .service(api_complete_match)
            .service(api_timer_presets)
    })
    .bind(bind)?
    .run()
    .await
}
