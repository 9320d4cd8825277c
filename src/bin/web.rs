//! Single binary web server: operator console API for one match table.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; see `team_balancer_web::config` for the environment variables.

use actix_web::{
    get, post, put,
    web::{Data, Json, Query},
    App, HttpResponse, HttpServer, Responder,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use team_balancer_web::{
    spawn_submission, AppConfig, BalanceClient, Console, CredentialStore, FileCredentialStore,
    HttpSubmissionGateway, MemoryCredentialStore, OutcomeError, Player, ScoringApi, Side, Teams,
};

type Store = Box<dyn CredentialStore + Send>;

/// One console: a single operator drives it at a time.
type AppState = Data<Mutex<Console<Store>>>;

/// How often display timers (success banner, confetti, dimming) are checked.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct BalanceBody {
    players: Vec<Player>,
    #[serde(default)]
    randomness: u32,
}

#[derive(Deserialize)]
struct NationsQuery {
    seed: Option<u64>,
}

#[derive(Deserialize)]
struct SelectTeamBody {
    team: Side,
}

#[derive(Deserialize)]
struct CredentialBody {
    secret: String,
}

fn error_json(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, Console<Store>>, HttpResponse> {
    state
        .lock()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))
}

fn snapshot(state: &AppState) -> HttpResponse {
    match lock(state) {
        Ok(g) => HttpResponse::Ok().json(g.snapshot()),
        Err(resp) => resp,
    }
}

/// Run one operator action. An outcome it produced is sent on a detached task, so a
/// client that disconnects mid-request cannot strand the console in `submitting`.
/// The response is the state right after the action; poll `/api/console` for the result.
fn outcome_action<F>(state: &AppState, gateway: &Data<HttpSubmissionGateway>, action: F) -> HttpResponse
where
    F: FnOnce(&mut Console<Store>) -> Result<(), OutcomeError>,
{
    {
        let mut g = match lock(state) {
            Ok(g) => g,
            Err(resp) => return resp,
        };
        if let Err(e) = action(&mut g) {
            return HttpResponse::BadRequest().json(error_json(e));
        }
    }
    if spawn_submission(state.clone().into_inner(), gateway.clone().into_inner()).is_some() {
        log::debug!("result dispatched to the scoring service");
    }
    snapshot(state)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-balancer-web",
    })
}

/// Current teams, fairness report and outcome view.
#[get("/api/console")]
async fn api_get_console(state: AppState) -> HttpResponse {
    snapshot(&state)
}

/// Display a split produced elsewhere.
#[put("/api/console/teams")]
async fn api_set_teams(state: AppState, body: Json<Teams>) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.show_teams(body.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(g.snapshot()),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Ask the balancing service for a split and display it.
#[post("/api/console/balance")]
async fn api_balance(state: AppState, balancer: Data<BalanceClient>, body: Json<BalanceBody>) -> HttpResponse {
    if body.players.is_empty() {
        return HttpResponse::BadRequest().json(error_json("Please add players first"));
    }
    let teams = match balancer.balance(&body.players, body.randomness).await {
        Ok(t) => t,
        Err(e) => return HttpResponse::BadGateway().json(error_json(e)),
    };
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.show_teams(teams) {
        Ok(()) => HttpResponse::Ok().json(g.snapshot()),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Nickname → score lookup from the scoring service, for roster suggestions.
#[get("/api/scores")]
async fn api_scores(balancer: Data<BalanceClient>) -> HttpResponse {
    match balancer.score_snapshot().await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => HttpResponse::BadGateway().json(error_json(e)),
    }
}

/// Nation assignment for the displayed teams. `?seed=` makes it reproducible.
#[get("/api/console/nations")]
async fn api_nations(state: AppState, query: Query<NationsQuery>) -> HttpResponse {
    let g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    match g.nations(&mut rng) {
        Ok(a) => HttpResponse::Ok().json(serde_json::json!({ "pairings": a.pairings })),
        Err(e) => HttpResponse::BadRequest().json(error_json(e)),
    }
}

/// Declare (or deselect) the winning team.
#[post("/api/outcome/select")]
async fn api_select_team(
    state: AppState,
    gateway: Data<HttpSubmissionGateway>,
    body: Json<SelectTeamBody>,
) -> HttpResponse {
    let team = body.team;
    outcome_action(&state, &gateway, |c| c.controller_mut().select_team(team))
}

/// Answer the credential prompt.
#[post("/api/outcome/credential")]
async fn api_provide_credential(
    state: AppState,
    gateway: Data<HttpSubmissionGateway>,
    body: Json<CredentialBody>,
) -> HttpResponse {
    let secret = body.into_inner().secret;
    outcome_action(&state, &gateway, |c| c.controller_mut().provide_credential(&secret))
}

#[post("/api/outcome/cancel")]
async fn api_cancel_prompt(state: AppState, gateway: Data<HttpSubmissionGateway>) -> HttpResponse {
    outcome_action(&state, &gateway, |c| c.controller_mut().cancel_credential_prompt())
}

#[post("/api/outcome/retry")]
async fn api_retry(state: AppState, gateway: Data<HttpSubmissionGateway>) -> HttpResponse {
    outcome_action(&state, &gateway, |c| c.controller_mut().retry())
}

/// Clear the cached admin credential.
#[post("/api/outcome/logout")]
async fn api_logout(state: AppState) -> HttpResponse {
    let mut g = match lock(&state) {
        Ok(g) => g,
        Err(resp) => return resp,
    };
    match g.controller_mut().forget_credential() {
        Ok(()) => HttpResponse::Ok().json(g.snapshot()),
        Err(e) => HttpResponse::InternalServerError().json(error_json(e)),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Scoring service at {}", config.scoring_api_url);

    let api = ScoringApi::new(config.scoring_api_url.clone(), config.api_timeout).map_err(std::io::Error::other)?;
    let gateway = Data::new(HttpSubmissionGateway::new(api.clone()));
    let balancer = Data::new(BalanceClient::new(api));

    let store: Store = match &config.credential_file {
        Some(path) => {
            log::info!("Caching admin credential in {}", path.display());
            Box::new(FileCredentialStore::new(path))
        }
        None => Box::new(MemoryCredentialStore::new()),
    };
    let state = Data::new(Mutex::new(Console::new(store, config.outcome, config.thresholds)));

    // Background task: fire success/confetti/dim timers
    let state_timers = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            let mut g = match state_timers.lock() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            g.controller_mut().tick();
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(gateway.clone())
            .app_data(balancer.clone())
            .service(api_health)
            .service(api_get_console)
            .service(api_set_teams)
            .service(api_balance)
            .service(api_scores)
            .service(api_nations)
            .service(api_select_team)
            .service(api_provide_credential)
            .service(api_cancel_prompt)
            .service(api_retry)
            .service(api_logout)
    })
    .bind(bind)?
    .run()
    .await
}
