use axum::{
    Router,
    extract::{Json, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;

use crate::client::{
    ClientConfig, ControlSnapshot, Controls, FeedbackSwitch, HttpTransport, LogNotifier,
    Orchestrator, RunOutcome, RunSettings, SimulationTransport,
};
use crate::core::{
    AllocationInput, AllocationWeights, Chart, ChartSurface, HORIZON_CHOICES, Presenter,
    RunReport, allocation_labels, normalize,
};

pub type SharedFeedback = Arc<FeedbackSwitch<LogNotifier>>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ChartHandle(u64);

/// In-memory chart surface backing the JSON API.
#[derive(Default)]
pub struct ChartBoard {
    next_id: u64,
    charts: BTreeMap<u64, Chart>,
}

impl ChartBoard {
    pub fn charts(&self) -> Vec<Chart> {
        self.charts.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl ChartSurface for ChartBoard {
    type Handle = ChartHandle;

    fn create(&mut self, chart: Chart) -> ChartHandle {
        self.next_id += 1;
        self.charts.insert(self.next_id, chart);
        ChartHandle(self.next_id)
    }

    fn destroy(&mut self, handle: ChartHandle) {
        self.charts.remove(&handle.0);
    }
}

pub struct AppState<T> {
    orchestrator: Orchestrator<T, SharedFeedback>,
    feedback: SharedFeedback,
    board: Mutex<Presenter<ChartBoard>>,
}

impl<T: SimulationTransport> AppState<T> {
    pub fn new(transport: T, settings: RunSettings, feedback_enabled: bool) -> Self {
        let feedback = Arc::new(FeedbackSwitch::new(LogNotifier, feedback_enabled));
        Self {
            orchestrator: Orchestrator::new(transport, feedback.clone(), settings),
            feedback,
            board: Mutex::new(Presenter::new(ChartBoard::default())),
        }
    }

    fn charts(&self) -> Vec<Chart> {
        self.board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .surface()
            .charts()
    }

    async fn run(&self, controls: Controls) -> Response {
        let mut charts = Vec::new();
        let (outcome, control) = self
            .orchestrator
            .run_with(&controls, |report| {
                let mut presenter = self.board.lock().unwrap_or_else(PoisonError::into_inner);
                presenter.show(report);
                charts = presenter.surface().charts();
            })
            .await;

        match outcome {
            RunOutcome::Completed(report) => json_response(
                StatusCode::OK,
                RunResponse {
                    control,
                    report,
                    charts,
                },
            ),
            RunOutcome::Ignored => {
                error_response(StatusCode::CONFLICT, "Simulation already running")
            }
            RunOutcome::Failed(_) => error_response(StatusCode::BAD_GATEWAY, &control.status),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunResponse {
    control: ControlSnapshot,
    report: RunReport,
    charts: Vec<Chart>,
}

#[derive(Serialize)]
struct ChartsResponse {
    charts: Vec<Chart>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationResponse {
    weights: AllocationWeights,
    labels: [String; 3],
    horizon_choices: [u32; 3],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FeedbackPayload {
    enabled: Option<bool>,
}

#[derive(Serialize)]
struct FeedbackResponse {
    enabled: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router<T: SimulationTransport + 'static>(state: Arc<AppState<T>>) -> Router {
    Router::new()
        .route("/api/run", post(run_handler::<T>))
        .route("/api/state", get(state_handler::<T>))
        .route("/api/charts", get(charts_handler::<T>))
        .route("/api/allocation", get(allocation_handler))
        .route("/api/feedback", post(feedback_handler::<T>))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(port: u16, config: ClientConfig) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = Arc::new(AppState::new(
        HttpTransport::new(config.endpoint.clone()),
        RunSettings::default(),
        config.feedback_enabled,
    ));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    log::info!("riskdeck API listening on http://{addr}");
    log::info!("simulation endpoint: {}", config.endpoint);

    axum::serve(listener, app).await
}

async fn run_handler<T: SimulationTransport + 'static>(
    State(state): State<Arc<AppState<T>>>,
    Json(controls): Json<Controls>,
) -> Response {
    // The run lives on its own task so a client hanging up cannot cancel it.
    let task = tokio::spawn(async move { state.run(controls).await });
    match task.await {
        Ok(response) => response,
        Err(err) => {
            log::error!("simulation task failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Simulation task failed")
        }
    }
}

async fn state_handler<T: SimulationTransport + 'static>(
    State(state): State<Arc<AppState<T>>>,
) -> Response {
    json_response(StatusCode::OK, state.orchestrator.snapshot())
}

async fn charts_handler<T: SimulationTransport + 'static>(
    State(state): State<Arc<AppState<T>>>,
) -> Response {
    json_response(
        StatusCode::OK,
        ChartsResponse {
            charts: state.charts(),
        },
    )
}

async fn allocation_handler(Query(raw): Query<AllocationInput>) -> Response {
    json_response(
        StatusCode::OK,
        AllocationResponse {
            weights: normalize(raw),
            labels: allocation_labels(raw),
            horizon_choices: HORIZON_CHOICES,
        },
    )
}

async fn feedback_handler<T: SimulationTransport + 'static>(
    State(state): State<Arc<AppState<T>>>,
    Json(payload): Json<FeedbackPayload>,
) -> Response {
    let enabled = match payload.enabled {
        Some(enabled) => {
            state.feedback.set_enabled(enabled);
            enabled
        }
        None => state.feedback.toggle(),
    };
    log::info!("feedback {}", if enabled { "enabled" } else { "muted" });
    json_response(StatusCode::OK, FeedbackResponse { enabled })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
