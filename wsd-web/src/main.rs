//! Servidor web Axum com WebSocket para desambiguação de sentidos em tempo real

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsd_core::{
    corpus::{demo_sentences, StaticCorpus},
    resources::{demo_resources, WsdResources},
    Disambiguation, Evaluator, StrategyKind, WsdConfig, WsdEngine, WsdError, WsdEvent,
};

/// Estado compartilhado da aplicação: um orquestrador por estratégia.
struct AppState {
    resources: Arc<WsdResources>,
    lesk: WsdEngine,
    ims: WsdEngine,
    default_strategy: StrategyKind,
}

impl AppState {
    fn engine(&self, strategy: Option<StrategyKind>) -> &WsdEngine {
        match strategy.unwrap_or(self.default_strategy) {
            StrategyKind::Lesk => &self.lesk,
            StrategyKind::Ims => &self.ims,
        }
    }
}

#[derive(Deserialize)]
struct DisambiguateRequest {
    text: String,
    #[serde(default)]
    strategy: Option<StrategyKind>,
    /// Intervalo `{start, end}` de tokens; ausente = sentença inteira.
    #[serde(default)]
    span: Option<Range<usize>>,
}

#[derive(Serialize)]
struct TokenResult {
    word: String,
    tag: String,
    lemma: String,
    result: Disambiguation,
}

#[derive(Serialize)]
struct DisambiguateResponse {
    strategy: String,
    tokens: Vec<TokenResult>,
    processing_ms: u64,
}

#[derive(Deserialize)]
struct EvaluateQuery {
    #[serde(default)]
    strategy: Option<StrategyKind>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WsdConfig::load()?;
    let resources = Arc::new(demo_resources());
    let state = Arc::new(AppState {
        lesk: config.build_engine_for(StrategyKind::Lesk, Arc::clone(&resources)),
        ims: config.build_engine_for(StrategyKind::Ims, Arc::clone(&resources)),
        resources,
        default_strategy: config.strategy,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/disambiguate", post(disambiguate_handler))
        .route("/ws", get(ws_handler))
        .route("/demo-sentences", get(demo_sentences_handler))
        .route("/evaluate", get(evaluate_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("🚀 Servidor WSD iniciado em http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Converte um erro do motor em resposta HTTP.
fn error_response(e: &WsdError) -> Response {
    let status = match e {
        WsdError::OutOfRange { .. }
        | WsdError::LengthMismatch { .. }
        | WsdError::InvalidSpan { .. }
        | WsdError::InvalidSenseKey(_) => StatusCode::BAD_REQUEST,
        WsdError::NotConfigured | WsdError::InventoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

/// Desambiguação via HTTP POST (sem streaming)
async fn disambiguate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DisambiguateRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    let start = Instant::now();
    let analyzed = state.resources.pipeline.analyze(&req.text);
    let span = req.span.unwrap_or(0..analyzed.words.len());
    let engine = state.engine(req.strategy);

    match engine.disambiguate_span(&analyzed.words, &analyzed.tags, &analyzed.lemmas, span.clone()) {
        Ok(results) => {
            let tokens = span
                .zip(results)
                .map(|(i, result)| TokenResult {
                    word: analyzed.words[i].clone(),
                    tag: analyzed.tags[i].clone(),
                    lemma: analyzed.lemmas[i].clone(),
                    result,
                })
                .collect();
            Json(DisambiguateResponse {
                strategy: engine.strategy_name().unwrap_or_default().to_string(),
                tokens,
                processing_ms: start.elapsed().as_millis() as u64,
            })
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "falha na desambiguação");
            error_response(&e)
        }
    }
}

/// Retorna sentenças de demonstração
async fn demo_sentences_handler() -> impl IntoResponse {
    let sentences: Vec<serde_json::Value> = demo_sentences()
        .iter()
        .map(|(domain, text)| {
            serde_json::json!({
                "domain": domain,
                "text": text
            })
        })
        .collect();
    Json(sentences)
}

/// Avalia a estratégia sobre o corpus embutido
async fn evaluate_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EvaluateQuery>,
) -> Response {
    let outcome = tokio::task::spawn_blocking(move || {
        let mut evaluator = Evaluator::new(state.engine(query.strategy));
        evaluator.evaluate_corpus(&StaticCorpus::new())?;
        Ok::<_, WsdError>(evaluator.report())
    })
    .await;

    match outcome {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
    #[serde(default)]
    strategy: Option<StrategyKind>,
}

/// Lógica do WebSocket: recebe texto, executa o motor e envia eventos em tempo real
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // JSON {text, strategy}; senão o texto puro com a estratégia padrão
                let (text, strategy) = match serde_json::from_str::<WsRequest>(&text) {
                    Ok(req) => (req.text.trim().to_string(), req.strategy),
                    Err(_) => (text.trim().to_string(), None),
                };
                if text.is_empty() {
                    continue;
                }

                info!("Desambiguando via WebSocket [{:?}]: {} chars", strategy, text.len());

                let (tx, rx) = std::sync::mpsc::channel::<WsdEvent>();
                let state_for_thread = Arc::clone(&state);

                // O motor é síncrono: roda fora do runtime
                let handle = tokio::task::spawn_blocking(move || {
                    let analyzed = state_for_thread.resources.pipeline.analyze(&text);
                    let span = 0..analyzed.words.len();
                    state_for_thread.engine(strategy).disambiguate_streaming(
                        &analyzed.words,
                        &analyzed.tags,
                        &analyzed.lemmas,
                        span,
                        tx,
                    );
                });
                handle.await.ok();

                let events: Vec<WsdEvent> = rx.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pausa para a animação passo a passo no cliente
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
