use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::answer::{AnswerPolicy, Intent, Prediction, PredictionRequest, PredictionResponse, Predictor};
use crate::config::ServiceConfig;
use crate::memory::{
    FilePatternStore, InMemoryPatternStore, LearnedPattern, PatternError, PatternStats, PatternStore,
};
use crate::services::llm::BedrockClient;
use crate::telemetry::{
    ExtensionRunReport, ExtensionRunSummary, OutcomeKind, PatternEventKind, TelemetryEvent,
    TelemetryRecorder, TelemetrySnapshot,
};

const REASON_PATTERN_MEMORY: &str = "Retrieved from Pattern Memory";

/// Read-through cache in front of the [`Predictor`]:
/// pattern memory lookup -> model on miss -> best-effort write-back.
pub struct PredictionService {
    store: Arc<dyn PatternStore>,
    predictor: Arc<Predictor>,
    telemetry: Arc<Mutex<TelemetryRecorder>>,
    pattern_confidence: f64,
}

impl PredictionService {
    pub fn new(store: Arc<dyn PatternStore>, predictor: Arc<Predictor>, pattern_confidence: f64) -> Self {
        Self {
            store,
            predictor,
            telemetry: Arc::new(Mutex::new(TelemetryRecorder::new())),
            pattern_confidence,
        }
    }

    /// Wires the Bedrock client and the configured pattern store.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, PatternError> {
        let client = Arc::new(BedrockClient::new(&config.inference));
        let predictor = Predictor::new(client, Arc::new(AnswerPolicy::new()), config.inference.timeout);

        let store: Arc<dyn PatternStore> = match &config.pattern_store_path {
            Some(path) => Arc::new(FilePatternStore::open(path).await?),
            None => Arc::new(InMemoryPatternStore::new()),
        };

        Ok(Self::new(store, Arc::new(predictor), config.pattern_memory_confidence))
    }

    pub fn store(&self) -> &Arc<dyn PatternStore> {
        &self.store
    }

    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        let started = Instant::now();

        // 1. Pattern memory
        if let Some(response) = self.recall(request).await {
            self.record_prediction(OutcomeKind::PatternHit, response.intent, started);
            return response;
        }

        // 2. Model
        let prediction = self.compute(request).await;
        self.record_prediction(prediction.path.into(), prediction.response.intent, started);

        // 3. Learn, without holding up the caller
        if prediction.response.is_usable() {
            let pattern = LearnedPattern::from_prediction(request, &prediction.response);
            self.spawn_learn(pattern, request.user_email.clone());
        }

        prediction.response
    }

    /// Lookup step. Store failures are logged and treated as a miss.
    pub async fn recall(&self, request: &PredictionRequest) -> Option<PredictionResponse> {
        let pattern = match self.store.find(&request.question).await {
            Ok(found) => found,
            Err(e) => {
                warn!("pattern lookup failed: {}", e);
                self.record(TelemetryEvent::PatternMemory { kind: PatternEventKind::LookupFailed });
                None
            }
        };

        let hit = pattern.and_then(|p| {
            p.recalled_answer().map(|answer| PredictionResponse {
                answer: answer.to_string(),
                confidence: self.pattern_confidence,
                reasoning: Some(REASON_PATTERN_MEMORY.to_string()),
                intent: p.intent,
            })
        });

        let kind = if hit.is_some() { PatternEventKind::Hit } else { PatternEventKind::Miss };
        self.record(TelemetryEvent::PatternMemory { kind });
        hit
    }

    /// Compute step.
    pub async fn compute(&self, request: &PredictionRequest) -> Prediction {
        self.predictor.predict_detailed(request).await
    }

    /// Persist step, awaited. `predict` runs this detached.
    pub async fn learn(&self, pattern: LearnedPattern, owner: Option<&str>) -> Result<(), PatternError> {
        persist_pattern(&self.store, &self.telemetry, pattern, owner).await
    }

    fn spawn_learn(&self, pattern: LearnedPattern, owner: Option<String>) {
        let store = Arc::clone(&self.store);
        let telemetry = Arc::clone(&self.telemetry);

        tokio::spawn(async move {
            // Learning is an optimization; the response has already gone out.
            let _ = persist_pattern(&store, &telemetry, pattern, owner.as_deref()).await;
        });
    }

    /// Manual upload of a curated pattern. Requires an owner.
    pub async fn upload_pattern(&self, pattern: LearnedPattern, owner: Option<&str>) -> Result<(), PatternError> {
        let owner = owner
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .ok_or(PatternError::OwnerRequired)?;
        self.store.save(pattern, Some(owner)).await?;
        info!("pattern uploaded");
        Ok(())
    }

    /// Zero or one best match; does not count as a reuse.
    pub async fn search_patterns(&self, query: &str) -> Result<Vec<LearnedPattern>, PatternError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.peek(query).await?.into_iter().collect())
    }

    pub async fn pattern_stats(&self) -> Result<PatternStats, PatternError> {
        self.store.stats().await
    }

    pub async fn sync_patterns(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LearnedPattern>, PatternError> {
        self.store.all(since).await
    }

    pub async fn user_patterns(&self, owner: &str) -> Result<Vec<LearnedPattern>, PatternError> {
        self.store.for_owner(owner).await
    }

    /// Logs an extension usage report and keeps its content-free summary.
    pub fn record_extension_run(&self, report: &ExtensionRunReport) -> ExtensionRunSummary {
        let summary = ExtensionRunSummary::from(report);
        info!(
            questions = summary.total_questions,
            ai_calls = summary.ai_calls,
            learned_used = summary.learned_patterns_used,
            filled = summary.filled_success,
            failed = summary.filled_failed,
            total_ms = summary.total_process_ms,
            "extension run reported"
        );
        self.record(TelemetryEvent::ExtensionRun(summary));
        summary
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .snapshot()
    }

    fn record_prediction(&self, outcome: OutcomeKind, intent: Intent, started: Instant) {
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(?outcome, %intent, latency_ms, "prediction finished");
        self.record(TelemetryEvent::Prediction { outcome, intent, latency_ms });
    }

    fn record(&self, event: TelemetryEvent) {
        record_event(&self.telemetry, event);
    }
}

async fn persist_pattern(
    store: &Arc<dyn PatternStore>,
    telemetry: &Arc<Mutex<TelemetryRecorder>>,
    pattern: LearnedPattern,
    owner: Option<&str>,
) -> Result<(), PatternError> {
    match store.save(pattern, owner).await {
        Ok(()) => {
            record_event(telemetry, TelemetryEvent::PatternMemory { kind: PatternEventKind::Learned });
            Ok(())
        }
        Err(e) => {
            warn!("failed to persist learned pattern: {}", e);
            record_event(telemetry, TelemetryEvent::PatternMemory { kind: PatternEventKind::PersistFailed });
            Err(e)
        }
    }
}

fn record_event(telemetry: &Mutex<TelemetryRecorder>, event: TelemetryEvent) {
    telemetry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .record(event);
}
