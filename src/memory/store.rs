use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::memory::types::{question_key, LearnedPattern, PatternSource, PatternStats, StoredPattern};

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pattern store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("an owning user is required to upload a pattern")]
    OwnerRequired,
}

/// Persistent memory of question -> answer mappings.
/// Matching policy is exact on the normalized question text.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Best match for the question, if any. A hit counts as a reuse.
    async fn find(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError>;

    /// Same match as `find` without counting a reuse.
    async fn peek(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError>;

    /// Insert, or update the existing entry for the same question and owner.
    async fn save(&self, pattern: LearnedPattern, owner: Option<&str>) -> Result<(), PatternError>;

    /// Every pattern, optionally only those active since `since`.
    async fn all(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LearnedPattern>, PatternError>;

    async fn for_owner(&self, owner: &str) -> Result<Vec<LearnedPattern>, PatternError>;

    async fn stats(&self) -> Result<PatternStats, PatternError>;
}

/// Shared bookkeeping for both store flavours.
#[derive(Debug, Default)]
struct PatternIndex {
    entries: Vec<StoredPattern>,
}

impl PatternIndex {
    /// Position of the best entry for a question: most used, then most confident.
    /// Owners are not considered here: every user shares the same memory, so a
    /// pattern learned from one user's answer is served to all of them.
    fn best(&self, question: &str) -> Option<usize> {
        let key = question_key(question);
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| question_key(&e.pattern.question_pattern) == key)
            .max_by(|(_, a), (_, b)| {
                a.pattern
                    .usage_count
                    .cmp(&b.pattern.usage_count)
                    .then(a.pattern.confidence.total_cmp(&b.pattern.confidence))
            })
            .map(|(i, _)| i)
    }

    fn peek(&self, question: &str) -> Option<LearnedPattern> {
        self.best(question).map(|i| self.entries[i].pattern.clone())
    }

    fn touch_best(&mut self, question: &str) -> Option<LearnedPattern> {
        let i = self.best(question)?;
        let best = &mut self.entries[i];

        best.pattern.usage_count = best.pattern.usage_count.saturating_add(1);
        best.pattern.last_used = Some(Utc::now());
        Some(best.pattern.clone())
    }

    fn upsert(&mut self, mut pattern: LearnedPattern, owner: Option<&str>) {
        pattern.question_pattern = question_key(&pattern.question_pattern);
        let now = Utc::now();

        let existing = self.entries.iter_mut().find(|e| {
            e.owner.as_deref() == owner && e.pattern.question_pattern == pattern.question_pattern
        });

        match existing {
            Some(entry) => {
                let kept = &mut entry.pattern;
                kept.intent = pattern.intent;
                kept.canonical_key = pattern.canonical_key.or(kept.canonical_key.take());
                kept.field_type = pattern.field_type;
                kept.confidence = pattern.confidence;
                kept.source = pattern.source;
                kept.answer_mappings = pattern.answer_mappings;
                kept.last_used = Some(now);
            }
            None => {
                pattern.created_at.get_or_insert(now);
                pattern.last_used.get_or_insert(now);
                self.entries.push(StoredPattern {
                    id: Uuid::new_v4(),
                    owner: owner.map(str::to_string),
                    pattern,
                });
            }
        }
    }

    fn since(&self, since: Option<DateTime<Utc>>) -> Vec<LearnedPattern> {
        self.entries
            .iter()
            .filter(|e| match since {
                Some(t) => e.pattern.last_activity().map_or(false, |a| a >= t),
                None => true,
            })
            .map(|e| e.pattern.clone())
            .collect()
    }

    fn owned_by(&self, owner: &str) -> Vec<LearnedPattern> {
        self.entries
            .iter()
            .filter(|e| e.owner.as_deref() == Some(owner))
            .map(|e| e.pattern.clone())
            .collect()
    }

    fn stats(&self) -> PatternStats {
        let mut stats = PatternStats {
            total_patterns: self.entries.len(),
            ..PatternStats::default()
        };
        let mut owners = HashSet::new();

        for entry in &self.entries {
            stats.total_usage += u64::from(entry.pattern.usage_count);
            match entry.pattern.source {
                PatternSource::Ai => stats.ai_learned += 1,
                PatternSource::Manual => stats.manual += 1,
            }
            *stats.by_intent.entry(entry.pattern.intent).or_insert(0) += 1;
            if let Some(owner) = &entry.owner {
                owners.insert(owner.as_str());
            }
        }
        stats.owners = owners.len();
        stats
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    index: RwLock<PatternIndex>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn find(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError> {
        Ok(self.index.write().await.touch_best(question))
    }

    async fn peek(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.peek(question))
    }

    async fn save(&self, pattern: LearnedPattern, owner: Option<&str>) -> Result<(), PatternError> {
        self.index.write().await.upsert(pattern, owner);
        Ok(())
    }

    async fn all(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.since(since))
    }

    async fn for_owner(&self, owner: &str) -> Result<Vec<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.owned_by(owner))
    }

    async fn stats(&self) -> Result<PatternStats, PatternError> {
        Ok(self.index.read().await.stats())
    }
}

/// JSON snapshot on disk, rewritten after every mutation.
#[derive(Debug)]
pub struct FilePatternStore {
    path: PathBuf,
    index: RwLock<PatternIndex>,
}

impl FilePatternStore {
    /// Opens the store, loading the snapshot if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, PatternError> {
        let path = path.into();
        let entries: Vec<StoredPattern> = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), patterns = entries.len(), "pattern store loaded");

        Ok(Self {
            path,
            index: RwLock::new(PatternIndex { entries }),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    async fn persist(&self, index: &PatternIndex) -> Result<(), PatternError> {
        let json = serde_json::to_string_pretty(&index.entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl PatternStore for FilePatternStore {
    async fn find(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError> {
        let mut index = self.index.write().await;
        let hit = index.touch_best(question);
        if hit.is_some() {
            // Usage counts are bookkeeping; a failed write must not hide the hit.
            if let Err(e) = self.persist(&index).await {
                warn!(path = %self.path.display(), "failed to persist usage count: {}", e);
            }
        }
        Ok(hit)
    }

    async fn peek(&self, question: &str) -> Result<Option<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.peek(question))
    }

    async fn save(&self, pattern: LearnedPattern, owner: Option<&str>) -> Result<(), PatternError> {
        let mut index = self.index.write().await;
        index.upsert(pattern, owner);
        self.persist(&index).await
    }

    async fn all(&self, since: Option<DateTime<Utc>>) -> Result<Vec<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.since(since))
    }

    async fn for_owner(&self, owner: &str) -> Result<Vec<LearnedPattern>, PatternError> {
        Ok(self.index.read().await.owned_by(owner))
    }

    async fn stats(&self) -> Result<PatternStats, PatternError> {
        Ok(self.index.read().await.stats())
    }
}
