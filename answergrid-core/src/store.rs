//! Activity storage: the persisted document contract and a shared store.
//!
//! [`ActivityDocument`] is the exchange shape any storage backend must
//! round-trip exactly: the grid is `grid_size` plus `grid_size²` row-major
//! strings (an empty string is an unpainted cell, not an absent one), and
//! option colors travel JSON-encoded exactly as the editor persists them.
//! [`ActivityStore`] is a thread-safe in-memory store with optional JSON
//! filesystem persistence, shared across whatever frontends open activities.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::PaintColor;
use crate::error::{CoreError, CoreResult};
use crate::grid::GridSnapshot;
use crate::question::{AnswerOption, OptionId, Question, QuestionId, QuestionKind};
use crate::session::EditorSession;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The internal lock was poisoned by a panicking thread.
    #[error("Lock poisoned")]
    LockPoisoned,
    /// The requested activity does not exist.
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// One stored answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDocument {
    /// Option UUID as a string.
    pub id: String,
    /// Option text.
    pub text: String,
    /// The literal answer token.
    pub answer: String,
    /// JSON-encoded display color. May be empty or malformed; both decode
    /// to "no color" rather than an error.
    pub color: String,
}

/// One stored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDocument {
    /// Question UUID as a string.
    pub id: String,
    /// Question text.
    pub text: String,
    /// `"single"` or `"multiple"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// UUID of the correct option (meaningful for multiple-choice).
    pub correct_option_id: String,
    /// The options, in display order.
    pub options: Vec<OptionDocument>,
}

/// The full persisted shape of one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDocument {
    /// Storage identifier.
    pub id: String,
    /// Activity title.
    pub title: String,
    /// Grid dimension (cells per side).
    pub grid_size: usize,
    /// Row-major cell tokens, exactly `grid_size²` entries.
    pub grid_data: Vec<String>,
    /// The questions, in display order.
    pub questions: Vec<QuestionDocument>,
}

impl ActivityDocument {
    /// Capture a session's committed state as a document.
    #[must_use]
    pub fn from_session(id: impl Into<String>, session: &EditorSession) -> Self {
        let grid = session.committed_grid();
        Self {
            id: id.into(),
            title: session.title().to_string(),
            grid_size: grid.size(),
            grid_data: grid.cells().to_vec(),
            questions: session.questions().iter().map(question_to_doc).collect(),
        }
    }

    /// Rebuild the in-memory model from this document.
    ///
    /// Option colors decode leniently: a missing or malformed color becomes
    /// "no color" and the option is skipped downstream instead of failing
    /// the load.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::GridShape`] when the cell data does not match
    /// the declared dimension, and [`CoreError::InvalidDocument`] for
    /// malformed IDs, an unknown question kind, or a multiple-choice
    /// question without options.
    pub fn into_model(&self) -> CoreResult<(String, GridSnapshot, Vec<Question>)> {
        let grid = GridSnapshot::from_parts(self.grid_size, self.grid_data.clone())?;
        let questions = self
            .questions
            .iter()
            .map(question_from_doc)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok((self.title.clone(), grid, questions))
    }

    /// Load this document into a session, overwriting its history.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of [`into_model`](Self::into_model).
    pub fn apply_to_session(&self, session: &mut EditorSession) -> CoreResult<()> {
        let (title, grid, questions) = self.into_model()?;
        session.load_activity(title, grid, questions);
        Ok(())
    }
}

/// Serialize one question into its stored shape.
fn question_to_doc(question: &Question) -> QuestionDocument {
    let (kind, correct_option_id, colors): (&str, String, HashMap<OptionId, PaintColor>) =
        match &question.kind {
            QuestionKind::Single { option, color } => {
                let mut colors = HashMap::new();
                if let Some(color) = color {
                    colors.insert(option.id, color.clone());
                }
                ("single", option.id.to_string(), colors)
            }
            QuestionKind::Multiple {
                option_colors,
                correct_option,
                ..
            } => ("multiple", correct_option.to_string(), option_colors.clone()),
        };

    let options = question
        .options()
        .iter()
        .map(|option| OptionDocument {
            id: option.id.to_string(),
            text: option.text.clone(),
            answer: option.answer.clone(),
            color: colors
                .get(&option.id)
                .and_then(|c| serde_json::to_string(c).ok())
                .unwrap_or_default(),
        })
        .collect();

    QuestionDocument {
        id: question.id.to_string(),
        text: question.text.clone(),
        kind: kind.to_string(),
        correct_option_id,
        options,
    }
}

/// Decode a stored color, treating anything unparseable as "no color".
fn decode_color(raw: &str, option_id: &str) -> Option<PaintColor> {
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str::<PaintColor>(raw) {
        Ok(color) => Some(color),
        Err(e) => {
            tracing::warn!(option = option_id, "Unparseable stored color, dropping: {e}");
            None
        }
    }
}

/// Rebuild one question from its stored shape.
fn question_from_doc(doc: &QuestionDocument) -> CoreResult<Question> {
    let id = Uuid::parse_str(&doc.id)
        .map(QuestionId::from_uuid)
        .map_err(|e| CoreError::InvalidDocument(format!("question id {}: {e}", doc.id)))?;

    let mut options = Vec::with_capacity(doc.options.len());
    let mut colors: HashMap<OptionId, PaintColor> = HashMap::new();
    for option_doc in &doc.options {
        let option_id = Uuid::parse_str(&option_doc.id)
            .map(OptionId::from_uuid)
            .map_err(|e| CoreError::InvalidDocument(format!("option id {}: {e}", option_doc.id)))?;
        if let Some(color) = decode_color(&option_doc.color, &option_doc.id) {
            colors.insert(option_id, color);
        }
        options.push(AnswerOption {
            id: option_id,
            text: option_doc.text.clone(),
            answer: option_doc.answer.clone(),
        });
    }

    let kind = match doc.kind.as_str() {
        "single" => {
            let option = options
                .first()
                .cloned()
                .unwrap_or_else(|| AnswerOption::new("", ""));
            let color = colors.get(&option.id).cloned();
            QuestionKind::Single { option, color }
        }
        "multiple" => {
            if options.is_empty() {
                return Err(CoreError::InvalidDocument(format!(
                    "multiple-choice question {} has no options",
                    doc.id
                )));
            }
            let correct_option = Uuid::parse_str(&doc.correct_option_id)
                .ok()
                .map(OptionId::from_uuid)
                .filter(|correct| options.iter().any(|o| o.id == *correct))
                .unwrap_or_else(|| {
                    tracing::warn!(
                        question = doc.id,
                        "Stored correct option missing, falling back to the first"
                    );
                    options[0].id
                });
            QuestionKind::Multiple {
                options,
                option_colors: colors,
                correct_option,
            }
        }
        other => {
            return Err(CoreError::InvalidDocument(format!(
                "unknown question kind: {other}"
            )));
        }
    };

    Ok(Question {
        id,
        text: doc.text.clone(),
        kind,
    })
}

/// Thread-safe activity storage with optional filesystem persistence.
///
/// # Example
///
/// ```
/// use answergrid_core::session::EditorSession;
/// use answergrid_core::store::{ActivityDocument, ActivityStore};
///
/// let store = ActivityStore::new();
/// let session = EditorSession::new();
/// let doc = ActivityDocument::from_session("demo", &session);
/// store.save(doc).unwrap();
/// assert!(store.get("demo").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActivityStore {
    activities: Arc<RwLock<HashMap<String, ActivityDocument>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl ActivityStore {
    /// Create an in-memory store (no persistence).
    #[must_use]
    pub fn new() -> Self {
        Self {
            activities: Arc::new(RwLock::new(HashMap::new())),
            data_dir: None,
        }
    }

    /// Create a store that mirrors every activity as a JSON file in
    /// `data_dir`. The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            activities: Arc::new(RwLock::new(HashMap::new())),
            data_dir: Some(data_dir),
        })
    }

    /// Insert or replace an activity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if the lock is poisoned
    /// (currently recovered from, so this variant is reserved for future
    /// stricter modes).
    pub fn save(&self, document: ActivityDocument) -> Result<(), StoreError> {
        let id = document.id.clone();
        {
            let mut activities = self
                .activities
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            activities.insert(id.clone(), document);
        }
        self.persist_activity(&id);
        Ok(())
    }

    /// Get an activity by ID, if it exists.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ActivityDocument> {
        let activities = self
            .activities
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        activities.get(id).cloned()
    }

    /// IDs of all stored activities.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let activities = self
            .activities
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        activities.keys().cloned().collect()
    }

    /// Remove an activity and its persisted file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ActivityNotFound`] if the activity does not
    /// exist.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        {
            let mut activities = self
                .activities
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            activities
                .remove(id)
                .ok_or_else(|| StoreError::ActivityNotFound(id.to_string()))?;
        }
        self.delete_activity_file(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Save one activity to disk as JSON.
    ///
    /// No-op if the store was created without a data directory.
    fn persist_activity(&self, id: &str) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let Some(document) = self.get(id) else {
            return;
        };
        let json = match serde_json::to_string_pretty(&document) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize activity {id}: {e}");
                return;
            }
        };
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!("Failed to persist activity {id} to {}: {e}", path.display());
        }
    }

    /// Load a single activity from disk into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured, the file
    /// doesn't exist, or it can't be parsed.
    pub fn load_from_disk(&self, id: &str) -> Result<(), StoreError> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| StoreError::ActivityNotFound(id.to_string()))?;
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        let contents = std::fs::read_to_string(&path)?;
        let document: ActivityDocument = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let mut activities = self
            .activities
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        activities.insert(id.to_string(), document);
        Ok(())
    }

    /// Discover persisted activities in the data directory.
    ///
    /// Returns the IDs found on disk without loading them.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory is configured or it can't be
    /// read.
    pub fn load_all(&self) -> Result<Vec<String>, StoreError> {
        let data_dir = self
            .data_dir
            .as_ref()
            .ok_or_else(|| StoreError::ActivityNotFound("no data directory".to_string()))?;
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    /// Remove an activity's persisted file from disk.
    ///
    /// No-op if the store has no data directory or the file doesn't exist.
    fn delete_activity_file(&self, id: &str) {
        let Some(ref data_dir) = self.data_dir else {
            return;
        };
        let path = data_dir.join(format!("{}.json", sanitize_filename(id)));
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!("Failed to delete activity file {}: {e}", path.display());
            }
        }
    }
}

/// Sanitize an activity ID for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collect the hex values of every color in a document, for palette checks.
#[must_use]
pub fn used_color_values(document: &ActivityDocument) -> HashSet<String> {
    document
        .questions
        .iter()
        .flat_map(|q| q.options.iter())
        .filter_map(|o| decode_color(&o.color, &o.id))
        .map(|c| c.value)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BrushTool;
    use crate::question::QuestionType;

    fn red() -> PaintColor {
        PaintColor::new("Red", "#FF0000")
    }

    fn painted_session() -> EditorSession {
        let mut session = EditorSession::new();
        let mut question = Question::single("2 + 2?", "4", Some(red()));
        let id = session.add_question();
        question.id = id;
        session.update_question(question).expect("update");

        session.set_active_tool(Some(BrushTool::Paint {
            answer: "4".to_string(),
            color: red(),
        }));
        session.begin_stroke();
        session.paint_at(0);
        session.end_stroke();
        session
    }

    #[test]
    fn test_document_round_trip() {
        let session = painted_session();
        let doc = ActivityDocument::from_session("activity-1", &session);
        assert_eq!(doc.grid_size, 15);
        assert_eq!(doc.grid_data.len(), 225);
        assert_eq!(doc.grid_data[0], "4");

        let json = serde_json::to_string(&doc).expect("serialize");
        let back: ActivityDocument = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, doc);
        // Blank cells survive as empty strings, not nulls or absences.
        assert_eq!(back.grid_data.iter().filter(|c| c.is_empty()).count(), 224);
    }

    #[test]
    fn test_document_rebuilds_model() {
        let session = painted_session();
        let doc = ActivityDocument::from_session("activity-1", &session);

        let (title, grid, questions) = doc.into_model().expect("valid document");
        assert_eq!(title, session.title());
        assert_eq!(grid, *session.committed_grid());
        assert_eq!(questions, session.questions());
    }

    #[test]
    fn test_apply_to_session_overwrites_history() {
        let source = painted_session();
        let doc = ActivityDocument::from_session("activity-1", &source);

        let mut target = EditorSession::new();
        doc.apply_to_session(&mut target).expect("apply");
        assert_eq!(target.grid().cell(0), Some("4"));
        assert!(!target.can_undo());
    }

    #[test]
    fn test_malformed_color_becomes_none() {
        let session = painted_session();
        let mut doc = ActivityDocument::from_session("activity-1", &session);
        doc.questions[1].options[0].color = "{not json".to_string();

        let (_, _, questions) = doc.into_model().expect("still valid");
        let QuestionKind::Single { color, .. } = &questions[1].kind else {
            panic!("expected single");
        };
        assert_eq!(*color, None);
    }

    #[test]
    fn test_multiple_round_trip_keeps_colors() {
        let mut session = EditorSession::new();
        let id = session.questions()[0].id;
        session
            .set_question_type(id, QuestionType::Multiple)
            .expect("retype");

        let doc = ActivityDocument::from_session("activity-m", &session);
        let (_, _, questions) = doc.into_model().expect("valid");
        let QuestionKind::Multiple { option_colors, .. } = &questions[0].kind else {
            panic!("expected multiple");
        };
        assert_eq!(option_colors.len(), 4);
        assert_eq!(questions, session.questions());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let session = painted_session();
        let mut doc = ActivityDocument::from_session("activity-1", &session);
        doc.questions[0].kind = "essay".to_string();
        assert!(matches!(
            doc.into_model(),
            Err(CoreError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_bad_grid_shape_rejected() {
        let session = painted_session();
        let mut doc = ActivityDocument::from_session("activity-1", &session);
        doc.grid_data.pop();
        assert!(matches!(doc.into_model(), Err(CoreError::GridShape { .. })));
    }

    #[test]
    fn test_missing_correct_option_falls_back() {
        let mut session = EditorSession::new();
        let id = session.questions()[0].id;
        session
            .set_question_type(id, QuestionType::Multiple)
            .expect("retype");

        let mut doc = ActivityDocument::from_session("activity-m", &session);
        doc.questions[0].correct_option_id = Uuid::new_v4().to_string();

        let (_, _, questions) = doc.into_model().expect("valid");
        let QuestionKind::Multiple {
            options,
            correct_option,
            ..
        } = &questions[0].kind
        else {
            panic!("expected multiple");
        };
        assert_eq!(*correct_option, options[0].id);
    }

    #[test]
    fn test_store_save_get_delete() {
        let store = ActivityStore::new();
        let doc = ActivityDocument::from_session("a1", &painted_session());
        store.save(doc).expect("save");

        assert!(store.get("a1").is_some());
        assert!(store.ids().contains(&"a1".to_string()));

        store.delete("a1").expect("delete");
        assert!(store.get("a1").is_none());
        assert!(matches!(
            store.delete("a1"),
            Err(StoreError::ActivityNotFound(_))
        ));
    }

    #[test]
    fn test_persistence_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ActivityStore::with_data_dir(dir.path()).expect("store");

        let doc = ActivityDocument::from_session("a1", &painted_session());
        store.save(doc.clone()).expect("save");

        let path = dir.path().join("a1.json");
        assert!(path.exists(), "JSON file should be written on save");

        let store2 = ActivityStore::with_data_dir(dir.path()).expect("store2");
        store2.load_from_disk("a1").expect("load");
        assert_eq!(store2.get("a1"), Some(doc));
    }

    #[test]
    fn test_load_all_discovers_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ActivityStore::with_data_dir(dir.path()).expect("store");

        for id in ["act-a", "act-b"] {
            let doc = ActivityDocument::from_session(id, &EditorSession::new());
            store.save(doc).expect("save");
        }

        let found = store.load_all().expect("list");
        assert!(found.contains(&"act-a".to_string()));
        assert!(found.contains(&"act-b".to_string()));
    }

    #[test]
    fn test_delete_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ActivityStore::with_data_dir(dir.path()).expect("store");

        let doc = ActivityDocument::from_session("gone", &EditorSession::new());
        store.save(doc).expect("save");
        let path = dir.path().join("gone.json");
        assert!(path.exists());

        store.delete("gone").expect("delete");
        assert!(!path.exists());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("simple"), "simple");
        assert_eq!(sanitize_filename("with-dash_ok"), "with-dash_ok");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a.b c"), "a_b_c");
    }

    #[test]
    fn test_used_color_values() {
        let session = painted_session();
        let doc = ActivityDocument::from_session("a1", &session);
        let used = used_color_values(&doc);
        assert!(used.contains("#FF0000"));
    }
}
