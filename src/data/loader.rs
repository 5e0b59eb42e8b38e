//! Reflection table loading and schema validation.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};

/// Identity column naming the unit of analysis.
pub const USER_COLUMN: &str = "UserName";
/// Grouping column carried into the matrix.
pub const CONDITION_COLUMN: &str = "Condition";
/// Free-text column handed to the topic model.
pub const TEXT_COLUMN: &str = "text";

/// Columns every input table must provide, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 3] = [USER_COLUMN, CONDITION_COLUMN, TEXT_COLUMN];

/// Textual stand-in for an absent reflection.
pub const MISSING_TEXT: &str = "nan";

/// Cell values read as "no value", matching common CSV exporters.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "-NaN", "nan", "-nan", "n/a", "null",
    "None",
];

/// One row of the reflections table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub user_name: String,
    pub condition: String,
    pub text: String,
    /// Filled in once the topic model has run.
    pub topic_id: Option<i64>,
    /// Sanitised label of `topic_id`, filled in with it.
    pub topic_label: Option<String>,
}

impl DocumentRecord {
    pub fn new(
        user_name: impl Into<String>,
        condition: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let text: String = text.into();
        Self {
            user_name: user_name.into(),
            condition: condition.into(),
            text: coerce_text(Some(text.as_str())),
            topic_id: None,
            topic_label: None,
        }
    }
}

/// Load and validate the reflections table at `path`.
///
/// Rows keep file order. Extra columns are ignored and missing text cells
/// become [`MISSING_TEXT`].
pub fn load_documents(path: &Path) -> PipelineResult<Vec<DocumentRecord>> {
    if !path.is_file() {
        return Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), "loading reflections");
    let mut reader = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_string())
        .collect();

    let [user_idx, condition_idx, text_idx] = locate_columns(&headers)?;

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        let cell = |idx: usize| row.get(idx).map(|raw| String::from_utf8_lossy(raw).into_owned());
        records.push(DocumentRecord {
            user_name: cell(user_idx).unwrap_or_default(),
            condition: cell(condition_idx).unwrap_or_default(),
            text: coerce_text(cell(text_idx).as_deref()),
            topic_id: None,
            topic_label: None,
        });
    }

    let missing = records.iter().filter(|r| r.text == MISSING_TEXT).count();
    if missing > 0 {
        debug!(missing, "substituted placeholder for missing reflections");
    }
    info!(rows = records.len(), "loaded reflections");
    Ok(records)
}

fn locate_columns(headers: &[String]) -> PipelineResult<[usize; 3]> {
    let position = |name: &str| headers.iter().position(|h| h == name);
    match REQUIRED_COLUMNS.map(position) {
        [Some(user), Some(condition), Some(text)] => Ok([user, condition, text]),
        _ => Err(PipelineError::Schema {
            required: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: headers.to_vec(),
        }),
    }
}

/// Coerce a raw text cell into a document string.
///
/// Only exact marker matches count as missing; padded values such as
/// `" NA "` are kept as text.
pub fn coerce_text(raw: Option<&str>) -> String {
    match raw {
        Some(value) if !NA_MARKERS.contains(&value) => value.to_string(),
        _ => MISSING_TEXT.to_string(),
    }
}
