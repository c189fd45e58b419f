use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extraction::grouper::EntityGroup;

/// Outcome of one successful document submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// As supplied by the uploader; untrusted.
    pub original_filename: String,
    /// Name of the retained raw document in the upload directory.
    pub stored_filename: String,
    pub groups: EntityGroup,
    pub processed_at: DateTime<Utc>,
}
