use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Field labels, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldLabel {
    #[serde(rename = "NAME")]
    Name,
    #[serde(rename = "EMAIL")]
    Email,
    #[serde(rename = "COLLEGE NAME")]
    CollegeName,
    #[serde(rename = "TECHNICAL SKILLS")]
    TechnicalSkills,
}

impl FieldLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldLabel::Name => "NAME",
            FieldLabel::Email => "EMAIL",
            FieldLabel::CollegeName => "COLLEGE NAME",
            FieldLabel::TechnicalSkills => "TECHNICAL SKILLS",
        }
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labeled field values extracted from one document.
///
/// A label is present only with a non-empty value list; `NAME` holds exactly
/// one value when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityGroup(BTreeMap<FieldLabel, Vec<String>>);

impl EntityGroup {
    pub fn get(&self, label: FieldLabel) -> Option<&[String]> {
        self.0.get(&label).map(Vec::as_slice)
    }

    /// First value for a label, if any.
    pub fn first(&self, label: FieldLabel) -> Option<&str> {
        self.get(label)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = FieldLabel> + '_ {
        self.0.keys().copied()
    }
}

/// Builds an `EntityGroup` from matcher outputs, dropping empty ones.
pub fn group_entities<I>(outputs: I) -> EntityGroup
where
    I: IntoIterator<Item = (FieldLabel, Vec<String>)>,
{
    let mut groups = BTreeMap::new();
    for (label, mut values) in outputs {
        if values.is_empty() {
            continue;
        }
        if label == FieldLabel::Name {
            values.truncate(1);
        }
        groups.insert(label, values);
    }
    EntityGroup(groups)
}
