//! Feature text extraction
//!
//! The `Features` column holds a list of feature groups:
//!
//! ```text
//! [{'category': 'Marketing', 'features': [{'name': 'Email Marketing', ...}, ...]}, ...]
//! ```
//!
//! Extraction flattens the group/feature hierarchy into one lowercase,
//! space-joined string of feature names. A malformed cell never fails a load:
//! [`extract`] collapses every [`FeatureParseError`] to an empty string.

use crate::literal::{self, LiteralError};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureParseError {
    #[error("malformed feature literal: {0}")]
    Syntax(#[from] LiteralError),

    #[error("feature description is not a list")]
    NotAList,

    #[error("feature group {0} is not a mapping")]
    GroupNotMapping(usize),

    #[error("`features` of group {0} is not iterable")]
    FeaturesNotIterable(usize),
}

/// Collect feature names in encounter order: outer list first, then each
/// group's `features` list. Names are trimmed and lowercased; empty and
/// non-string names are skipped. No deduplication.
///
/// A `features` string or mapping holds no feature entries and contributes
/// nothing; `None`, numbers and booleans are errors.
pub fn parse_feature_names(raw_features: &str) -> Result<Vec<String>, FeatureParseError> {
    let groups = match literal::parse(raw_features)? {
        Value::Array(groups) => groups,
        _ => return Err(FeatureParseError::NotAList),
    };

    let mut names = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        let group = group
            .as_object()
            .ok_or(FeatureParseError::GroupNotMapping(index))?;

        let features = match group.get("features") {
            None => continue,
            Some(Value::Array(features)) => features,
            Some(Value::String(_)) | Some(Value::Object(_)) => continue,
            Some(_) => return Err(FeatureParseError::FeaturesNotIterable(index)),
        };

        for feature in features {
            let name = feature
                .as_object()
                .and_then(|f| f.get("name"))
                .and_then(Value::as_str)
                .map(|name| name.trim().to_lowercase());
            if let Some(name) = name.filter(|n| !n.is_empty()) {
                names.push(name);
            }
        }
    }

    Ok(names)
}

/// Extract the normalized feature text of one vendor. Never fails.
pub fn extract(raw_features: &str) -> String {
    parse_feature_names(raw_features)
        .map(|names| names.join(" "))
        .unwrap_or_default()
}
