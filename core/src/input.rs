use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::model::leave::LeaveKind;

/// Free text plus `key:value` options, e.g. `Vacances ski kind:annual from:2025-02-10`.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub options: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut options = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !key.chars().all(|c| c.is_ascii_digit()) {
                options.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    ParsedInput {
        text: text_parts.join(" "),
        options,
    }
}

/// Expands an unambiguous prefix to one of `candidates`.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

pub fn parse_leave_kind(input: &str) -> Result<LeaveKind> {
    let ids: Vec<&str> = LeaveKind::ALL.iter().map(|k| k.id()).collect();
    let id = expand_key(&input.to_lowercase(), &ids)?;
    LeaveKind::from_id(&id).ok_or_else(|| anyhow!("Unknown leave kind: '{}'", input))
}
