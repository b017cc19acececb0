use anyhow::{Context, Result, bail};
use cityzilla_index::normalizer::normalize_text;
use cityzilla_index::tokenizer::tokenize;
use cityzilla_index::{RankedHit, RecordId, ShardReader};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub tokens: Vec<String>,
    pub limit: usize,
}

pub const DEFAULT_LIMIT: usize = 10;

/// "saint mal --limit 5" -> tokens ["saint", "mal"], limit 5
/// `--limit` без значения в конце строки отбрасывается.
pub fn parse_query(s: &str) -> Result<Query> {
    let mut parts: Vec<&str> = s.split_whitespace().collect();
    let mut limit = DEFAULT_LIMIT;
    let mut i = 0;
    while i < parts.len() {
        if parts[i] != "--limit" {
            i += 1;
            continue;
        }
        match parts.get(i + 1).copied() {
            Some(v) => {
                limit = v
                    .parse::<usize>()
                    .with_context(|| format!("invalid --limit value {v:?}"))?;
                parts.drain(i..=i + 1);
            }
            None => {
                parts.truncate(i);
            }
        }
    }

    let norm = normalize_text(&parts.join(" "));
    let tokens: Vec<String> = tokenize(&norm).collect();
    if tokens.is_empty() {
        bail!("empty query");
    }
    Ok(Query { tokens, limit: limit.max(1) })
}

/// Поиск так же, как это делает клиент: один gram на токен.
/// Несколько токенов: выдача первого, отфильтрованная по остальным.
pub fn search<R: ShardReader>(reader: &R, q: &Query) -> Vec<RankedHit> {
    let mut it = q.tokens.iter();
    let Some(first) = it.next() else {
        return Vec::new();
    };
    let mut hits = reader.lookup(first);
    for tok in it {
        let allowed: HashSet<RecordId> = reader.lookup(tok).into_iter().map(|h| h.0).collect();
        hits.retain(|h| allowed.contains(&h.0));
        if hits.is_empty() {
            break;
        }
    }
    hits.truncate(q.limit);
    hits
}
