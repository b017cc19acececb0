use crate::inverted::InvertedIndex;
use crate::record::Indexable;
use crate::{MAX_HITS, RankedHit, RankedIndex, RecordId};
use anyhow::{Result, anyhow};
use std::collections::HashMap;

/// Для каждого грама: стабильная сортировка по длине имени, первые MAX_HITS.
pub fn rank<R: Indexable>(
    index: &InvertedIndex,
    records: &HashMap<RecordId, &R>,
) -> Result<RankedIndex> {
    let mut out = RankedIndex::new();
    for (gram, ids) in index.iter() {
        let hits = rank_ids(ids, records)
            .map_err(|e| e.context(format!("ranking gram {gram:?}")))?;
        out.insert(gram.to_string(), hits);
    }
    Ok(out)
}

/// Упорядочивает один список id. Исходный срез не трогаем.
pub fn rank_ids<R: Indexable>(
    ids: &[RecordId],
    records: &HashMap<RecordId, &R>,
) -> Result<Vec<RankedHit>> {
    let mut resolved = ids
        .iter()
        .map(|id| {
            records
                .get(id)
                .copied()
                .ok_or_else(|| anyhow!("indexed record {id} missing from lookup table"))
        })
        .collect::<Result<Vec<&R>>>()?;

    // sort_by_key стабилен: равные длины сохраняют порядок вставки
    resolved.sort_by_key(|r| r.display_name().chars().count());

    Ok(resolved
        .into_iter()
        .take(MAX_HITS)
        .map(|r| {
            RankedHit(
                r.record_id(),
                r.display_name().to_string(),
                r.department_code().to_string(),
            )
        })
        .collect())
}
