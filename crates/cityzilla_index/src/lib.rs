pub mod gram;
pub mod inverted;
pub mod normalizer;
pub mod partition;
pub mod projection;
pub mod ranker;
pub mod record;
pub mod shardjson;
pub mod tokenizer;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::inverted::build_index;
use crate::projection::PublicCity;
use crate::record::{CityRecord, search_fields};

/// Внешний числовой идентификатор записи (из входных данных)
pub type RecordId = u64;

/// Сколько результатов хранится на один gram
pub const MAX_HITS: usize = 20;

/// Элемент выдачи: `[id, displayName, departmentCode]` в JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RankedHit(pub RecordId, pub String, pub String);

/// gram -> выдача (≤ MAX_HITS)
pub type RankedIndex = BTreeMap<String, Vec<RankedHit>>;
/// ключ шарда -> (gram -> выдача)
pub type Partitions = BTreeMap<char, BTreeMap<String, Vec<RankedHit>>>;
/// id -> публичная витрина города
pub type CityTable = BTreeMap<RecordId, PublicCity>;
/// slug -> id
pub type SlugMap = BTreeMap<String, RecordId>;

/// Точки расширения: писатель/читатель набора шардов
pub trait ShardWriter {
    /// Удаляет каталог целиком (если есть) и создаёт заново
    fn reset_output(&mut self, out_dir: &Path) -> Result<()>;
    fn write_partitions(&mut self, parts: &Partitions, out_dir: &Path) -> Result<()>;
    fn write_city_table(&mut self, table: &CityTable, out_dir: &Path) -> Result<()>;
    fn write_slug_map(&mut self, slugs: &SlugMap, out_dir: &Path) -> Result<()>;
}

pub trait ShardReader {
    fn open_dir(path: &Path) -> Result<Self>
    where
        Self: Sized;
    /// Выдача по одному граму (точный ключ, с откатом на 45-символьный префикс)
    fn lookup(&self, gram: &str) -> Vec<RankedHit>;
    fn city(&self, id: RecordId) -> Option<&PublicCity>;
    fn city_by_slug(&self, slug: &str) -> Option<&PublicCity>;
}

/// Индекс -> ранжирование -> шарды, одним проходом.
pub fn build_partitions(records: &[CityRecord]) -> Result<Partitions> {
    let index = build_index(records, search_fields);
    let by_id: HashMap<RecordId, &CityRecord> = records.iter().map(|r| (r.id, r)).collect();
    let ranked = ranker::rank(&index, &by_id)?;
    tracing::debug!(
        grams = index.gram_count(),
        records = index.record_count(),
        empty = index.is_empty(),
        "inverted index built"
    );
    Ok(partition::partition(ranked))
}
