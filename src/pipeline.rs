// path: src/pipeline.rs
use crate::config::BuildConfig;
use anyhow::{Context, Result, bail};
use cityzilla_index::projection::{project_cities, slug_map};
use cityzilla_index::record::{CityRecord, SourceEntry};
use cityzilla_index::shardjson::JsonShardWriter;
use cityzilla_index::{RecordId, ShardWriter, build_partitions};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Итоги одного прогона (для логов/CLI)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub entries_total: usize,
    pub entries_invalid: usize,
    pub cities: usize,
    pub grams: usize,
    pub shards: usize,
}

/// Читает входной JSON-массив. null и записи неверной формы пропускаются.
/// Ошибка чтения/разбора документа целиком: фатальна.
pub fn load_entries(path: impl AsRef<Path>) -> Result<(Vec<SourceEntry>, usize)> {
    let p = path.as_ref();
    let data = std::fs::read(p).with_context(|| format!("read input {}", p.display()))?;
    let raw: Vec<Value> =
        serde_json::from_slice(&data).with_context(|| format!("parse input {}", p.display()))?;
    Ok(parse_entries(raw))
}

/// (валидные по форме записи, сколько отброшено)
pub fn parse_entries(raw: Vec<Value>) -> (Vec<SourceEntry>, usize) {
    let total = raw.len();
    let entries: Vec<SourceEntry> = raw
        .into_iter()
        .filter(|v| v.is_object())
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    let skipped = total - entries.len();
    (entries, skipped)
}

/// SourceEntry -> CityRecord. Без названия коммуны/id: мимо индекса.
/// Повторный id: побеждает первая валидная запись.
/// Вторым значением: исходная запись для каждого id (нужна проекции).
pub fn to_records(entries: &[SourceEntry]) -> (Vec<CityRecord>, HashMap<RecordId, &SourceEntry>) {
    let mut sources: HashMap<RecordId, &SourceEntry> = HashMap::new();
    let mut out = Vec::with_capacity(entries.len());
    for e in entries {
        match CityRecord::try_from(e) {
            Ok(r) => {
                if sources.contains_key(&r.id) {
                    warn!(id = r.id, "duplicate id, entry skipped");
                    continue;
                }
                sources.insert(r.id, e);
                out.push(r);
            }
            Err(err) => debug!(error = %err, "entry skipped"),
        }
    }
    (out, sources)
}

/// Полная пересборка: вход -> индекс -> шарды -> запись каталога.
pub fn run(cfg: &BuildConfig) -> Result<BuildReport> {
    let (entries, entries_invalid) = load_entries(&cfg.input_path)?;
    info!(
        input = %cfg.input_path,
        entries = entries.len(),
        invalid = entries_invalid,
        "input loaded"
    );
    let out_dir = Path::new(&cfg.output_dir);
    guard_output_dir(Path::new(&cfg.input_path), out_dir)?;
    let mut report = build_from_entries(&entries, out_dir, cfg.pretty)?;
    report.entries_total += entries_invalid;
    report.entries_invalid = entries_invalid;
    Ok(report)
}

/// Каталог вывода удаляется целиком, поэтому он не должен содержать вход.
fn guard_output_dir(input: &Path, out_dir: &Path) -> Result<()> {
    // несуществующий каталог ничего не содержит
    let Ok(out) = out_dir.canonicalize() else {
        return Ok(());
    };
    let input = input
        .canonicalize()
        .with_context(|| format!("resolve input {}", input.display()))?;
    if input.starts_with(&out) {
        bail!(
            "refusing to replace {}: it contains input {}",
            out_dir.display(),
            input.display()
        );
    }
    Ok(())
}

pub fn build_from_entries(
    entries: &[SourceEntry],
    out_dir: &Path,
    pretty: bool,
) -> Result<BuildReport> {
    let (records, sources) = to_records(entries);
    let parts = build_partitions(&records)?;

    let mut writer = JsonShardWriter::new(pretty);
    writer.reset_output(out_dir)?;
    writer.write_partitions(&parts, out_dir)?;

    let table = project_cities(&records, &sources);
    writer.write_city_table(&table, out_dir)?;
    // слаги: только по уже записанной таблице
    writer.write_slug_map(&slug_map(&table), out_dir)?;

    let report = BuildReport {
        entries_total: entries.len(),
        entries_invalid: 0,
        cities: table.len(),
        grams: parts.values().map(|m| m.len()).sum(),
        shards: parts.len(),
    };
    info!(
        out = %out_dir.display(),
        cities = report.cities,
        grams = report.grams,
        shards = report.shards,
        "search index written"
    );
    Ok(report)
}
