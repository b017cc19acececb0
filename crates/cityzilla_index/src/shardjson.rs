// Файл: crates/cityzilla_index/src/shardjson.rs
use crate::gram::{MAX_GRAM_LEN, char_prefix};
use crate::partition::{partition_key, partition_keys};
use crate::projection::PublicCity;
use crate::{CityTable, Partitions, RankedHit, RecordId, ShardReader, ShardWriter, SlugMap};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// JSON-раскладка каталога с индексом:
/// - index_<key>.json : { gram -> [[id, name, dep], ...] }, 27 файлов (a..z, 0)
/// - cities.json      : { id -> PublicCity }
/// - slugs.json       : { slug -> id }
pub const SHARD_FILE_PREFIX: &str = "index_";
pub const CITIES_FILE: &str = "cities.json";
pub const SLUGS_FILE: &str = "slugs.json";

pub fn shard_file_name(key: char) -> String {
    format!("{SHARD_FILE_PREFIX}{key}.json")
}

#[derive(Default)]
pub struct JsonShardWriter {
    pretty: bool,
}

impl JsonShardWriter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(f);
        if self.pretty {
            serde_json::to_writer_pretty(&mut w, value)?;
        } else {
            serde_json::to_writer(&mut w, value)?;
        }
        w.flush()
            .with_context(|| format!("flush {}", path.display()))?;
        Ok(())
    }
}

impl ShardWriter for JsonShardWriter {
    fn reset_output(&mut self, out_dir: &Path) -> Result<()> {
        match fs::remove_dir_all(out_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("remove {}", out_dir.display()));
            }
        }
        fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
        Ok(())
    }

    fn write_partitions(&mut self, parts: &Partitions, out_dir: &Path) -> Result<()> {
        let empty = BTreeMap::new();
        // пишем все 27 файлов, даже если Partitions собраны не через partition()
        for key in partition_keys() {
            let grams = parts.get(&key).unwrap_or(&empty);
            self.write_json(&out_dir.join(shard_file_name(key)), grams)?;
            tracing::debug!(shard = %key, grams = grams.len(), "shard written");
        }
        Ok(())
    }

    fn write_city_table(&mut self, table: &CityTable, out_dir: &Path) -> Result<()> {
        self.write_json(&out_dir.join(CITIES_FILE), table)
    }

    fn write_slug_map(&mut self, slugs: &SlugMap, out_dir: &Path) -> Result<()> {
        self.write_json(&out_dir.join(SLUGS_FILE), slugs)
    }
}

pub struct JsonShardReader {
    dir: PathBuf,
    shards: BTreeMap<char, BTreeMap<String, Vec<RankedHit>>>,
    cities: CityTable,
    slugs: SlugMap,
}

impl JsonShardReader {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn gram_count(&self) -> usize {
        self.shards.values().map(BTreeMap::len).sum()
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    fn exact(&self, gram: &str) -> Option<&Vec<RankedHit>> {
        self.shards.get(&partition_key(gram))?.get(gram)
    }
}

impl ShardReader for JsonShardReader {
    fn open_dir(path: &Path) -> Result<Self> {
        let mut shards = BTreeMap::new();
        for key in partition_keys() {
            let grams: BTreeMap<String, Vec<RankedHit>> =
                read_json(&path.join(shard_file_name(key)))?;
            shards.insert(key, grams);
        }
        let cities: CityTable = read_json(&path.join(CITIES_FILE))?;
        let slugs: SlugMap = read_json(&path.join(SLUGS_FILE))?;
        Ok(Self {
            dir: path.to_path_buf(),
            shards,
            cities,
            slugs,
        })
    }

    fn lookup(&self, gram: &str) -> Vec<RankedHit> {
        if let Some(hits) = self.exact(gram) {
            return hits.clone();
        }
        // длинные токены ищутся по префиксу только в пределах 45 символов
        if gram.chars().count() > MAX_GRAM_LEN {
            if let Some(hits) = self.exact(char_prefix(gram, MAX_GRAM_LEN)) {
                return hits.clone();
            }
        }
        Vec::new()
    }

    fn city(&self, id: RecordId) -> Option<&PublicCity> {
        self.cities.get(&id)
    }

    fn city_by_slug(&self, slug: &str) -> Option<&PublicCity> {
        self.slugs.get(slug).and_then(|id| self.cities.get(id))
    }
}

// -------- helpers --------
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))
}
