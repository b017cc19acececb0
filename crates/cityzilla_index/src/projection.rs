// Файл: crates/cityzilla_index/src/projection.rs
use crate::normalizer::normalize_text;
use crate::record::{CityRecord, SourceEntry};
use crate::{CityTable, RecordId, SlugMap};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Публичная витрина города (cities.json)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicCity {
    pub id: RecordId,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_name: Option<String>,
    pub department_code: String,
    pub department_name: String,
    pub commune_code: String,
}

/// URL-safe слаг: только [a-z0-9-]
pub fn slugify(text: &str) -> String {
    normalize_text(text)
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(|w| w.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Выдаёт уникальные в пределах одного прогона слаги.
#[derive(Default)]
pub struct SlugAllocator {
    taken: HashSet<String>,
}

impl SlugAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// base -> base-<dep> -> base-<insee> -> base-<id> -> base-<id>-<n>
    pub fn assign(&mut self, r: &CityRecord) -> String {
        let base = slugify(&r.name);
        let base = if base.is_empty() { r.id.to_string() } else { base };

        let mut candidates = vec![base.clone()];
        for code in [&r.department_code, &r.commune_code] {
            let code = slugify(code);
            if !code.is_empty() {
                candidates.push(format!("{base}-{code}"));
            }
        }
        candidates.push(format!("{base}-{}", r.id));

        for c in candidates {
            if self.taken.insert(c.clone()) {
                return c;
            }
        }
        let mut n = 2u64;
        loop {
            let c = format!("{base}-{}-{n}", r.id);
            if self.taken.insert(c.clone()) {
                return c;
            }
            n += 1;
        }
    }
}

/// Проекция записи в публичный вид. `id` всегда совпадает с id записи.
pub fn project_city(r: &CityRecord, source: &SourceEntry, slug: String) -> PublicCity {
    PublicCity {
        id: r.id,
        slug,
        name: r.name.clone(),
        alt_name: r.alt_name.clone(),
        department_code: r.department_code.clone(),
        department_name: source
            .libelle_departement
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        commune_code: r.commune_code.clone(),
    }
}

/// Таблица городов. Записи без парной исходной записи молча пропускаются.
/// Слаги раздаются в порядке `records`.
pub fn project_cities(
    records: &[CityRecord],
    sources: &HashMap<RecordId, &SourceEntry>,
) -> CityTable {
    let mut slugs = SlugAllocator::new();
    let mut table = CityTable::new();
    for r in records {
        let Some(src) = sources.get(&r.id) else {
            continue;
        };
        let slug = slugs.assign(r);
        table.insert(r.id, project_city(r, src, slug));
    }
    table
}

/// slug -> id, строго по уже спроецированной таблице
pub fn slug_map(table: &CityTable) -> SlugMap {
    table.values().map(|c| (c.slug.clone(), c.id)).collect()
}
