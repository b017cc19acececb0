use crate::RecordId;
use crate::gram::prefix_grams;
use crate::record::Indexable;
use crate::tokenizer::tokenize;
use std::collections::{BTreeSet, HashMap};

/// Накопитель индекса: gram -> [record_id, ...] в порядке первого появления.
/// Живёт только на этапе построения, дальше отдаётся как [`InvertedIndex`].
#[derive(Default)]
pub struct IndexBuilder {
    grams: HashMap<String, Vec<RecordId>>,
    records: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует запись: объединение префиксов по всем полям и токенам,
    /// каждый gram получает id не более одного раза.
    pub fn add_record<I, S>(&mut self, id: RecordId, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut union: BTreeSet<String> = BTreeSet::new();
        for field in fields {
            for tok in tokenize(field.as_ref()) {
                union.extend(prefix_grams(&tok));
            }
        }
        for g in union {
            let ids = self.grams.entry(g).or_default();
            // линейная проверка: списки ограничены числом записей с этим префиксом
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.records += 1;
    }

    pub fn finish(self) -> InvertedIndex {
        InvertedIndex {
            grams: self.grams,
            records: self.records,
        }
    }
}

/// Готовый (неизменяемый) инвертированный индекс
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertedIndex {
    grams: HashMap<String, Vec<RecordId>>,
    records: usize,
}

impl InvertedIndex {
    pub fn get(&self, gram: &str) -> Option<&[RecordId]> {
        self.grams.get(gram).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RecordId])> {
        self.grams.iter().map(|(g, ids)| (g.as_str(), ids.as_slice()))
    }

    pub fn gram_count(&self) -> usize {
        self.grams.len()
    }

    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }
}

/// Строит индекс по записям; `selector` отдаёт нормализованные значения полей.
pub fn build_index<R, F>(records: &[R], selector: F) -> InvertedIndex
where
    R: Indexable,
    F: Fn(&R) -> Vec<String>,
{
    let mut b = IndexBuilder::new();
    for r in records {
        b.add_record(r.record_id(), selector(r));
    }
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CityRecord, search_fields};

    fn city(id: RecordId, name: &str, dep: &str) -> CityRecord {
        CityRecord {
            id,
            name: name.into(),
            alt_name: None,
            department_code: dep.into(),
            commune_code: String::new(),
        }
    }

    #[test]
    fn registers_ids_in_first_encounter_order() {
        let recs = vec![city(1, "Paris", "75"), city(2, "Pa", "64")];
        let idx = build_index(&recs, search_fields);
        assert_eq!(idx.get("pa"), Some(&[1, 2][..]));
        assert_eq!(idx.get("pari"), Some(&[1][..]));
        assert_eq!(idx.get("75"), Some(&[1][..]));
        assert_eq!(idx.get("zz"), None);
        assert_eq!(idx.record_count(), 2);
    }

    #[test]
    fn record_contributes_each_gram_once() {
        let mut b = IndexBuilder::new();
        // "pau" и "pa" из разных токенов/полей дают общий префикс "pa"
        b.add_record(5, ["pau pa", "pau"]);
        b.add_record(5, ["pau"]);
        let idx = b.finish();
        assert_eq!(idx.get("pa"), Some(&[5][..]));
        assert_eq!(idx.get("pau"), Some(&[5][..]));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let recs = vec![
            city(1, "Saint-Malo", "35"),
            city(2, "Saint-Lô", "50"),
            city(3, "Salon-de-Provence", "13"),
        ];
        let a = build_index(&recs, search_fields);
        let b = build_index(&recs, search_fields);
        assert_eq!(a, b);
    }
}
