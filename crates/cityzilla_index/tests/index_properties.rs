use cityzilla_index::gram::prefix_grams;
use cityzilla_index::inverted::build_index;
use cityzilla_index::normalizer::normalize_text;
use cityzilla_index::partition::{OTHER_PARTITION, partition, partition_key};
use cityzilla_index::ranker::rank;
use cityzilla_index::record::{CityRecord, search_fields};
use cityzilla_index::tokenizer::tokenize;
use cityzilla_index::{MAX_HITS, RecordId};
use std::collections::{BTreeSet, HashMap};

fn mk(id: RecordId, name: &str, dep: &str) -> CityRecord {
    CityRecord {
        id,
        name: name.into(),
        alt_name: cityzilla_index::record::abbreviated_name(name),
        department_code: dep.into(),
        commune_code: format!("{dep}{id:03}"),
    }
}

// набор с большим числом общих префиксов ("sa", "saint", "be")
fn corpus() -> Vec<CityRecord> {
    let mut out = Vec::new();
    let names = [
        "Saint-Malo", "Saint-Lô", "Sainte-Foy", "Salon-de-Provence", "Sarlat",
        "Besançon", "Bergerac", "Béziers", "Bé", "Belfort", "Beaune", "Bessèges",
    ];
    for (i, n) in names.iter().enumerate() {
        out.push(mk(i as RecordId + 1, n, "24"));
    }
    for i in 0..40u64 {
        out.push(mk(100 + i, &format!("Saint-Village-{i}"), "2A"));
    }
    out
}

fn grams_of(r: &CityRecord) -> BTreeSet<String> {
    search_fields(r)
        .iter()
        .flat_map(|f| tokenize(f).collect::<Vec<_>>())
        .flat_map(|t| prefix_grams(&t))
        .collect()
}

#[test]
fn ranked_entries_are_capped_sorted_and_sound() {
    let recs = corpus();
    let by_id: HashMap<RecordId, &CityRecord> = recs.iter().map(|r| (r.id, r)).collect();
    let index = build_index(&recs, search_fields);
    let ranked = rank(&index, &by_id).unwrap();

    assert_eq!(ranked.len(), index.gram_count());
    for (gram, hits) in &ranked {
        assert!(hits.len() <= MAX_HITS, "{gram}: {}", hits.len());
        for h in hits {
            assert!(grams_of(by_id[&h.0]).contains(gram), "{} does not produce {gram}", h.0);
        }
        // длина имени не убывает
        assert!(hits.windows(2).all(|w| w[0].1.chars().count() <= w[1].1.chars().count()));

        // при равной длине: порядок из инвертированного индекса
        let unranked = index.get(gram).unwrap();
        let pos = |id: RecordId| unranked.iter().position(|x| *x == id).unwrap();
        for w in hits.windows(2) {
            if w[0].1.chars().count() == w[1].1.chars().count() {
                assert!(pos(w[0].0) < pos(w[1].0), "{gram}: tie order broken");
            }
        }
    }
    assert_eq!(ranked["sa"].len(), MAX_HITS);
}

#[test]
fn partitions_cover_every_gram_once() {
    let recs = corpus();
    let by_id: HashMap<RecordId, &CityRecord> = recs.iter().map(|r| (r.id, r)).collect();
    let ranked = rank(&build_index(&recs, search_fields), &by_id).unwrap();
    let parts = partition(ranked.clone());

    assert_eq!(parts.len(), 27);
    let total: usize = parts.values().map(|m| m.len()).sum();
    assert_eq!(total, ranked.len());

    for (key, grams) in &parts {
        for g in grams.keys() {
            assert_eq!(*key, partition_key(g));
            let first = g.chars().next().unwrap();
            if first.is_ascii_alphabetic() {
                assert_eq!(*key, first.to_ascii_lowercase());
            } else {
                assert_eq!(*key, OTHER_PARTITION);
            }
        }
    }
    // коды департаментов уходят в "0"
    assert!(parts[&'0'].contains_key("2a"));
    assert!(parts[&'b'].contains_key("be"));
}

#[test]
fn accents_do_not_split_keys() {
    let recs = vec![mk(1, "Béziers", "34"), mk(2, "Besançon", "25")];
    let idx = build_index(&recs, search_fields);
    assert_eq!(idx.get("be"), Some(&[1, 2][..]));
    assert_eq!(normalize_text("BÉZIERS"), "beziers");
    assert!(idx.get("bé").is_none());
}
