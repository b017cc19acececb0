use crate::{Partitions, RankedIndex};
use std::collections::BTreeMap;

/// Шард для всего, что не начинается с a..z
pub const OTHER_PARTITION: char = '0';

/// Все 27 ключей шардов: a..z, затем 0
pub fn partition_keys() -> impl Iterator<Item = char> {
    ('a'..='z').chain(std::iter::once(OTHER_PARTITION))
}

/// Ключ шарда по первому символу грама.
/// Цифры и любые прочие символы (в т.ч. не-ASCII) уходят в "0".
pub fn partition_key(gram: &str) -> char {
    match gram.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some(c) if c.is_ascii_lowercase() => c,
        _ => OTHER_PARTITION,
    }
}

/// Раскладывает ранжированный индекс по шардам. Пустые шарды тоже присутствуют.
pub fn partition(ranked: RankedIndex) -> Partitions {
    let mut out: Partitions = partition_keys().map(|k| (k, BTreeMap::new())).collect();
    for (gram, hits) in ranked {
        out.entry(partition_key(&gram)).or_default().insert(gram, hits);
    }
    out
}
