use std::collections::BTreeSet;

/// Минимальная длина префикса (в символах)
pub const MIN_GRAM_LEN: usize = 2;
/// Максимальная длина префикса; длиннее: только целый токен
pub const MAX_GRAM_LEN: usize = 45;

/// Все префиксы токена длиной 2..=45 символов.
///
/// Префикс обрезается по длине токена, поэтому токен из одного символа
/// даёт только себя. Токен длиннее 45 символов дополнительно
/// попадает в набор целиком: точный поиск по нему всегда работает.
pub fn prefix_grams(token: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut len = 0usize;
    for (i, c) in token.char_indices() {
        len += 1;
        if len > MAX_GRAM_LEN {
            break;
        }
        if len >= MIN_GRAM_LEN {
            out.insert(token[..i + c.len_utf8()].to_string());
        }
    }
    if len < MIN_GRAM_LEN && !token.is_empty() {
        out.insert(token.to_string());
    }
    if token.chars().count() > MAX_GRAM_LEN {
        out.insert(token.to_string());
    }
    out
}

/// Первые `n` символов строки (или вся строка, если она короче)
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
