use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// NFKC, lowercase, strip accents, punctuation -> single space.
///
/// Регистр понижается после NFKC: совместимые формы (𝐏, ℕ) раскрываются в заглавные.
///
/// Результат: токены `[a-z0-9...]`, разделённые ровно одним пробелом.
pub fn normalize_text(s: &str) -> String {
    let nfkc = s.nfkc().collect::<String>();
    let lower = nfkc.to_lowercase();
    let folded = strip_accents(&lower);

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            match c {
                'œ' => out.push_str("oe"),
                'æ' => out.push_str("ae"),
                _ => out.push(c),
            }
        } else {
            // дефис, апостроф, пунктуация, табы: всё это граница токена
            pending_space = true;
        }
    }
    out
}

fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
