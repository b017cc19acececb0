/// Разбивает уже нормализованный текст на токены по одиночным пробелам.
/// Пустые сегменты (двойные пробелы, края строки) отбрасываются.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(' ')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_drops_empty() {
        let toks: Vec<String> = tokenize(" aix  en provence ").collect();
        assert_eq!(toks, vec!["aix", "en", "provence"]);
    }

    #[test]
    fn lowercases_segments() {
        let toks: Vec<String> = tokenize("Saint Malo").collect();
        assert_eq!(toks, vec!["saint", "malo"]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("   ").count(), 0);
    }
}
