// src/common/search.rs

/// Busca por substring sem diferenciar maiúsculas. Termo vazio casa com tudo.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn any_contains<'a>(fields: impl IntoIterator<Item = &'a str>, needle: &str) -> bool {
    needle.is_empty() || fields.into_iter().any(|f| contains_ci(f, needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ignores_case() {
        assert!(contains_ci("Maria da Silva", "SILVA"));
        assert!(!contains_ci("Maria", "joão"));
        assert!(contains_ci("", ""));
    }

    #[test]
    fn any_field_may_match() {
        assert!(any_contains(["101", "Bloco A", "Correios"], "correios"));
        assert!(!any_contains(["101", "Bloco A"], "202"));
    }
}
