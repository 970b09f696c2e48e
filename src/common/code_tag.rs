// src/common/code_tag.rs

// Não existe coluna para o código interno de itens recebidos; ele viaja dentro
// do texto livre de observações como "... | Cód: 1234". Se as observações
// originais já tiverem um "Cód: <dígitos>", a extração devolve o primeiro.

use std::sync::LazyLock;

use regex::Regex;

static CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Cód: (\d+)").unwrap());

static CODE_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|? ?Cód: \d+").unwrap());

/// Anexa o código às observações existentes.
pub fn embed_code(observations: Option<&str>, code: &str) -> String {
    match observations.map(str::trim).filter(|o| !o.is_empty()) {
        Some(existing) => format!("{} | Cód: {}", existing, code),
        None => format!("Cód: {}", code),
    }
}

/// Recupera o código embutido, se houver.
pub fn extract_code(observations: &str) -> Option<String> {
    CODE_REGEX
        .captures(observations)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Observações sem o marcador do código, para exibição.
pub fn strip_code(observations: &str) -> String {
    CODE_TOKEN_REGEX.replace(observations, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_survives_a_round_trip() {
        for (obs, code) in [(None, "1234"), (Some("Caixa amassada"), "77"), (Some("  "), "5")] {
            let stored = embed_code(obs, code);
            assert_eq!(extract_code(&stored).as_deref(), Some(code));
        }
    }

    #[test]
    fn delimiter_layout_is_fixed() {
        assert_eq!(embed_code(Some("Frágil"), "42"), "Frágil | Cód: 42");
        assert_eq!(embed_code(None, "42"), "Cód: 42");
    }

    #[test]
    fn display_text_drops_the_token() {
        assert_eq!(strip_code("Frágil | Cód: 42"), "Frágil");
        assert_eq!(strip_code("Cód: 42"), "");
    }

    #[test]
    fn pre_existing_token_shadows_the_new_code() {
        let stored = embed_code(Some("ver Cód: 9"), "42");
        assert_eq!(extract_code(&stored).as_deref(), Some("9"));
    }
}
