// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TEXT UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para processamento de texto:
// - Limpeza de texto scraped
// - Truncamento seguro para prompts
// - Estimativa de tokens
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Estimativa de tokens por caractere.
const CHARS_PER_TOKEN: f32 = 4.0;

/// Estima número de tokens em um texto.
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() as f32 / CHARS_PER_TOKEN).ceil() as usize
}

/// Trunca texto para um número máximo de caracteres (bytes), respeitando
/// boundaries de caractere UTF-8.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        text
    } else {
        let mut end = max_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}

/// Remove caracteres de controle e normaliza whitespace.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "ação de pesquisa";
        let truncated = truncate_chars(text, 3);
        // "ç" ocupa 2 bytes; truncar no meio recua para o boundary anterior
        assert!(text.starts_with(truncated));
        assert!(truncated.len() <= 3);
    }

    #[test]
    fn test_truncate_noop_when_short() {
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  hello\x00   world \n ok  "), "hello world ok");
        assert_eq!(clean_text(""), "");
    }
}
