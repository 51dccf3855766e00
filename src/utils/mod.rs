//! Utilitários diversos.
//!
//! Funções auxiliares usadas pelos pipelines:
//! - Limpeza e truncamento de texto scraped
//! - Estimativa de tokens para dimensionar prompts

pub mod text;

pub use text::{clean_text, estimate_tokens, truncate_chars};
