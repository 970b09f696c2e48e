// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// (chave, português, inglês)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("alert.save_resident", "Erro ao salvar morador", "Failed to save resident"),
    ("alert.save_company", "Erro ao salvar empresa", "Failed to save company"),
    ("alert.save_package", "Erro ao salvar encomenda", "Failed to save package"),
    ("alert.register_pickup", "Erro ao registrar retirada", "Failed to register pickup"),
    ("alert.save_received_item", "Erro ao registrar item", "Failed to register item"),
    ("alert.register_loan", "Erro ao registrar empréstimo", "Failed to register loan"),
    ("alert.register_return", "Erro ao registrar devolução", "Failed to register return"),
    ("alert.register_visitor", "Erro ao registrar visitante", "Failed to register visitor"),
    ("alert.register_exit", "Erro ao registrar saída", "Failed to register exit"),
    ("alert.save_employee", "Erro ao salvar funcionário", "Failed to save employee"),
    ("alert.save_occurrence", "Erro ao salvar ocorrência", "Failed to save occurrence"),
    ("alert.save_time_record", "Erro ao salvar registro", "Failed to save record"),
    ("alert.clear_time_records", "Erro ao limpar tudo", "Failed to clear records"),
    ("alert.save_driver", "Erro ao salvar entregador", "Failed to save driver"),
    ("alert.save_visit", "Erro ao salvar visita", "Failed to save visit"),
    ("alert.delete", "Erro ao excluir", "Failed to delete"),
    ("error.validation", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("error.record_not_found", "Registro não encontrado.", "Record not found."),
    ("error.already_transitioned", "O registro já foi finalizado.", "The record was already closed."),
    ("error.unauthenticated", "Faça o login do turno para continuar.", "Start a shift session to continue."),
    ("error.internal", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
    ("validation.required", "Campo obrigatório.", "Required field."),
    ("validation.invalid_name", "Informe um nome válido.", "Enter a valid name."),
    ("validation.invalid_email", "E-mail inválido.", "Invalid e-mail."),
    ("validation.invalid_time", "Use o formato HH:mm.", "Use the HH:mm format."),
    ("validation.invalid_date", "Use o formato AAAA-MM-DD.", "Use the YYYY-MM-DD format."),
    ("validation.invalid_code", "O código deve conter apenas dígitos.", "The code must contain digits only."),
];

/// Catálogo de mensagens por idioma.
pub struct I18nStore {
    // "idioma:chave" -> mensagem
    messages: HashMap<String, &'static str>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        for (key, pt, en) in MESSAGES {
            messages.insert(format!("pt:{}", key), *pt);
            messages.insert(format!("en:{}", key), *en);
        }
        Self { messages }
    }

    /// Idiomas desconhecidos caem no português; chaves desconhecidas voltam cruas.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(&format!("{}:{}", lang, key))
            .or_else(|| self.messages.get(&format!("{}:{}", DEFAULT_LANG, key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
