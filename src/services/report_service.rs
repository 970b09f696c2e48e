// src/services/report_service.rs

use std::path::PathBuf;

use genpdf::{elements, style, Element};

use crate::{common::error::AppError, models::time_record::TimeRecord};

const CSV_HEADER: [&str; 8] = [
    "Funcionário",
    "Data",
    "Turno",
    "Entrada",
    "Saída",
    "Tipo",
    "Observações",
    "ID do funcionário",
];

/// Exportações da folha de ponto (CSV e impressão em PDF).
#[derive(Clone)]
pub struct ReportService {
    fonts_dir: PathBuf,
    font_name: String,
}

impl ReportService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_name: font_name.into(),
        }
    }

    /// CSV separado por ponto e vírgula (padrão do Excel em pt-BR).
    pub fn time_sheet_csv(&self, records: &[TimeRecord]) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, CSV_HEADER.iter().map(|h| h.to_string()));
        for r in records {
            push_csv_line(
                &mut out,
                [
                    r.employee_name.clone(),
                    r.date.clone(),
                    r.shift.map(|s| s.as_str().to_string()).unwrap_or_default(),
                    r.entry_time.clone(),
                    r.exit_time.clone().unwrap_or_default(),
                    r.kind.clone(),
                    r.observations.clone(),
                    r.employee_id.map(|id| id.to_string()).unwrap_or_default(),
                ],
            );
        }
        out
    }

    /// Folha de ponto pronta para impressão.
    pub fn time_sheet_pdf(&self, records: &[TimeRecord], title: &str) -> Result<Vec<u8>, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, &self.font_name, None).map_err(|_| {
            AppError::FontNotFound(format!(
                "Fonte '{}' não encontrada em {}",
                self.font_name,
                self.fonts_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(elements::Paragraph::new("FOLHA DE PONTO").styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Paragraph::new(title).styled(style::Style::new().with_font_size(10)));
        doc.push(elements::Break::new(1.5));

        // Pesos das colunas: Funcionário (4), Data (2), Turno (2), Entrada (1), Saída (1), Tipo (2)
        let mut table = elements::TableLayout::new(vec![4, 2, 2, 1, 1, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Funcionário").styled(style_bold))
            .element(elements::Paragraph::new("Data").styled(style_bold))
            .element(elements::Paragraph::new("Turno").styled(style_bold))
            .element(elements::Paragraph::new("Entrada").styled(style_bold))
            .element(elements::Paragraph::new("Saída").styled(style_bold))
            .element(elements::Paragraph::new("Tipo").styled(style_bold))
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for r in records {
            table
                .row()
                .element(elements::Paragraph::new(r.employee_name.as_str()))
                .element(elements::Paragraph::new(r.date.as_str()))
                .element(elements::Paragraph::new(r.shift.map(|s| s.as_str()).unwrap_or("-")))
                .element(elements::Paragraph::new(r.entry_time.as_str()))
                .element(elements::Paragraph::new(r.exit_time.as_deref().unwrap_or("-")))
                .element(elements::Paragraph::new(r.kind.as_str()))
                .push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new(format!("Total de registros: {}", records.len()))
                .styled(style::Style::new().italic().with_font_size(8)),
        );

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}

fn push_csv_line(out: &mut String, fields: impl IntoIterator<Item = String>) {
    let line: Vec<String> = fields.into_iter().map(|f| escape_csv(&f)).collect();
    out.push_str(&line.join(";"));
    out.push_str("\r\n");
}

fn escape_csv(field: &str) -> String {
    if field.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{collection::decode_rows, time_record::TimeRecord};
    use serde_json::json;

    #[test]
    fn csv_quotes_fields_with_separators() {
        let records: Vec<TimeRecord> = decode_rows(vec![json!({
            "employee_name": "Carlos", "date": "2025-03-05", "shift": "diurno",
            "entry_time": "07:00", "type": "normal", "observations": "Chegou; saiu \"cedo\""
        })
        .as_object()
        .cloned()
        .unwrap()])
        .unwrap();

        let csv = ReportService::new("./fonts", "Roboto").time_sheet_csv(&records);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Funcionário;Data;Turno;Entrada;Saída;Tipo;Observações;ID do funcionário");
        assert_eq!(lines[1], "Carlos;2025-03-05;diurno;07:00;;normal;\"Chegou; saiu \"\"cedo\"\"\";");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let service = ReportService::new("/caminho/que/nao/existe", "Roboto");
        let result = service.time_sheet_pdf(&[], "Março de 2025");
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}
