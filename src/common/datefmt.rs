// src/common/datefmt.rs

// Os carimbos exibidos são strings já formatadas, e cada coleção usa a sua
// variante. Os filtros por dia re-interpretam a parte de data dessas strings.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// `DD/MM/YY HH:mm`: encomendas, itens recebidos, materiais, visitantes.
pub fn short_stamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%y %H:%M").to_string()
}

/// `DD/MM/YYYY HH:mm`: visitas de entregadores.
pub fn long_stamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y %H:%M").to_string()
}

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto",
    "setembro", "outubro", "novembro", "dezembro",
];

/// Ocorrências: `5 de março de 2025 às 07:05` (dia sem zero à esquerda).
pub fn occurrence_stamp(at: NaiveDateTime) -> String {
    format!(
        "{} de {} de {} às {:02}:{:02}",
        at.day(),
        MONTHS[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Extrai o dia de um carimbo `DD/MM/YY[YY] HH:mm`. Anos com dois dígitos
/// são do século 2000.
pub fn stamp_date(stamp: &str) -> Option<NaiveDate> {
    let date_part = stamp.split_whitespace().next()?;
    let mut parts = date_part.split('/');
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let mut year: i32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// O carimbo cai no dia pedido? Sem filtro, tudo casa; carimbo vazio nunca casa.
pub fn matches_day(stamp: &str, day: Option<NaiveDate>) -> bool {
    match day {
        None => true,
        Some(day) => stamp_date(stamp) == Some(day),
    }
}
