//! Normalización de valores de celda
//!
//! Números y moneda en formato brasileño (`"28.000,00"`, `"R$ 1 835,56"`) y
//! valores guardados en escala entera (centavos). Las funciones son totales:
//! si la conversión no aplica se devuelve el texto original.

use serde::Serialize;

/// Resultado de una normalización
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized {
    Number(f64),
    /// La normalización no aplicó; contiene la entrada sin tocar
    Unchanged(String),
}

impl Normalized {
    /// Texto equivalente, para guardar de nuevo en la hoja
    pub fn into_text(self) -> String {
        match self {
            Normalized::Number(n) => n.to_string(),
            Normalized::Unchanged(s) => s,
        }
    }
}

/// Convierte texto con formato brasileño en número.
///
/// Quita NBSP, `R$`, `€` y espacios; si hay coma, los puntos se tratan como
/// separador de miles y la coma como decimal.
pub fn parse_locale_number(text: &str) -> Normalized {
    let mut s = text
        .replace('\u{a0}', "")
        .replace("R$", "")
        .replace("r$", "")
        .replace('\u{20ac}', "")
        .replace(' ', "");

    if s.contains(',') {
        s = s.replace('.', "").replace(',', ".");
    }

    match s.trim().parse::<f64>() {
        Ok(n) => Normalized::Number(n),
        Err(_) => Normalized::Unchanged(text.to_string()),
    }
}

/// Divide un valor numérico por `factor` (p. ej. centavos -> reales).
/// Vacío o no numérico se devuelve sin cambios.
pub fn rescale(value: &str, factor: f64) -> Normalized {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Normalized::Unchanged(value.to_string());
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Normalized::Number(n / factor),
        Err(_) => Normalized::Unchanged(value.to_string()),
    }
}

/// Formatea como moneda brasileña sin símbolo: `28000.0` -> `"28.000,00"`
pub fn format_br_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, grouped, frac_part)
}
