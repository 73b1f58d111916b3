//! Country display helpers for customer and address columns.

const PLACEHOLDER: &str = "—";

/// Offset from an ASCII uppercase letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

static COUNTRIES: &[(&str, &str)] = &[
    ("ES", "España"),
    ("MX", "México"),
    ("US", "Estados Unidos"),
    ("AR", "Argentina"),
    ("CO", "Colombia"),
    ("PE", "Perú"),
    ("CL", "Chile"),
    ("VE", "Venezuela"),
    ("EC", "Ecuador"),
    ("BO", "Bolivia"),
    ("UY", "Uruguay"),
    ("PY", "Paraguay"),
    ("CR", "Costa Rica"),
    ("PA", "Panamá"),
    ("GT", "Guatemala"),
    ("HN", "Honduras"),
    ("SV", "El Salvador"),
    ("NI", "Nicaragua"),
    ("CU", "Cuba"),
    ("DO", "República Dominicana"),
    ("PR", "Puerto Rico"),
    ("BR", "Brasil"),
    ("FR", "Francia"),
    ("IT", "Italia"),
    ("DE", "Alemania"),
    ("GB", "Reino Unido"),
    ("PT", "Portugal"),
    ("CA", "Canadá"),
    ("AU", "Australia"),
    ("JP", "Japón"),
    ("CN", "China"),
    ("IN", "India"),
    ("RU", "Rusia"),
];

/// Display name for an ISO 3166 alpha-2 code; unknown codes are shown as-is.
pub fn country_name(code: Option<&str>) -> String {
    match code.filter(|c| !c.is_empty()) {
        None => PLACEHOLDER.to_string(),
        Some(code) => COUNTRIES
            .iter()
            .find(|(c, _)| *c == code)
            .map_or_else(|| code.to_string(), |(_, name)| (*name).to_string()),
    }
}

/// Flag emoji built from regional indicator symbols.
pub fn country_flag(code: Option<&str>) -> String {
    code.unwrap_or_default()
        .to_uppercase()
        .chars()
        .filter_map(|c| char::from_u32(REGIONAL_INDICATOR_OFFSET + c as u32))
        .collect()
}

pub fn format_country_display(code: Option<&str>) -> String {
    match code.filter(|c| !c.is_empty()) {
        None => PLACEHOLDER.to_string(),
        Some(_) => format!("{} {}", country_flag(code), country_name(code)),
    }
}
