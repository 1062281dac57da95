// touchline-core/src/domain/cleaning/columns.rs

/// Flattens a tuple-like label such as `('Performance', 'Gls')` into
/// `Performance_Gls`. Plain names are returned unchanged, so flattening is
/// idempotent. Empty components (`('player', '')`) are dropped.
pub fn flatten_column_name(name: &str) -> String {
    let trimmed = name.trim();
    if !(trimmed.starts_with('(') && trimmed.ends_with(')')) {
        return name.to_string();
    }

    let unquoted: String = trimmed.chars().filter(|c| *c != '\'' && *c != '"').collect();
    unquoted
        .trim_matches(|c| c == '(' || c == ')')
        .split(", ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Load-time column name: lowercase, with `/` and spaces turned into `_`.
pub fn warehouse_column_name(name: &str) -> String {
    name.to_lowercase().replace(['/', ' '], "_")
}
