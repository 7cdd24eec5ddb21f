use super::model::Table;

// ---------------------------------------------------------------------------
// Column clean-up applied between parsing and series extraction
// ---------------------------------------------------------------------------

/// Drop every column whose name starts with `prefix` (blank header cells are
/// named `Unnamed: <i>` by the loader). Returns the dropped names. An empty
/// prefix drops nothing.
pub fn drop_unlabeled(table: &mut Table, prefix: &str) -> Vec<String> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let dropped: Vec<String> = table
        .columns()
        .iter()
        .filter(|c| c.starts_with(prefix))
        .cloned()
        .collect();
    if !dropped.is_empty() {
        table.retain_columns(|c| !c.starts_with(prefix));
    }
    dropped
}

/// Give the mass-balance source column its short canonical name. A missing
/// source column is not an error here; extraction reports it by its new name.
pub fn rename_mass_balance(table: &mut Table, source: &str, canonical: &str) -> bool {
    if source == canonical {
        return table.column_index(canonical).is_some();
    }
    table.rename_column(source, canonical)
}
