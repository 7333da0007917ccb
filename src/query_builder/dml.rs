use super::QueryBuilder;

impl QueryBuilder<'_> {
    /// Column types are inserted verbatim; they come from the caller, not from data.
    pub(super) fn create_table(&self) -> String {
        let definitions: Vec<String> = self
            .key_names
            .iter()
            .zip(self.keys)
            .chain(self.value_names.iter().zip(self.values))
            .map(|(name, column)| format!("{name} {} NOT NULL", column.sql_type))
            .collect();
        format!(
            "CREATE TABLE {} ({}, PRIMARY KEY ({}))",
            self.table,
            definitions.join(", "),
            self.key_names.join(", ")
        )
    }

    pub(super) fn insert_row(&self) -> String {
        let columns: Vec<&str> = self
            .key_names
            .iter()
            .chain(&self.value_names)
            .map(String::as_str)
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            self.placeholders(columns.len())
        )
    }

    pub(super) fn insert_values_only(&self) -> String {
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.value_names.join(", "),
            self.placeholders(self.value_names.len())
        )
    }

    pub(super) fn update_values_by_key(&self) -> String {
        let assignments: Vec<String> = self
            .value_names
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{name} = {}", self.dialect.placeholder(idx + 1)))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {}",
            self.table,
            assignments.join(", "),
            self.match_clause(&self.key_names, self.value_names.len() + 1)
        )
    }

    pub(super) fn delete_by_key(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {}",
            self.table,
            self.match_clause(&self.key_names, 1)
        )
    }

    pub(super) fn delete_all(&self) -> String {
        format!("DELETE FROM {}", self.table)
    }
}
