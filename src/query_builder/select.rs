use super::QueryBuilder;

impl QueryBuilder<'_> {
    pub(super) fn select_value_by_key(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            self.value_names.join(", "),
            self.table,
            self.match_clause(&self.key_names, 1)
        )
    }

    /// One row per matching key whose single cell is true when every value column
    /// already equals the value parameters. NULLs compare equal to NULLs.
    pub(super) fn select_value_matches(&self) -> String {
        let offset = self.key_names.len() + 1;
        let matches: Vec<String> = self
            .value_names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                format!(
                    "{name} IS NOT DISTINCT FROM {}",
                    self.dialect.placeholder(offset + idx)
                )
            })
            .collect();
        format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            matches.join(" AND "),
            self.table,
            self.match_clause(&self.key_names, 1)
        )
    }

    pub(super) fn select_all(&self, names: &[String]) -> String {
        format!("SELECT {} FROM {}", names.join(", "), self.table)
    }

    pub(super) fn select_all_items(&self) -> String {
        let columns: Vec<String> = self
            .key_names
            .iter()
            .chain(&self.value_names)
            .cloned()
            .collect();
        self.select_all(&columns)
    }

    pub(super) fn select_first_key_by_value(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {} LIMIT 1",
            self.key_names.join(", "),
            self.table,
            self.match_clause(&self.value_names, 1),
            self.key_order("ASC")
        )
    }

    pub(super) fn count_by_value(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            self.table,
            self.match_clause(&self.value_names, 1)
        )
    }

    pub(super) fn count_all(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.table)
    }

    /// Smallest key, or the largest when `descending`; the first key column is most significant.
    pub(super) fn select_edge_key(&self, descending: bool) -> String {
        let direction = if descending { "DESC" } else { "ASC" };
        format!(
            "SELECT {} FROM {} ORDER BY {} LIMIT 1",
            self.key_names.join(", "),
            self.table,
            self.key_order(direction)
        )
    }

    fn key_order(&self, direction: &str) -> String {
        self.key_names
            .iter()
            .map(|name| format!("{name} {direction}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
