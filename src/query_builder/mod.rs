use crate::columns::ColumnDef;
use crate::dialect::Dialect;

mod dml;
mod select;

/// Every statement the adapter runs against one table, rendered once at construction.
///
/// Parameter order for each template:
/// - `get`, `delete`: key columns
/// - `insert`, `matches`: key columns then value columns
/// - `update`: value columns then key columns
/// - `append`, `index`, `count`: value columns
/// - all others: none
///
/// Every SELECT that returns key and value cells lists the key columns first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQueries {
    pub create: Option<String>,
    pub get: String,
    pub matches: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
    pub keys: String,
    pub values: String,
    pub items: String,
    pub append: String,
    pub index: String,
    pub count: String,
    pub len: String,
    pub min: String,
    pub max: String,
    pub clear: String,
}

impl TableQueries {
    /// Render all statements for `table`. The CREATE statement is only rendered when `create` is set.
    #[must_use]
    pub fn build(
        dialect: Dialect,
        table: &str,
        keys: &[ColumnDef],
        values: &[ColumnDef],
        create: bool,
    ) -> Self {
        let builder = QueryBuilder::new(dialect, table, keys, values);
        Self {
            create: create.then(|| builder.create_table()),
            get: builder.select_value_by_key(),
            matches: builder.select_value_matches(),
            insert: builder.insert_row(),
            update: builder.update_values_by_key(),
            delete: builder.delete_by_key(),
            keys: builder.select_all(&builder.key_names),
            values: builder.select_all(&builder.value_names),
            items: builder.select_all_items(),
            append: builder.insert_values_only(),
            index: builder.select_first_key_by_value(),
            count: builder.count_by_value(),
            len: builder.count_all(),
            min: builder.select_edge_key(false),
            max: builder.select_edge_key(true),
            clear: builder.delete_all(),
        }
    }
}

/// Quoted identifiers plus the dialect needed to render placeholders.
pub(crate) struct QueryBuilder<'a> {
    dialect: Dialect,
    table: String,
    key_names: Vec<String>,
    value_names: Vec<String>,
    keys: &'a [ColumnDef],
    values: &'a [ColumnDef],
}

impl<'a> QueryBuilder<'a> {
    fn new(dialect: Dialect, table: &str, keys: &'a [ColumnDef], values: &'a [ColumnDef]) -> Self {
        let quote_all = |columns: &[ColumnDef]| -> Vec<String> {
            columns
                .iter()
                .map(|column| dialect.quote_ident(&column.name))
                .collect()
        };
        Self {
            dialect,
            table: dialect.quote_ident(table),
            key_names: quote_all(keys),
            value_names: quote_all(values),
            keys,
            values,
        }
    }

    /// `a = ?n AND b = ?n+1 ...`, numbering from `first`.
    fn match_clause(&self, names: &[String], first: usize) -> String {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| format!("{name} = {}", self.dialect.placeholder(first + idx)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|position| self.dialect.placeholder(position))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> (Vec<ColumnDef>, Vec<ColumnDef>) {
        (
            vec![
                ColumnDef::new("message_id", "text"),
                ColumnDef::new("header_index", "int"),
            ],
            vec![
                ColumnDef::new("header_name", "text"),
                ColumnDef::new("header_value", "text"),
            ],
        )
    }

    #[test]
    fn composite_key_templates_for_sqlite() {
        let (keys, values) = headers();
        let q = TableQueries::build(Dialect::SQLITE, "message_headers", &keys, &values, true);

        assert_eq!(
            q.create.as_deref(),
            Some(
                r#"CREATE TABLE "message_headers" ("message_id" text NOT NULL, "header_index" int NOT NULL, "header_name" text NOT NULL, "header_value" text NOT NULL, PRIMARY KEY ("message_id", "header_index"))"#
            )
        );
        assert_eq!(
            q.get,
            r#"SELECT "header_name", "header_value" FROM "message_headers" WHERE "message_id" = ?1 AND "header_index" = ?2 LIMIT 1"#
        );
        assert_eq!(
            q.matches,
            r#"SELECT "header_name" IS NOT DISTINCT FROM ?3 AND "header_value" IS NOT DISTINCT FROM ?4 FROM "message_headers" WHERE "message_id" = ?1 AND "header_index" = ?2 LIMIT 1"#
        );
        assert_eq!(
            q.insert,
            r#"INSERT INTO "message_headers" ("message_id", "header_index", "header_name", "header_value") VALUES (?1, ?2, ?3, ?4)"#
        );
        assert_eq!(
            q.update,
            r#"UPDATE "message_headers" SET "header_name" = ?1, "header_value" = ?2 WHERE "message_id" = ?3 AND "header_index" = ?4"#
        );
        assert_eq!(
            q.delete,
            r#"DELETE FROM "message_headers" WHERE "message_id" = ?1 AND "header_index" = ?2"#
        );
        assert_eq!(
            q.items,
            r#"SELECT "message_id", "header_index", "header_name", "header_value" FROM "message_headers""#
        );
        assert_eq!(
            q.append,
            r#"INSERT INTO "message_headers" ("header_name", "header_value") VALUES (?1, ?2)"#
        );
        assert_eq!(
            q.index,
            r#"SELECT "message_id", "header_index" FROM "message_headers" WHERE "header_name" = ?1 AND "header_value" = ?2 ORDER BY "message_id" ASC, "header_index" ASC LIMIT 1"#
        );
        assert_eq!(
            q.count,
            r#"SELECT COUNT(*) FROM "message_headers" WHERE "header_name" = ?1 AND "header_value" = ?2"#
        );
        assert_eq!(q.len, r#"SELECT COUNT(*) FROM "message_headers""#);
        assert_eq!(
            q.min,
            r#"SELECT "message_id", "header_index" FROM "message_headers" ORDER BY "message_id" ASC, "header_index" ASC LIMIT 1"#
        );
        assert_eq!(
            q.max,
            r#"SELECT "message_id", "header_index" FROM "message_headers" ORDER BY "message_id" DESC, "header_index" DESC LIMIT 1"#
        );
        assert_eq!(q.clear, r#"DELETE FROM "message_headers""#);
    }

    #[test]
    fn postgres_placeholders_and_no_create_by_default() {
        let keys = vec![ColumnDef::new("message_id", "text")];
        let values = vec![ColumnDef::new("message_text", "text")];
        let q = TableQueries::build(Dialect::POSTGRES, "message_texts", &keys, &values, false);
        assert!(q.create.is_none());
        assert_eq!(
            q.update,
            r#"UPDATE "message_texts" SET "message_text" = $1 WHERE "message_id" = $2"#
        );
        assert_eq!(
            q.matches,
            r#"SELECT "message_text" IS NOT DISTINCT FROM $2 FROM "message_texts" WHERE "message_id" = $1 LIMIT 1"#
        );
        assert_eq!(q.keys, r#"SELECT "message_id" FROM "message_texts""#);
        assert_eq!(q.values, r#"SELECT "message_text" FROM "message_texts""#);
    }

    #[test]
    fn hostile_identifiers_stay_quoted() {
        let keys = vec![ColumnDef::new("id\"; DROP TABLE x; --", "int")];
        let values = vec![ColumnDef::new("v", "text")];
        let q = TableQueries::build(Dialect::SQLITE, "t\"t", &keys, &values, false);
        assert_eq!(
            q.delete,
            r#"DELETE FROM "t""t" WHERE "id""; DROP TABLE x; --" = ?1"#
        );
    }
}
