use shortlink_core::{Alias, RecordId, Target, UrlRecord};

/// Column layout of the `url` table, shared by both backends.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UrlRow {
    pub id: i64,
    pub alias: String,
    pub target: String,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord {
            id: RecordId::new(row.id),
            alias: Alias::new_unchecked(row.alias),
            target: Target::new_unchecked(row.target),
        }
    }
}
