//! Query catalogue.
//!
//! The representative query shapes the schema supports: distinct
//! column values, grouped aggregation with projection checking,
//! post-aggregation filtering, membership sub-queries, and join-based
//! aggregation with a deterministic tie-break.

use crate::entities::{
    Like, MediaItem, MediaItemTag, Tag, User, like, media_item, media_item_tag, tag, user,
};
use crate::map_db_err;
use mediashare_common::{AppError, AppResult};
use sea_orm::sea_query::{Alias, Expr, Func, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IdenStatic, JsonValue, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Aggregate functions available to grouped queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Row count over the column.
    Count,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Arithmetic mean, computed as double precision.
    Avg,
    /// Total, computed as a big integer.
    Sum,
}

impl Aggregate {
    /// Build the SQL expression applying this aggregate to a media
    /// item column.
    fn apply(self, column: media_item::Column) -> SimpleExpr {
        match self {
            Self::Count => Func::count(Expr::col(column)).into(),
            Self::Min => Func::min(Expr::col(column)).into(),
            Self::Max => Func::max(Expr::col(column)).into(),
            // AVG and SUM of integer columns come back as NUMERIC;
            // cast so the results decode without a decimal type.
            Self::Avg => Expr::expr(Func::avg(Expr::col(column)))
                .cast_as(Alias::new("double precision")),
            Self::Sum => Expr::expr(Func::sum(Expr::col(column))).cast_as(Alias::new("bigint")),
        }
    }
}

/// Grouped aggregation over media items.
///
/// The projection is checked before execution: every plain projected
/// column must appear in the group-by set, otherwise the query is
/// rejected with [`AppError::AmbiguousProjection`] and nothing is
/// sent to the database.
///
/// # Example
///
/// ```no_run
/// use mediashare_db::entities::media_item;
/// use mediashare_db::queries::{Aggregate, MediaGroupQuery};
///
/// let query = MediaGroupQuery::new()
///     .group_by(media_item::Column::MediaType)
///     .column(media_item::Column::MediaType)
///     .aggregate(Aggregate::Count, media_item::Column::Id, "item_count")
///     .aggregate(Aggregate::Sum, media_item::Column::Filesize, "total_size");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MediaGroupQuery {
    group_by: Vec<media_item::Column>,
    columns: Vec<media_item::Column>,
    aggregates: Vec<(Aggregate, media_item::Column, String)>,
    row_filter: Option<SimpleExpr>,
    group_filter: Option<SimpleExpr>,
}

impl MediaGroupQuery {
    /// Create an empty grouped query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group-by column.
    #[must_use]
    pub fn group_by(mut self, column: media_item::Column) -> Self {
        self.group_by.push(column);
        self
    }

    /// Project a plain column. Must also be grouped.
    #[must_use]
    pub fn column(mut self, column: media_item::Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Project an aggregate over a column under the given alias.
    #[must_use]
    pub fn aggregate(
        mut self,
        aggregate: Aggregate,
        column: media_item::Column,
        alias: impl Into<String>,
    ) -> Self {
        self.aggregates.push((aggregate, column, alias.into()));
        self
    }

    /// Restrict the rows entering the aggregation.
    #[must_use]
    pub fn filter(mut self, condition: SimpleExpr) -> Self {
        self.row_filter = Some(condition);
        self
    }

    /// Restrict the groups leaving the aggregation (post-aggregation
    /// filter, distinct from the row filter).
    #[must_use]
    pub fn having(mut self, condition: SimpleExpr) -> Self {
        self.group_filter = Some(condition);
        self
    }

    /// Check the projection against the group-by set.
    fn validate(&self) -> AppResult<()> {
        if self.columns.is_empty() && self.aggregates.is_empty() {
            return Err(AppError::Validation(
                "grouped query projects no columns".to_string(),
            ));
        }

        for column in &self.columns {
            let grouped = self.group_by.iter().any(|g| g.as_str() == column.as_str());
            if !grouped {
                return Err(AppError::AmbiguousProjection(format!(
                    "column {} is neither grouped nor aggregated",
                    column.as_str()
                )));
            }
        }

        Ok(())
    }

    /// Execute the query, returning one JSON object per group.
    pub async fn run(self, db: &DatabaseConnection) -> AppResult<Vec<JsonValue>> {
        self.validate()?;

        let mut query = MediaItem::find().select_only();

        if let Some(condition) = self.row_filter {
            query = query.filter(condition);
        }

        for column in &self.columns {
            query = query.column(*column);
        }

        for (aggregate, column, alias) in &self.aggregates {
            query = query.column_as(aggregate.apply(*column), alias.as_str());
        }

        for column in &self.group_by {
            query = query.group_by(*column);
        }

        if let Some(condition) = self.group_filter {
            query = query.having(condition);
        }

        query.into_json().all(db).await.map_err(map_db_err)
    }
}

/// Distinct media types present in the store, sorted.
pub async fn distinct_media_types(db: &DatabaseConnection) -> AppResult<Vec<String>> {
    MediaItem::find()
        .select_only()
        .column(media_item::Column::MediaType)
        .distinct()
        .order_by_asc(media_item::Column::MediaType)
        .into_tuple()
        .all(db)
        .await
        .map_err(map_db_err)
}

/// Media items carrying the named tag.
///
/// Built as nested membership sub-queries, innermost first: the tag
/// name resolves to tag ids, those resolve to media ids through the
/// associative table, and the outer query returns the media rows.
pub async fn find_media_tagged(
    db: &DatabaseConnection,
    tag_name: &str,
) -> AppResult<Vec<media_item::Model>> {
    let tag_ids = Query::select()
        .column(tag::Column::Id)
        .from(Tag)
        .and_where(tag::Column::Name.eq(tag_name))
        .to_owned();

    let media_ids = Query::select()
        .column(media_item_tag::Column::MediaId)
        .from(MediaItemTag)
        .and_where(media_item_tag::Column::TagId.in_subquery(tag_ids))
        .to_owned();

    MediaItem::find()
        .filter(media_item::Column::Id.in_subquery(media_ids))
        .order_by_asc(media_item::Column::Id)
        .all(db)
        .await
        .map_err(map_db_err)
}

/// The media item with the most likes, with its like count.
///
/// Ties are broken deterministically in favor of the lowest media id
/// (insertion order). Returns `None` when nothing has been liked.
pub async fn find_most_liked_media(
    db: &DatabaseConnection,
) -> AppResult<Option<(media_item::Model, i64)>> {
    let count_expr = SimpleExpr::from(Func::count(Expr::col(like::Column::Id)));

    let top: Option<(i64, i32)> = Like::find()
        .select_only()
        .column_as(count_expr.clone(), "like_count")
        .column(like::Column::MediaId)
        .group_by(like::Column::MediaId)
        .order_by_desc(count_expr)
        .order_by_asc(like::Column::MediaId)
        .limit(1)
        .into_tuple()
        .one(db)
        .await
        .map_err(map_db_err)?;

    let Some((like_count, media_id)) = top else {
        return Ok(None);
    };

    let item = MediaItem::find_by_id(media_id)
        .one(db)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::MediaNotFound(media_id.to_string()))?;

    Ok(Some((item, like_count)))
}

/// The user with the most uploaded media items, with the count.
///
/// Same shape and tie-break as [`find_most_liked_media`].
pub async fn find_most_active_uploader(
    db: &DatabaseConnection,
) -> AppResult<Option<(user::Model, i64)>> {
    let count_expr = SimpleExpr::from(Func::count(Expr::col(media_item::Column::Id)));

    let top: Option<(i64, i32)> = MediaItem::find()
        .select_only()
        .column_as(count_expr.clone(), "upload_count")
        .column(media_item::Column::UserId)
        .group_by(media_item::Column::UserId)
        .order_by_desc(count_expr)
        .order_by_asc(media_item::Column::UserId)
        .limit(1)
        .into_tuple()
        .one(db)
        .await
        .map_err(map_db_err)?;

    let Some((upload_count, user_id)) = top else {
        return Ok(None);
    };

    let uploader = User::find_by_id(user_id)
        .one(db)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

    Ok(Some((uploader, upload_count)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_media(id: i32, user_id: i32, media_type: &str) -> media_item::Model {
        media_item::Model {
            id,
            user_id,
            filename: format!("file{id}.jpg"),
            filesize: 2048,
            media_type: media_type.to_string(),
            title: format!("Media {id}"),
            description: None,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_ungrouped_projection_rejected() {
        let query = MediaGroupQuery::new()
            .group_by(media_item::Column::MediaType)
            .column(media_item::Column::MediaType)
            .column(media_item::Column::Filesize)
            .aggregate(Aggregate::Count, media_item::Column::Id, "item_count");

        let result = query.validate();

        assert!(matches!(result, Err(AppError::AmbiguousProjection(_))));
    }

    #[test]
    fn test_grouped_projection_accepted() {
        let query = MediaGroupQuery::new()
            .group_by(media_item::Column::MediaType)
            .column(media_item::Column::MediaType)
            .aggregate(Aggregate::Count, media_item::Column::Id, "item_count")
            .aggregate(Aggregate::Sum, media_item::Column::Filesize, "total_size");

        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_empty_projection_rejected() {
        let query = MediaGroupQuery::new().group_by(media_item::Column::MediaType);

        let result = query.validate();

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_ambiguous_projection_never_reaches_database() {
        // No results appended: an executed query would fail with a
        // mock error rather than the typed rejection.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = MediaGroupQuery::new()
            .group_by(media_item::Column::MediaType)
            .column(media_item::Column::Filesize)
            .run(&db)
            .await;

        assert!(matches!(result, Err(AppError::AmbiguousProjection(_))));
    }

    #[tokio::test]
    async fn test_grouped_query_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                btreemap! {
                    "media_type" => Value::from("image/jpeg"),
                    "item_count" => Value::BigInt(Some(2)),
                },
                btreemap! {
                    "media_type" => Value::from("video/mp4"),
                    "item_count" => Value::BigInt(Some(1)),
                },
            ]])
            .into_connection();

        let rows = MediaGroupQuery::new()
            .group_by(media_item::Column::MediaType)
            .column(media_item::Column::MediaType)
            .aggregate(Aggregate::Count, media_item::Column::Id, "item_count")
            .run(&db)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            serde_json::json!({ "media_type": "image/jpeg", "item_count": 2 })
        );
        assert_eq!(rows[1]["item_count"], 1);
    }

    #[tokio::test]
    async fn test_distinct_media_types() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[
                btreemap! { "media_type" => Value::from("image/jpeg") },
                btreemap! { "media_type" => Value::from("image/png") },
                btreemap! { "media_type" => Value::from("video/mp4") },
            ]])
            .into_connection();

        let types = distinct_media_types(&db).await.unwrap();

        assert_eq!(types, ["image/jpeg", "image/png", "video/mp4"]);
    }

    #[tokio::test]
    async fn test_find_media_tagged() {
        let m1 = create_test_media(1, 1, "image/jpeg");
        let m2 = create_test_media(2, 2, "image/png");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[m1, m2]])
            .into_connection();

        let result = find_media_tagged(&db, "Nature").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, 1);
    }

    #[tokio::test]
    async fn test_find_most_liked_media() {
        let winner = create_test_media(2, 2, "image/png");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![btreemap! {
                "media_id" => Value::Int(Some(2)),
                "like_count" => Value::BigInt(Some(3)),
            }]])
            .append_query_results([[winner.clone()]])
            .into_connection();

        let result = find_most_liked_media(&db).await.unwrap();

        let (item, like_count) = result.unwrap();
        assert_eq!(item.id, 2);
        assert_eq!(like_count, 3);
    }

    #[tokio::test]
    async fn test_find_most_liked_media_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<std::collections::BTreeMap<&str, Value>>::new()])
            .into_connection();

        let result = find_most_liked_media(&db).await.unwrap();

        assert!(result.is_none());
    }
}
