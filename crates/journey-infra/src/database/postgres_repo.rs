//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use journey_core::domain::{Comment, Post, Tag, slugify};
use journey_core::error::RepoError;
use journey_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};
use journey_core::query::{PostQuery, day_bounds};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::postgres_base::{
    PostgresBaseRepository, query_error, upsert_on_primary_key, write_error,
};

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL post repository. Tags are stored in `post_tags`.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Translate a [`PostQuery`] into a SELECT, newest first.
    pub(crate) fn select(query: &PostQuery) -> Select<PostEntity> {
        let mut select = PostEntity::find();

        if let Some(now) = query.public_at {
            select = select
                .filter(post::Column::Status.eq(post::Status::Published))
                .filter(post::Column::Publish.lte(now));
        }
        if let Some(id) = query.id {
            select = select.filter(post::Column::Id.eq(id));
        }
        if let Some(id) = query.exclude_id {
            select = select.filter(post::Column::Id.ne(id));
        }
        if let Some(slug) = &query.slug {
            select = select.filter(post::Column::Slug.eq(slug.as_str()));
        }
        if let Some(date) = query.published_on {
            let (start, end) = day_bounds(date);
            select = select
                .filter(post::Column::Publish.gte(start))
                .filter(post::Column::Publish.lt(end));
        }
        if let Some(tag_id) = query.tag_id {
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.eq(tag_id))
                        .to_owned(),
                ),
            );
        }
        if let Some(tag_ids) = &query.any_tag_ids {
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_tag::Column::PostId)
                        .from(PostTagEntity)
                        .and_where(post_tag::Column::TagId.is_in(tag_ids.clone()))
                        .to_owned(),
                ),
            );
        }

        select.order_by_desc(post::Column::Publish)
    }

    async fn attach_tags(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let tags = models
            .load_many_to_many(TagEntity, PostTagEntity, &self.db)
            .await
            .map_err(query_error)?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| model.into_domain(tags))
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(self
            .attach_tags(model.into_iter().collect())
            .await?
            .pop())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let model = PostEntity::insert(post::ActiveModel::from(&post))
            .on_conflict(upsert_on_primary_key::<PostEntity>())
            .exec_with_returning(&txn)
            .await
            .map_err(write_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(post.id))
            .exec(&txn)
            .await
            .map_err(write_error)?;

        if !post.tags.is_empty() {
            PostTagEntity::insert_many(post.tags.iter().map(|t| post_tag::ActiveModel {
                post_id: Set(post.id),
                tag_id: Set(t.id),
            }))
            .exec(&txn)
            .await
            .map_err(write_error)?;
        }

        txn.commit().await.map_err(query_error)?;
        tracing::debug!(post_id = %post.id, tags = post.tags.len(), "Post stored");

        Ok(Post {
            tags: post.tags,
            ..model.into_domain(Vec::new())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        // comments and post_tags go with the post (ON DELETE CASCADE)
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        if query.any_tag_ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let mut select = Self::select(query).offset(query.offset as u64);
        if let Some(limit) = query.limit {
            select = select.limit(limit as u64);
        }

        let models = select.all(&self.db).await.map_err(query_error)?;
        self.attach_tags(models).await
    }

    async fn count(&self, query: &PostQuery) -> Result<u64, RepoError> {
        if query.any_tag_ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(0);
        }

        Self::select(&query.unbounded())
            .count(&self.db)
            .await
            .map_err(query_error)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(Uuid, i64)> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "total")
            .filter(comment::Column::PostId.is_in(post_ids.to_vec()))
            .group_by(comment::Column::PostId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, total)| (post_id, total.max(0) as u64))
            .collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let slug = slugify(name);
        if let Some(existing) = self.find_by_slug(&slug).await? {
            return Ok(existing);
        }

        // a concurrent insert of the same slug is absorbed by DO NOTHING
        TagEntity::insert(tag::ActiveModel::from(Tag::new(name)))
            .on_conflict(OnConflict::column(tag::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        self.find_by_slug(&slug).await?.ok_or(RepoError::NotFound)
    }
}
