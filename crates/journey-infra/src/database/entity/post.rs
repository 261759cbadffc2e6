//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use journey_core::domain::{Post, PostStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum Status {
    #[sea_orm(string_value = "DF")]
    Draft,
    #[sea_orm(string_value = "PB")]
    Published,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub publish: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub status: Status,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
        }
    }
}

impl Model {
    /// Convert to the domain post, attaching tags loaded separately.
    pub fn into_domain(self, tags: Vec<super::tag::Model>) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            slug: self.slug,
            body: self.body,
            publish: self.publish.into(),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            status: self.status.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel. Tags live in `post_tags`.
impl From<&Post> for ActiveModel {
    fn from(post: &Post) -> Self {
        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title.clone()),
            slug: Set(post.slug.clone()),
            body: Set(post.body.clone()),
            publish: Set(post.publish.into()),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
            status: Set(post.status.into()),
        }
    }
}
