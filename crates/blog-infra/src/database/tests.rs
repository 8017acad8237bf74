use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use crate::database::entity::{category, post, user};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};
use blog_core::domain::{Category, Post};
use blog_core::error::RepoError;
use blog_core::pagination::PageRequest;
use blog_core::ports::{
    BaseRepository, CategoryRepository, PostListQuery, PostRepository, UserRepository,
};

fn user_model(id: Uuid) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: "leo".to_owned(),
        email: "leo@example.com".to_owned(),
        first_name: "Leo".to_owned(),
        last_name: "Tolstoy".to_owned(),
        password_hash: "hash".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn category_model(is_published: bool) -> category::Model {
    category::Model {
        id: Uuid::new_v4(),
        title: "Travel".to_owned(),
        description: "Trips and places".to_owned(),
        slug: "travel".to_owned(),
        is_published,
        created_at: Utc::now().into(),
    }
}

fn post_model(author_id: Uuid, category_id: Option<Uuid>) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: (now - TimeDelta::days(1)).into(),
        is_published: true,
        created_at: now.into(),
        author_id,
        location_id: None,
        category_id,
        image: None,
    }
}

fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(total))])
}

/// SQL issued on `db`. Every repository holding it must be dropped first.
fn logged_sql(db: Arc<DatabaseConnection>) -> Vec<String> {
    Arc::into_inner(db)
        .expect("connection still shared")
        .into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
        .collect()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let model = post_model(Uuid::new_v4(), None);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.category_id, None);
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let model = category_model(false);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let category = repo.find_by_slug("travel").await.unwrap().unwrap();

    assert_eq!(category.id, model.id);
    assert_eq!(category.slug, "travel");
    assert!(!category.is_published);
}

#[tokio::test]
async fn test_save_inserts_when_no_row_was_updated() {
    let model = category_model(true);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .append_query_results([vec![model.clone()]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let saved: Category = repo.save(Category::from(model.clone())).await.unwrap();

    assert_eq!(saved.id, model.id);
    assert_eq!(saved.title, "Travel");
}

#[tokio::test]
async fn test_delete_missing_comment_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result = BaseRepository::<blog_core::domain::Comment, Uuid>::delete(&repo, Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_details_resolves_relations() {
    let author_id = Uuid::new_v4();
    let category = category_model(true);
    let model = post_model(author_id, Some(category.id));
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model]])
        .append_query_results([vec![user_model(author_id)]])
        .append_query_results([vec![category.clone()]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let details = repo.find_details(post_id).await.unwrap().unwrap();

    assert_eq!(details.post.id, post_id);
    assert_eq!(details.author.username, "leo");
    assert_eq!(details.category.map(|c| c.slug), Some("travel".to_owned()));
    assert_eq!(details.location, None);
    assert_eq!(details.comment_count, 0);
    assert!(details.post.pub_date < Utc::now());
}

#[tokio::test]
async fn test_find_details_of_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_details(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_user_by_email() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(author_id)]])
        .into_connection();
    let db = Arc::new(db);

    let repo = PostgresUserRepository::new(db.clone());
    let user = repo.find_by_email("leo@example.com").await.unwrap().unwrap();
    drop(repo);

    assert_eq!(user.id, author_id);
    assert!(logged_sql(db)[0].contains(r#""users"."email" = $1"#));
}

#[tokio::test]
async fn test_visible_listing_joins_categories_and_orders_by_date() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, None);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(1)]])
        .append_query_results([vec![model]])
        .append_query_results([vec![user_model(author_id)]])
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();
    let db = Arc::new(db);

    let repo = PostgresPostRepository::new(db.clone());
    let page = repo
        .list(PostListQuery::visible_at(Utc::now()), PageRequest::default())
        .await
        .unwrap();
    drop(repo);

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].post.id, post_id);
    assert_eq!(page.items[0].category, None);

    let sql = logged_sql(db);
    let fetch = &sql[1];
    assert!(fetch.contains(r#"LEFT JOIN "categories" ON "posts"."category_id" = "categories"."id""#));
    assert!(fetch.contains(r#""posts"."is_published" = "#));
    assert!(fetch.contains(r#""posts"."pub_date" <= "#));
    assert!(fetch.contains(r#""posts"."category_id" IS NULL OR "categories"."is_published" = "#));
    assert!(fetch.contains(r#"ORDER BY "posts"."pub_date" DESC, "posts"."created_at" DESC"#));
    assert!(sql[0].contains("LEFT JOIN"));
}

#[tokio::test]
async fn test_own_profile_listing_has_no_visibility_filter() {
    let author_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(0)]])
        .into_connection();
    let db = Arc::new(db);

    let repo = PostgresPostRepository::new(db.clone());
    let page = repo
        .list(PostListQuery::default().by_author(author_id), PageRequest::default())
        .await
        .unwrap();
    drop(repo);

    assert!(page.items.is_empty());

    let sql = logged_sql(db);
    assert_eq!(sql.len(), 1);
    let (_, filter) = sql[0].split_once("WHERE").unwrap();
    assert!(filter.contains(r#""posts"."author_id" = $1"#));
    assert!(!filter.contains("is_published"));
    assert!(!filter.contains("pub_date"));
    assert!(!sql[0].contains("JOIN"));
}

#[tokio::test]
async fn test_listing_skips_fetch_past_last_page() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![count_row(3)]])
        .into_connection();
    let db = Arc::new(db);

    let repo = PostgresPostRepository::new(db.clone());
    let page = repo
        .list(PostListQuery::visible_at(Utc::now()), PageRequest::new(u64::MAX))
        .await
        .unwrap();
    drop(repo);

    assert_eq!(page.total, 3);
    assert!(page.items.is_empty());
    assert_eq!(logged_sql(db).len(), 1);
}
