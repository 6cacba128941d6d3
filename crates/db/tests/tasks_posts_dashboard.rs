//! Repository tests for tasks, community posts and dashboard configs.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use freeflow_core::error::CoreError;
use freeflow_core::pagination::PageRequest;
use freeflow_db::models::community_post::{CreateCommunityPost, UpdateCommunityPost};
use freeflow_db::models::dashboard::SaveDashboardConfig;
use freeflow_db::models::task::{CreateTask, TaskFilter, UpdateTask};
use freeflow_db::repositories::{CommunityPostRepo, DashboardRepo, TaskRepo};
use freeflow_db::{DbError, MemoryClient};
use serde_json::json;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_task(title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        status: None,
        priority: None,
        project_id: None,
        parent_id: None,
        assignee_id: None,
        due_date: None,
        position: None,
        tags: None,
    }
}

fn new_post(title: &str, visibility: Option<&str>) -> CreateCommunityPost {
    CreateCommunityPost {
        title: title.to_string(),
        body: "Looking for a second shooter this weekend.".to_string(),
        visibility: visibility.map(str::to_string),
        tags: Some(vec!["hiring".to_string()]),
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_defaults_to_todo_medium() {
    let client = MemoryClient::with_schema();
    let task = TaskRepo::create(&client, Uuid::new_v4(), &new_task("Edit photos"))
        .await
        .unwrap();

    assert_eq!(task.status, "todo");
    assert_eq!(task.priority, "medium");
    assert_eq!(task.position, 0);
    assert!(task.tags.is_empty());
    assert!(task.completed_at.is_none());
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let client = MemoryClient::with_schema();
    let result = TaskRepo::create(&client, Uuid::new_v4(), &new_task("   ")).await;
    assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn completing_and_reopening_toggles_completed_at() {
    let client = MemoryClient::with_schema();
    let task = TaskRepo::create(&client, Uuid::new_v4(), &new_task("Send proofs"))
        .await
        .unwrap();

    let done = UpdateTask {
        status: Some("completed".to_string()),
        ..Default::default()
    };
    let completed = TaskRepo::update(&client, &task, &done).await.unwrap().unwrap();
    assert!(completed.completed_at.is_some());

    let reopen = UpdateTask {
        status: Some("in_progress".to_string()),
        ..Default::default()
    };
    let reopened = TaskRepo::update(&client, &completed, &reopen).await.unwrap().unwrap();
    assert_eq!(reopened.status, "in_progress");
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn assigned_tasks_are_visible_to_assignee() {
    let client = MemoryClient::with_schema();
    let owner = Uuid::new_v4();
    let assignee = Uuid::new_v4();

    let mut shared = new_task("Review contract");
    shared.assignee_id = Some(assignee);
    TaskRepo::create(&client, owner, &shared).await.unwrap();
    TaskRepo::create(&client, owner, &new_task("Private note")).await.unwrap();

    let page = TaskRepo::list_for_user(
        &client,
        assignee,
        &TaskFilter::default(),
        PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Review contract");
}

#[tokio::test]
async fn task_list_filters_by_status_list_and_search() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();

    let mut review = new_task("Colour grade wedding");
    review.status = Some("review".to_string());
    TaskRepo::create(&client, user, &review).await.unwrap();
    let mut todo = new_task("Invoice the wedding client");
    todo.description = Some("100% of balance".to_string());
    TaskRepo::create(&client, user, &todo).await.unwrap();
    let mut done = new_task("Wedding backup");
    done.status = Some("completed".to_string());
    TaskRepo::create(&client, user, &done).await.unwrap();

    let open = TaskFilter {
        status: Some("todo,review".to_string()),
        search: Some("WEDDING".to_string()),
        ..Default::default()
    };
    let page = TaskRepo::list_for_user(&client, user, &open, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let literal = TaskFilter {
        search: Some("100%".to_string()),
        ..Default::default()
    };
    let page = TaskRepo::list_for_user(&client, user, &literal, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn overdue_excludes_finished_tasks() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let yesterday = Utc::now() - Duration::days(1);

    let mut late = new_task("Late");
    late.due_date = Some(yesterday);
    TaskRepo::create(&client, user, &late).await.unwrap();

    let mut finished = new_task("Finished");
    finished.due_date = Some(yesterday);
    finished.status = Some("completed".to_string());
    TaskRepo::create(&client, user, &finished).await.unwrap();

    let mut later = new_task("Later");
    later.due_date = Some(Utc::now() + Duration::days(1));
    TaskRepo::create(&client, user, &later).await.unwrap();

    let filter = TaskFilter {
        overdue: true,
        ..Default::default()
    };
    let page = TaskRepo::list_for_user(&client, user, &filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "Late");
}

#[tokio::test]
async fn blocked_tasks_count_as_overdue() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let mut stuck = new_task("Waiting on permits");
    stuck.status = Some("blocked".to_string());
    stuck.due_date = Some(Utc::now() - Duration::hours(3));
    TaskRepo::create(&client, user, &stuck).await.unwrap();

    let filter = TaskFilter {
        overdue: true,
        ..Default::default()
    };
    let page = TaskRepo::list_for_user(&client, user, &filter, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].status, "blocked");
}

#[tokio::test]
async fn stats_cover_owned_and_assigned_tasks() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let project = Uuid::new_v4();
    let yesterday = Utc::now() - Duration::days(1);

    let mut done = new_task("Send invoice");
    done.status = Some("completed".to_string());
    done.project_id = Some(project);
    TaskRepo::create(&client, user, &done).await.unwrap();

    let mut rush = new_task("Rush edit");
    rush.priority = Some("urgent".to_string());
    rush.due_date = Some(yesterday);
    rush.project_id = Some(project);
    TaskRepo::create(&client, user, &rush).await.unwrap();

    let mut delegated = new_task("Color grade");
    delegated.status = Some("in_progress".to_string());
    delegated.assignee_id = Some(user);
    TaskRepo::create(&client, Uuid::new_v4(), &delegated).await.unwrap();

    TaskRepo::create(&client, Uuid::new_v4(), &new_task("Not mine"))
        .await
        .unwrap();

    let all = TaskRepo::stats(&client, user, None).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.completed, 1);
    assert_eq!(all.in_progress, 1);
    assert_eq!(all.todo, 1);
    assert_eq!(all.overdue, 1);
    assert_eq!(all.urgent, 1);
    assert_eq!(all.completion_rate, 33);

    let scoped = TaskRepo::stats(&client, user, Some(project)).await.unwrap();
    assert_eq!(scoped.total, 2);
    assert_eq!(scoped.completion_rate, 50);
}

#[tokio::test]
async fn task_sort_by_position_descending() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    for position in [2, 0, 1] {
        let mut input = new_task(&format!("Task {position}"));
        input.position = Some(position);
        TaskRepo::create(&client, user, &input).await.unwrap();
    }

    let filter = TaskFilter {
        sort_by: Some("position".to_string()),
        sort_order: Some("desc".to_string()),
        ..Default::default()
    };
    let page = TaskRepo::list_for_user(&client, user, &filter, PageRequest::default())
        .await
        .unwrap();
    let positions: Vec<_> = page.items.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![2, 1, 0]);
}

#[tokio::test]
async fn archive_keeps_row_and_permanent_delete_takes_subtasks() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();
    let parent = TaskRepo::create(&client, user, &new_task("Album")).await.unwrap();
    for title in ["Select photos", "Order print"] {
        let mut sub = new_task(title);
        sub.parent_id = Some(parent.id);
        TaskRepo::create(&client, user, &sub).await.unwrap();
    }

    let subtasks = TaskRepo::list_subtasks(&client, parent.id).await.unwrap();
    assert_eq!(subtasks.len(), 2);

    let archived = TaskRepo::archive(&client, parent.id).await.unwrap().unwrap();
    assert_eq!(archived.status, "cancelled");
    assert_eq!(client.row_count("tasks").await, 3);

    assert!(TaskRepo::delete_permanent(&client, parent.id).await.unwrap());
    assert_eq!(client.row_count("tasks").await, 0);
}

// ---------------------------------------------------------------------------
// Community posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_feed_hides_private_posts() {
    let client = MemoryClient::with_schema();
    let author = Uuid::new_v4();
    CommunityPostRepo::create(&client, author, &new_post("Open call", None)).await.unwrap();
    CommunityPostRepo::create(&client, author, &new_post("Drafting", Some("private")))
        .await
        .unwrap();

    let feed = CommunityPostRepo::list_public(&client, PageRequest::default()).await.unwrap();
    assert_eq!(feed.total, 1);
    assert_eq!(feed.items[0].title, "Open call");

    let mine = CommunityPostRepo::list_by_author(&client, author).await.unwrap();
    assert_eq!(mine.len(), 2);
}

#[tokio::test]
async fn like_increments_count() {
    let client = MemoryClient::with_schema();
    let post = CommunityPostRepo::create(&client, Uuid::new_v4(), &new_post("Gear swap", None))
        .await
        .unwrap();
    assert_eq!(post.likes_count, 0);

    let once = CommunityPostRepo::like(&client, &post).await.unwrap().unwrap();
    let twice = CommunityPostRepo::like(&client, &once).await.unwrap().unwrap();
    assert_eq!(twice.likes_count, 2);

    CommunityPostRepo::delete(&client, post.id).await.unwrap();
    assert!(CommunityPostRepo::like(&client, &twice).await.unwrap().is_none());
}

#[tokio::test]
async fn members_feed_hides_private_posts() {
    let client = MemoryClient::with_schema();
    let author = Uuid::new_v4();
    for (title, visibility) in [
        ("Open call", "public"),
        ("Rate card", "members"),
        ("Draft", "private"),
    ] {
        CommunityPostRepo::create(&client, author, &new_post(title, Some(visibility)))
            .await
            .unwrap();
    }

    let feed = CommunityPostRepo::list_for_members(&client, PageRequest::default())
        .await
        .unwrap();
    let public = CommunityPostRepo::list_public(&client, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(feed.total, 2);
    assert!(feed.items.iter().all(|p| p.visibility != "private"));
    assert_eq!(public.total, 1);
    assert_eq!(public.items[0].title, "Open call");
}

#[tokio::test]
async fn post_visibility_is_validated_on_update() {
    let client = MemoryClient::with_schema();
    let post = CommunityPostRepo::create(&client, Uuid::new_v4(), &new_post("Tips", None))
        .await
        .unwrap();

    let update = UpdateCommunityPost {
        visibility: Some("secret".to_string()),
        ..Default::default()
    };
    let result = CommunityPostRepo::update(&client, post.id, &update).await;
    assert_matches!(result, Err(DbError::Core(CoreError::Validation(_))));
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_save_is_an_upsert_per_user() {
    let client = MemoryClient::with_schema();
    let user = Uuid::new_v4();

    assert!(DashboardRepo::get_for_user(&client, user).await.unwrap().is_none());

    let first = DashboardRepo::save_for_user(
        &client,
        user,
        &SaveDashboardConfig {
            layout: json!([{ "widget": "revenue", "x": 0, "y": 0 }]),
            widgets: json!({ "revenue": { "period": "month" } }),
            theme: None,
        },
    )
    .await
    .unwrap();

    let second = DashboardRepo::save_for_user(
        &client,
        user,
        &SaveDashboardConfig {
            layout: json!([]),
            widgets: json!({}),
            theme: Some("dark".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.theme.as_deref(), Some("dark"));
    assert_eq!(client.row_count("dashboard_configs").await, 1);

    let loaded = DashboardRepo::get_for_user(&client, user).await.unwrap().unwrap();
    assert_eq!(loaded.layout, json!([]));
}
