//! Task records

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// Task status as stored in the `status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Closed = 0,
    Open = 1,
}

impl TaskStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TaskStatus::Closed),
            1 => Some(TaskStatus::Open),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub task_id: i64,
    pub name: String,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub posted_date: NaiveDate,
    pub status: i64,
    pub user_id: i64,
}

impl Task {
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open.code()
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub posted_date: NaiveDate,
    pub status: TaskStatus,
    pub user_id: i64,
}

pub async fn insert_task(pool: &SqlitePool, task: &NewTask) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO tasks (name, due_date, priority, posted_date, status, user_id) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&task.name)
    .bind(task.due_date)
    .bind(task.priority)
    .bind(task.posted_date)
    .bind(task.status.code())
    .bind(task.user_id)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Tasks owned by a user with the given status, soonest due first
pub async fn tasks_for_user(
    pool: &SqlitePool,
    user_id: i64,
    status: TaskStatus,
) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT task_id, name, due_date, priority, posted_date, status, user_id \
         FROM tasks WHERE user_id = ? AND status = ? ORDER BY due_date ASC, task_id ASC",
    )
    .bind(user_id)
    .bind(status.code())
    .fetch_all(pool)
    .await?;
    Ok(tasks)
}

pub async fn count_tasks(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
