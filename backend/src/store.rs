//! SQLite-backed todo store.
//!
//! The store keeps only the database path. Every operation opens its own
//! connection and drops it before returning, so nothing is shared between
//! requests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use todo_shared::{CreateTodoRequest, Filter, NewTodo, Todo, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid timestamp in row {id}: {value}")]
    Timestamp { id: i64, value: String },
    #[error("task join error: {0}")]
    Join(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone)]
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Create the todos table if it does not exist yet. Safe to call repeatedly.
    ///
    /// `AUTOINCREMENT` keeps SQLite from handing out the id of a deleted row.
    pub fn init(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = self.open()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL CHECK(length(trim(title)) > 0),
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos(created_at);",
        )?;
        Ok(())
    }

    /// Todos matching `filter`, newest first.
    pub fn list(&self, filter: Filter) -> StoreResult<Vec<Todo>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, completed, created_at
             FROM todos
             WHERE ?1 IS NULL OR completed = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![filter.completed()], RawTodo::from_row)?;
        rows.map(|row| row?.into_todo()).collect()
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Todo>> {
        let conn = self.open()?;
        let raw = conn
            .query_row(
                "SELECT id, title, description, completed, created_at
                 FROM todos WHERE id = ?1",
                params![id],
                RawTodo::from_row,
            )
            .optional()?;
        raw.map(RawTodo::into_todo).transpose()
    }

    /// Insert a validated todo and return its id.
    pub fn add(&self, todo: &NewTodo) -> StoreResult<i64> {
        Ok(self.create(todo)?.id)
    }

    /// Insert a validated todo and return the stored record.
    pub fn create(&self, todo: &NewTodo) -> StoreResult<Todo> {
        let created_at = Utc::now();
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO todos (title, description, completed, created_at)
             VALUES (?1, ?2, 0, ?3)",
            params![todo.title(), todo.description(), format_timestamp(created_at)],
        )?;

        Ok(Todo {
            id: conn.last_insert_rowid(),
            title: todo.title().to_string(),
            description: todo.description().to_string(),
            completed: false,
            created_at,
        })
    }

    /// Validate and insert in one step. Blank titles yield
    /// [`StoreError::Validation`].
    pub fn add_title(&self, title: &str, description: &str) -> StoreResult<i64> {
        let todo = CreateTodoRequest::new(title, description).validate()?;
        self.add(&todo)
    }

    /// Flip `completed`. Returns whether a row with that id existed.
    pub fn toggle(&self, id: i64) -> StoreResult<bool> {
        let conn = self.open()?;
        let changed = conn.execute(
            "UPDATE todos SET completed = NOT completed WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Returns whether a row with that id existed.
    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let conn = self.open()?;
        let removed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    /// Remove every completed todo, returning how many were removed.
    pub fn clear_completed(&self) -> StoreResult<usize> {
        let conn = self.open()?;
        Ok(conn.execute("DELETE FROM todos WHERE completed = 1", [])?)
    }

    pub fn counts(&self) -> StoreResult<TodoCounts> {
        let conn = self.open()?;
        let (total, completed): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(completed), 0) FROM todos",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let total = total as usize;
        let completed = completed as usize;
        Ok(TodoCounts {
            total,
            active: total - completed,
            completed,
        })
    }

    /// Run a blocking store operation off the async runtime.
    pub async fn call<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&TodoStore) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

struct RawTodo {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    created_at: String,
}

impl RawTodo {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            completed: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_todo(self) -> StoreResult<Todo> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|_| StoreError::Timestamp {
                id: self.id,
                value: self.created_at.clone(),
            })?
            .with_timezone(&Utc);

        Ok(Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at,
        })
    }
}

// Fixed-width UTC so lexical order in SQLite matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, TodoStore) {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("todos.db"));
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn init_is_idempotent() {
        let (_dir, store) = store();
        store.add_title("Keep me", "").unwrap();
        store.init().unwrap();
        assert_eq!(store.list(Filter::All).unwrap().len(), 1);
    }

    #[test]
    fn init_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = TodoStore::new(dir.path().join("nested/data/todos.db"));
        store.init().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn add_then_list_round_trips_fields() {
        let (_dir, store) = store();
        let id = store.add_title("Test Todo", "Test Description").unwrap();

        let todos = store.list(Filter::All).unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, id);
        assert_eq!(todos[0].title, "Test Todo");
        assert_eq!(todos[0].description, "Test Description");
        assert!(!todos[0].completed);
    }

    #[test]
    fn add_rejects_blank_title() {
        let (_dir, store) = store();
        let err = store.add_title("   ", "nothing").unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::EmptyTitle)));
        assert!(store.list(Filter::All).unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, store) = store();
        let first = store.add_title("first", "").unwrap();
        let second = store.add_title("second", "").unwrap();
        let third = store.add_title("third", "").unwrap();

        let ids: Vec<i64> = store.list(Filter::All).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn double_toggle_restores_state() {
        let (_dir, store) = store();
        let id = store.add_title("Toggle Test", "").unwrap();

        assert!(store.toggle(id).unwrap());
        assert!(store.get(id).unwrap().unwrap().completed);
        assert!(store.toggle(id).unwrap());
        assert!(!store.get(id).unwrap().unwrap().completed);
    }

    #[test]
    fn toggle_and_delete_unknown_id_are_noops() {
        let (_dir, store) = store();
        store.add_title("survivor", "").unwrap();

        assert!(!store.toggle(9999).unwrap());
        assert!(!store.delete(9999).unwrap());
        assert_eq!(store.list(Filter::All).unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let (_dir, store) = store();
        let keep = store.add_title("keep", "").unwrap();
        let gone = store.add_title("gone", "").unwrap();

        assert!(store.delete(gone).unwrap());
        let ids: Vec<i64> = store.list(Filter::All).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);
        assert!(store.get(gone).unwrap().is_none());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, store) = store();
        let first = store.add_title("one", "").unwrap();
        let second = store.add_title("two", "").unwrap();
        store.delete(second).unwrap();

        let third = store.add_title("three", "").unwrap();
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn filters_restrict_by_completion() {
        let (_dir, store) = store();
        let active = store.add_title("Active Todo", "").unwrap();
        let done = store.add_title("Completed Todo", "").unwrap();
        store.toggle(done).unwrap();

        let active_ids: Vec<i64> = store.list(Filter::Active).unwrap().iter().map(|t| t.id).collect();
        let done_ids: Vec<i64> = store.list(Filter::Completed).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(active_ids, vec![active]);
        assert_eq!(done_ids, vec![done]);
        assert_eq!(store.list(Filter::All).unwrap().len(), 2);
    }

    #[test]
    fn clear_completed_only_removes_completed() {
        let (_dir, store) = store();
        let a = store.add_title("Todo 1", "").unwrap();
        let b = store.add_title("Todo 2", "").unwrap();
        let c = store.add_title("Todo 3", "").unwrap();
        store.toggle(a).unwrap();
        store.toggle(c).unwrap();

        assert_eq!(store.clear_completed().unwrap(), 2);

        let remaining = store.list(Filter::All).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
        assert!(remaining.iter().all(|t| !t.completed));
        assert_eq!(store.clear_completed().unwrap(), 0);
    }

    #[test]
    fn counts_track_completion() {
        let (_dir, store) = store();
        assert_eq!(store.counts().unwrap(), TodoCounts::default());

        let a = store.add_title("a", "").unwrap();
        store.add_title("b", "").unwrap();
        store.toggle(a).unwrap();

        assert_eq!(
            store.counts().unwrap(),
            TodoCounts {
                total: 2,
                active: 1,
                completed: 1
            }
        );
    }

    #[tokio::test]
    async fn call_runs_on_blocking_pool() {
        let (_dir, store) = store();
        let id = store
            .call(|s| s.add_title("from async", ""))
            .await
            .unwrap();
        let todo = store.call(move |s| s.get(id)).await.unwrap().unwrap();
        assert_eq!(todo.title, "from async");
    }
}
