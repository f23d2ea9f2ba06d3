//! Observable client mirrors of the server's todo-lists and tasks.
//!
//! Each store wraps a `watch` channel. Updates go through [`reducers`] and are
//! published in one step, so subscribers only ever see whole snapshots.

pub mod reducers;

use tokio::sync::watch;

use taskdeck_core::{DomainTodo, FilterType, Task};

pub use reducers::TaskMap;

/// Mirror of the user's todo-lists, newest additions first.
#[derive(Debug)]
pub struct TodoStore {
    state: watch::Sender<Vec<DomainTodo>>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self { state }
    }

    pub fn snapshot(&self) -> Vec<DomainTodo> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<DomainTodo>> {
        self.state.subscribe()
    }

    pub fn get(&self, todo_id: &str) -> Option<DomainTodo> {
        self.state
            .borrow()
            .iter()
            .find(|todo| todo.id() == todo_id)
            .cloned()
    }

    pub(crate) fn apply(&self, reducer: impl FnOnce(&[DomainTodo]) -> Vec<DomainTodo>) {
        self.state.send_modify(|todos| {
            let next = reducer(todos.as_slice());
            *todos = next;
        });
    }
}

/// Mirror of tasks, keyed by todo-list id.
#[derive(Debug)]
pub struct TaskStore {
    state: watch::Sender<TaskMap>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(TaskMap::new());
        Self { state }
    }

    pub fn snapshot(&self) -> TaskMap {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TaskMap> {
        self.state.subscribe()
    }

    /// Tasks of one list. `None` if the list was never loaded.
    pub fn tasks_of(&self, todo_id: &str) -> Option<Vec<Task>> {
        self.state.borrow().get(todo_id).cloned()
    }

    /// Tasks of one list under `filter`. Empty if the list was never loaded.
    pub fn visible(&self, todo_id: &str, filter: FilterType) -> Vec<Task> {
        self.state
            .borrow()
            .get(todo_id)
            .map(|tasks| reducers::visible_tasks(tasks, filter))
            .unwrap_or_default()
    }

    pub(crate) fn apply(&self, reducer: impl FnOnce(&TaskMap) -> TaskMap) {
        self.state.send_modify(|tasks| {
            let next = reducer(&*tasks);
            *tasks = next;
        });
    }
}
