//! Pure state transitions for the client mirrors.
//!
//! Each reducer borrows the current snapshot and returns a new one. Nothing
//! here touches the network or the channels.

use std::collections::BTreeMap;

use taskdeck_core::{DomainTodo, FilterType, Task, Todo, UpdateTaskRequest};

/// Task mirror: todo-list id to that list's tasks.
pub type TaskMap = BTreeMap<String, Vec<Task>>;

// ─────────────────────────────────────────────────────────────────────────────
// Todo-lists
// ─────────────────────────────────────────────────────────────────────────────

pub fn todos_loaded(items: Vec<Todo>) -> Vec<DomainTodo> {
    items.into_iter().map(DomainTodo::from).collect()
}

/// Put `todo` first. An entry with the same id (from a reload that raced the
/// create) is replaced, so the id appears once.
pub fn todo_added(current: &[DomainTodo], todo: Todo) -> Vec<DomainTodo> {
    let mut next = Vec::with_capacity(current.len() + 1);
    next.extend(current.iter().filter(|t| t.id() != todo.id).cloned());
    next.insert(0, DomainTodo::from(todo));
    next
}

pub fn todo_removed(current: &[DomainTodo], todo_id: &str) -> Vec<DomainTodo> {
    current
        .iter()
        .filter(|todo| todo.id() != todo_id)
        .cloned()
        .collect()
}

pub fn todo_renamed(current: &[DomainTodo], todo_id: &str, title: &str) -> Vec<DomainTodo> {
    current
        .iter()
        .map(|todo| {
            let mut todo = todo.clone();
            if todo.id() == todo_id {
                todo.todo.title = title.to_string();
            }
            todo
        })
        .collect()
}

pub fn filter_changed(
    current: &[DomainTodo],
    todo_id: &str,
    filter: FilterType,
) -> Vec<DomainTodo> {
    current
        .iter()
        .map(|todo| {
            let mut todo = todo.clone();
            if todo.id() == todo_id {
                todo.filter = filter;
            }
            todo
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

pub fn tasks_loaded(current: &TaskMap, todo_id: &str, items: Vec<Task>) -> TaskMap {
    let mut next = current.clone();
    next.insert(todo_id.to_string(), items);
    next
}

/// Prepend `task` under `todo_id`, replacing any entry with the same id.
/// A list that was never loaded starts empty.
pub fn task_added(current: &TaskMap, todo_id: &str, task: Task) -> TaskMap {
    let mut next = current.clone();
    let tasks = next.entry(todo_id.to_string()).or_default();
    tasks.retain(|t| t.id != task.id);
    tasks.insert(0, task);
    next
}

pub fn task_removed(current: &TaskMap, todo_id: &str, task_id: &str) -> TaskMap {
    let mut next = current.clone();
    if let Some(tasks) = next.get_mut(todo_id) {
        tasks.retain(|task| task.id != task_id);
    }
    next
}

pub fn task_patched(
    current: &TaskMap,
    todo_id: &str,
    task_id: &str,
    patch: &UpdateTaskRequest,
) -> TaskMap {
    let mut next = current.clone();
    if let Some(task) = next
        .get_mut(todo_id)
        .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
    {
        task.apply(patch);
    }
    next
}

pub fn tasks_forgotten(current: &TaskMap, todo_id: &str) -> TaskMap {
    let mut next = current.clone();
    next.remove(todo_id);
    next
}

/// Tasks of one list as shown under `filter`, in mirror order.
pub fn visible_tasks(tasks: &[Task], filter: FilterType) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}
