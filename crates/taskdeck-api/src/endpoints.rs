//! REST paths consumed by taskdeck. Ids are encoded as a single path segment.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left untouched in a path segment (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// `POST` logs in, `DELETE` logs out.
pub const AUTH_LOGIN: &str = "/auth/login";

/// `GET` returns the current user.
pub const AUTH_ME: &str = "/auth/me";

/// `GET` lists todo-lists, `POST` creates one.
pub const TODO_LISTS: &str = "/todo-lists";

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// `/todo-lists/{id}` (`PUT` renames, `DELETE` removes).
pub fn todo_list(todo_id: &str) -> String {
    format!("{TODO_LISTS}/{}", segment(todo_id))
}

/// `/todo-lists/{id}/tasks` (`GET` lists, `POST` creates).
pub fn tasks(todo_id: &str) -> String {
    format!("{}/tasks", todo_list(todo_id))
}

/// `/todo-lists/{id}/tasks/{taskId}` (`PUT` updates, `DELETE` removes).
pub fn task(todo_id: &str, task_id: &str) -> String {
    format!("{}/{}", tasks(todo_id), segment(task_id))
}
