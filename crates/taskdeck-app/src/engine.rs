//! Composition root shared by the console and the integration tests.
//!
//! [`App`] owns the API client, the notification sink, the route tracker, both
//! stores and the three services, and wires them together once. Callers work
//! through `App` so cross-mirror rules (deleting a list forgets its tasks) are
//! applied in one place.

use std::sync::Arc;

use taskdeck_api::{ApiClient, HttpTransport};
use taskdeck_core::prelude::*;
use taskdeck_core::{FilterType, LoginRequest, Task, TaskStatus, Todo, UpdateTaskRequest};

use crate::navigation::RouteTracker;
use crate::notification::NotificationService;
use crate::sequencer::RequestSequencer;
use crate::services::{AuthService, TasksService, TodosService};
use crate::store::{TaskStore, TodoStore};

pub struct App<T> {
    client: Arc<ApiClient<T>>,
    notifications: Arc<NotificationService>,
    routes: Arc<RouteTracker>,
    auth: AuthService<T>,
    todos: TodosService<T>,
    tasks: TasksService<T>,
}

impl<T> App<T> {
    pub fn new(transport: T) -> Self {
        let client = Arc::new(ApiClient::new(transport));
        let notifications = Arc::new(NotificationService::new());
        let routes = Arc::new(RouteTracker::default());
        let sequencer = Arc::new(RequestSequencer::new());

        let auth = AuthService::new(client.clone(), notifications.clone(), routes.clone());
        let todos = TodosService::new(
            client.clone(),
            notifications.clone(),
            Arc::new(TodoStore::new()),
            sequencer.clone(),
        );
        let tasks = TasksService::new(
            client.clone(),
            notifications.clone(),
            Arc::new(TaskStore::new()),
            sequencer,
        );

        Self {
            client,
            notifications,
            routes,
            auth,
            todos,
            tasks,
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn routes(&self) -> &RouteTracker {
        &self.routes
    }

    pub fn auth(&self) -> &AuthService<T> {
        &self.auth
    }

    pub fn todos(&self) -> &TodosService<T> {
        &self.todos
    }

    pub fn tasks(&self) -> &TasksService<T> {
        &self.tasks
    }

    pub fn todo_store(&self) -> &TodoStore {
        self.todos.store()
    }

    pub fn task_store(&self) -> &TaskStore {
        self.tasks.store()
    }

    pub fn change_filter(&self, todo_id: &str, filter: FilterType) {
        self.todos.change_filter(todo_id, filter);
    }

    /// Tasks of one list under that list's current filter.
    pub fn visible_tasks(&self, todo_id: &str) -> Vec<Task> {
        let filter = self
            .todo_store()
            .get(todo_id)
            .map(|todo| todo.filter)
            .unwrap_or_default();
        self.task_store().visible(todo_id, filter)
    }

    pub fn dismiss_notification(&self) {
        self.notifications.clear();
    }

    fn mirrored_task(&self, todo_id: &str, task_id: &str) -> Result<Task> {
        self.task_store()
            .tasks_of(todo_id)
            .and_then(|tasks| tasks.into_iter().find(|task| task.id == task_id))
            .ok_or_else(|| Error::not_found("task", task_id))
    }
}

impl<T: HttpTransport + Sync> App<T> {
    pub async fn login(&self, request: &LoginRequest) -> Result<()> {
        self.auth.login(request).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await
    }

    pub async fn check_session(&self) -> Result<()> {
        self.auth.check_session().await
    }

    pub async fn get_todos(&self) -> Result<()> {
        self.todos.get_todos().await
    }

    pub async fn add_todo(&self, title: &str) -> Result<Todo> {
        self.todos.add_todo(title).await
    }

    pub async fn update_todo_title(&self, todo_id: &str, title: &str) -> Result<()> {
        self.todos.update_todo_title(todo_id, title).await
    }

    /// Delete a list, then drop its tasks from the task mirror.
    pub async fn delete_todo(&self, todo_id: &str) -> Result<()> {
        self.todos.delete_todo(todo_id).await?;
        self.tasks.forget(todo_id);
        Ok(())
    }

    pub async fn get_tasks(&self, todo_id: &str) -> Result<()> {
        self.tasks.get_tasks(todo_id).await
    }

    pub async fn add_task(&self, todo_id: &str, title: &str) -> Result<Task> {
        self.tasks.add_task(todo_id, title).await
    }

    pub async fn update_task(
        &self,
        todo_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> Result<()> {
        self.tasks.update_task(todo_id, task_id, patch).await
    }

    pub async fn delete_task(&self, todo_id: &str, task_id: &str) -> Result<()> {
        self.tasks.delete_task(todo_id, task_id).await
    }

    /// Rename a mirrored task, sending its full writable model.
    pub async fn rename_task(&self, todo_id: &str, task_id: &str, title: &str) -> Result<()> {
        let task = self.mirrored_task(todo_id, task_id)?;
        let patch = UpdateTaskRequest::from(&task).with_title(title);
        self.update_task(todo_id, task_id, &patch).await
    }

    /// Change the status of a mirrored task, sending its full writable model.
    pub async fn set_task_status(
        &self,
        todo_id: &str,
        task_id: &str,
        status: TaskStatus,
    ) -> Result<()> {
        let task = self.mirrored_task(todo_id, task_id)?;
        let patch = UpdateTaskRequest::from(&task).with_status(status);
        self.update_task(todo_id, task_id, &patch).await
    }
}
