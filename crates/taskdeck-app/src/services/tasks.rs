//! Task operations and the per-list task mirror.

use std::sync::Arc;

use serde_json::json;

use taskdeck_api::{endpoints, ApiClient, ApiRequest, HttpTransport};
use taskdeck_core::prelude::*;
use taskdeck_core::{ItemPayload, Task, TaskPage, UpdateTaskRequest};

use crate::logger::Logger;
use crate::notification::NotificationService;
use crate::sequencer::RequestSequencer;
use crate::services::report_failure;
use crate::store::{reducers, TaskStore};

const LOG: Logger = Logger::new("TasksLogger");

fn reload_key(todo_id: &str) -> String {
    format!("tasks/{todo_id}")
}

pub struct TasksService<T> {
    client: Arc<ApiClient<T>>,
    notifications: Arc<NotificationService>,
    store: Arc<TaskStore>,
    sequencer: Arc<RequestSequencer>,
}

impl<T> TasksService<T> {
    pub fn new(
        client: Arc<ApiClient<T>>,
        notifications: Arc<NotificationService>,
        store: Arc<TaskStore>,
        sequencer: Arc<RequestSequencer>,
    ) -> Self {
        Self {
            client,
            notifications,
            store,
            sequencer,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Drop the mirrored tasks of one list. No request is sent.
    pub fn forget(&self, todo_id: &str) {
        self.store
            .apply(|current| reducers::tasks_forgotten(current, todo_id));
    }
}

impl<T: HttpTransport + Sync> TasksService<T> {
    /// Load the tasks of one list, replacing that list's entry in the mirror.
    pub async fn get_tasks(&self, todo_id: &str) -> Result<()> {
        let ticket = self.sequencer.begin(&reload_key(todo_id));
        LOG.info("get tasks request sent");

        match self.fetch_page(todo_id).await {
            Ok(items) => {
                let count = items.len();
                let applied = self.sequencer.apply_if_fresh(&ticket, || {
                    self.store
                        .apply(|current| reducers::tasks_loaded(current, todo_id, items));
                });
                if applied {
                    LOG.info(format!("{count} tasks received for {todo_id}"));
                } else {
                    LOG.warn(format!("stale tasks response for {todo_id} dropped"));
                }
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "get tasks", &err);
                Err(err)
            }
        }
    }

    async fn fetch_page(&self, todo_id: &str) -> Result<Vec<Task>> {
        let page: TaskPage = self
            .client
            .fetch(ApiRequest::get(endpoints::tasks(todo_id)))
            .await?;
        page.into_items()
    }

    /// Create a task and put it first in its list.
    pub async fn add_task(&self, todo_id: &str, title: &str) -> Result<Task> {
        LOG.info("add task request sent");
        match self.send_add(todo_id, title).await {
            Ok(task) => {
                LOG.info(format!("task {} created in {todo_id}", task.id));
                let added = task.clone();
                self.store
                    .apply(|current| reducers::task_added(current, todo_id, added));
                Ok(task)
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "add task", &err);
                Err(err)
            }
        }
    }

    async fn send_add(&self, todo_id: &str, title: &str) -> Result<Task> {
        let request = ApiRequest::post(endpoints::tasks(todo_id), &json!({ "title": title }))?;
        let payload: ItemPayload<Task> = self.client.envelope(request).await?;
        Ok(payload.item)
    }

    /// Send the full writable model and merge it into the mirrored task.
    ///
    /// The server's echo of the task is not used; the local copy is updated
    /// from `patch`.
    pub async fn update_task(
        &self,
        todo_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> Result<()> {
        LOG.info("update task request sent");
        match self.send_update(todo_id, task_id, patch).await {
            Ok(()) => {
                self.store
                    .apply(|current| reducers::task_patched(current, todo_id, task_id, patch));
                LOG.info(format!("task {task_id} updated"));
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "update task", &err);
                Err(err)
            }
        }
    }

    async fn send_update(
        &self,
        todo_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> Result<()> {
        let request = ApiRequest::put(endpoints::task(todo_id, task_id), patch)?;
        self.client.command(request).await
    }

    pub async fn delete_task(&self, todo_id: &str, task_id: &str) -> Result<()> {
        LOG.info("delete task request sent");
        match self
            .client
            .command(ApiRequest::delete(endpoints::task(todo_id, task_id)))
            .await
        {
            Ok(()) => {
                self.store
                    .apply(|current| reducers::task_removed(current, todo_id, task_id));
                LOG.info(format!("task {task_id} deleted"));
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "delete task", &err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use taskdeck_api::test_utils::FakeTransport;
    use taskdeck_api::Method;
    use taskdeck_core::TaskStatus;
    use tokio_test::{assert_err, assert_ok};

    const LIST: &str = "fakeTodoListId";

    fn service() -> TasksService<FakeTransport> {
        TasksService::new(
            Arc::new(ApiClient::new(FakeTransport::new())),
            Arc::new(NotificationService::new()),
            Arc::new(TaskStore::new()),
            Arc::new(RequestSequencer::new()),
        )
    }

    fn transport(service: &TasksService<FakeTransport>) -> &FakeTransport {
        service.client.transport()
    }

    fn task_json(id: &str, status: i64) -> Value {
        json!({
            "id": id,
            "title": format!("task {id}"),
            "description": "",
            "todoListId": LIST,
            "order": 0,
            "status": status,
            "priority": 1,
            "startDate": "",
            "deadline": "",
            "addedDate": "2023-11-27T12:49:40.24",
            "completed": status == 2
        })
    }

    fn page(items: Vec<Value>) -> Value {
        let total = items.len();
        json!({ "items": items, "totalCount": total, "error": null })
    }

    fn ok_envelope(data: Value) -> Value {
        json!({ "data": data, "messages": [], "fieldsErrors": [], "resultCode": 0 })
    }

    fn task_ids(service: &TasksService<FakeTransport>) -> Vec<String> {
        service
            .store()
            .tasks_of(LIST)
            .unwrap_or_default()
            .into_iter()
            .map(|task| task.id)
            .collect()
    }

    async fn loaded(ids: &[&str]) -> TasksService<FakeTransport> {
        let service = service();
        let items = ids.iter().map(|id| task_json(id, 0)).collect();
        transport(&service).respond(200, page(items));
        service.get_tasks(LIST).await.unwrap();
        service
    }

    #[tokio::test]
    async fn test_get_tasks_sets_key_in_response_order() {
        let service = loaded(&["first", "second"]).await;
        assert_eq!(task_ids(&service), ["first", "second"]);

        let sent = transport(&service).last_request().unwrap();
        assert_eq!(sent.method, Method::Get);
        assert_eq!(sent.path, "/todo-lists/fakeTodoListId/tasks");
    }

    #[tokio::test]
    async fn test_get_tasks_page_error_leaves_mirror() {
        let service = service();
        transport(&service).respond(
            200,
            json!({ "items": [], "totalCount": 0, "error": "list not found" }),
        );

        let err = assert_err!(service.get_tasks(LIST).await);
        assert!(err.is_domain());
        assert!(service.store().tasks_of(LIST).is_none());
        assert_eq!(
            service.notifications.current().unwrap().message,
            "list not found"
        );
    }

    #[tokio::test]
    async fn test_add_task_prepends() {
        let service = loaded(&["a"]).await;
        transport(&service).respond(200, ok_envelope(json!({ "item": task_json("b", 0) })));

        let task = service.add_task(LIST, "task b").await.unwrap();

        assert_eq!(task.id, "b");
        assert_eq!(task_ids(&service), ["b", "a"]);
    }

    #[tokio::test]
    async fn test_add_task_already_reloaded_appears_once() {
        let service = loaded(&["b", "a"]).await;
        transport(&service).respond(200, ok_envelope(json!({ "item": task_json("b", 0) })));

        assert_ok!(service.add_task(LIST, "task b").await);
        assert_eq!(task_ids(&service), ["b", "a"]);
    }

    #[tokio::test]
    async fn test_add_task_to_unloaded_list() {
        let service = service();
        transport(&service).respond(200, ok_envelope(json!({ "item": task_json("x", 0) })));

        assert_ok!(service.add_task(LIST, "task x").await);
        assert_eq!(task_ids(&service), ["x"]);
    }

    #[tokio::test]
    async fn test_update_task_merges_patch() {
        let service = loaded(&["a", "b"]).await;
        let current = service.store().tasks_of(LIST).unwrap()[1].clone();
        let patch = UpdateTaskRequest::from(&current).with_status(TaskStatus::Completed);

        // The echo differs from the patch; the mirror follows the patch
        transport(&service).respond(
            200,
            ok_envelope(json!({ "item": task_json("b", 0) })),
        );
        assert_ok!(service.update_task(LIST, "b", &patch).await);

        let tasks = service.store().tasks_of(LIST).unwrap();
        assert_eq!(tasks[1].status, TaskStatus::Completed);
        assert!(tasks[1].completed);
        assert_eq!(tasks[0].status, TaskStatus::New);

        let sent = transport(&service).last_request().unwrap();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.path, "/todo-lists/fakeTodoListId/tasks/b");
        assert_eq!(sent.body.unwrap()["status"], 2);
    }

    #[tokio::test]
    async fn test_update_task_failure_leaves_mirror() {
        let service = loaded(&["a"]).await;
        let before = service.store().snapshot();
        let patch = UpdateTaskRequest::from(&before[LIST][0]).with_title("changed");
        transport(&service).fail("timeout");

        assert_err!(service.update_task(LIST, "a", &patch).await);
        assert_eq!(service.store().snapshot(), before);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let service = loaded(&["a", "b", "c"]).await;
        transport(&service).respond(200, ok_envelope(json!({})));

        assert_ok!(service.delete_task(LIST, "b").await);
        assert_eq!(task_ids(&service), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_delete_task_refused_leaves_mirror() {
        let service = loaded(&["a"]).await;
        transport(&service).respond(
            200,
            json!({ "data": {}, "messages": [], "fieldsErrors": [], "resultCode": 1 }),
        );

        let err = assert_err!(service.delete_task(LIST, "a").await);
        assert!(err.is_domain());
        assert_eq!(task_ids(&service), ["a"]);
        assert_eq!(
            service.notifications.current().unwrap().message,
            "Some error occurred"
        );
    }

    #[tokio::test]
    async fn test_forget_drops_key() {
        let service = loaded(&["a"]).await;
        service.forget(LIST);
        assert!(service.store().tasks_of(LIST).is_none());
    }
}
