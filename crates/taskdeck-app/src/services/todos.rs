//! Todo-list operations and the todo-list mirror.

use std::sync::Arc;

use serde_json::json;

use taskdeck_api::{endpoints, ApiClient, ApiRequest, HttpTransport};
use taskdeck_core::prelude::*;
use taskdeck_core::{FilterType, ItemPayload, Todo};

use crate::logger::Logger;
use crate::notification::NotificationService;
use crate::sequencer::RequestSequencer;
use crate::services::report_failure;
use crate::store::{reducers, TodoStore};

const LOG: Logger = Logger::new("TodosLogger");

/// Sequencer key for `GET /todo-lists`.
const RELOAD_KEY: &str = "todo-lists";

pub struct TodosService<T> {
    client: Arc<ApiClient<T>>,
    notifications: Arc<NotificationService>,
    store: Arc<TodoStore>,
    sequencer: Arc<RequestSequencer>,
}

impl<T> TodosService<T> {
    pub fn new(
        client: Arc<ApiClient<T>>,
        notifications: Arc<NotificationService>,
        store: Arc<TodoStore>,
        sequencer: Arc<RequestSequencer>,
    ) -> Self {
        Self {
            client,
            notifications,
            store,
            sequencer,
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Set the client-side filter of one list. No request is sent.
    pub fn change_filter(&self, todo_id: &str, filter: FilterType) {
        self.store
            .apply(|current| reducers::filter_changed(current, todo_id, filter));
        LOG.info(format!("filter of {todo_id} changed to {filter}"));
    }
}

impl<T: HttpTransport + Sync> TodosService<T> {
    /// Replace the mirror with the server's lists.
    ///
    /// A response is dropped if a newer reload has already been applied.
    pub async fn get_todos(&self) -> Result<()> {
        let ticket = self.sequencer.begin(RELOAD_KEY);
        LOG.info("get todos request sent");

        match self
            .client
            .fetch::<Vec<Todo>>(ApiRequest::get(endpoints::TODO_LISTS))
            .await
        {
            Ok(items) => {
                let count = items.len();
                let applied = self.sequencer.apply_if_fresh(&ticket, || {
                    self.store.apply(|_| reducers::todos_loaded(items));
                });
                if applied {
                    LOG.info(format!("{count} todo-lists received"));
                } else {
                    LOG.warn("stale todo-lists response dropped");
                }
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "get todos", &err);
                Err(err)
            }
        }
    }

    /// Create a list and put it first in the mirror.
    pub async fn add_todo(&self, title: &str) -> Result<Todo> {
        LOG.info("add todo request sent");
        match self.send_add(title).await {
            Ok(todo) => {
                LOG.info(format!("todo-list {} created", todo.id));
                let added = todo.clone();
                self.store.apply(|current| reducers::todo_added(current, added));
                Ok(todo)
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "add todo", &err);
                Err(err)
            }
        }
    }

    async fn send_add(&self, title: &str) -> Result<Todo> {
        let request = ApiRequest::post(endpoints::TODO_LISTS, &json!({ "title": title }))?;
        let payload: ItemPayload<Todo> = self.client.envelope(request).await?;
        Ok(payload.item)
    }

    pub async fn update_todo_title(&self, todo_id: &str, title: &str) -> Result<()> {
        LOG.info("update todo title request sent");
        match self.send_rename(todo_id, title).await {
            Ok(()) => {
                self.store
                    .apply(|current| reducers::todo_renamed(current, todo_id, title));
                LOG.info(format!("todo-list {todo_id} renamed"));
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "update todo title", &err);
                Err(err)
            }
        }
    }

    async fn send_rename(&self, todo_id: &str, title: &str) -> Result<()> {
        let request = ApiRequest::put(endpoints::todo_list(todo_id), &json!({ "title": title }))?;
        self.client.command(request).await
    }

    pub async fn delete_todo(&self, todo_id: &str) -> Result<()> {
        LOG.info("delete todo request sent");
        match self
            .client
            .command(ApiRequest::delete(endpoints::todo_list(todo_id)))
            .await
        {
            Ok(()) => {
                self.store
                    .apply(|current| reducers::todo_removed(current, todo_id));
                LOG.info(format!("todo-list {todo_id} deleted"));
                Ok(())
            }
            Err(err) => {
                report_failure(&LOG, &self.notifications, "delete todo", &err);
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
    use taskdeck_api::{ApiResponse, Method};
    use tokio::sync::oneshot;
    use tokio_test::{
        assert_err, assert_ok, assert_pending, assert_ready_err, assert_ready_ok, task,
    };

    fn service() -> TodosService<FakeTransport> {
        TodosService::new(
            Arc::new(ApiClient::new(FakeTransport::new())),
            Arc::new(NotificationService::new()),
            Arc::new(TodoStore::new()),
            Arc::new(RequestSequencer::new()),
        )
    }

    fn transport(service: &TodosService<FakeTransport>) -> &FakeTransport {
        service.client.transport()
    }

    fn todo_json(id: &str, title: &str) -> Value {
        json!({ "id": id, "title": title, "addedDate": "2023-11-27T07:41:04.363", "order": 0 })
    }

    fn envelope(data: Value, code: i64, messages: &[&str]) -> Value {
        json!({ "data": data, "messages": messages, "fieldsErrors": [], "resultCode": code })
    }

    async fn loaded(ids: &[&str]) -> TodosService<FakeTransport> {
        let service = service();
        let items: Vec<Value> = ids.iter().map(|id| todo_json(id, id)).collect();
        transport(&service).respond(200, Value::Array(items));
        service.get_todos().await.unwrap();
        service
    }

    fn ids(service: &TodosService<FakeTransport>) -> Vec<String> {
        service
            .store()
            .snapshot()
            .iter()
            .map(|todo| todo.id().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_get_todos_replaces_mirror() {
        let service = loaded(&["a", "b"]).await;
        assert_eq!(ids(&service), ["a", "b"]);
        assert!(service
            .store()
            .snapshot()
            .iter()
            .all(|todo| todo.filter == FilterType::All));
    }

    #[tokio::test]
    async fn test_add_todo_prepends_once() {
        let service = loaded(&["a", "b"]).await;
        transport(&service).respond(
            200,
            envelope(json!({ "item": todo_json("c", "groceries") }), 0, &[]),
        );

        let todo = service.add_todo("groceries").await.unwrap();

        assert_eq!(todo.id, "c");
        assert_eq!(ids(&service), ["c", "a", "b"]);

        let sent = transport(&service).last_request().unwrap();
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.body.unwrap(), json!({ "title": "groceries" }));
    }

    #[tokio::test]
    async fn test_add_todo_already_reloaded_appears_once() {
        let service = loaded(&["c", "a"]).await;
        transport(&service).respond(
            200,
            envelope(json!({ "item": todo_json("c", "groceries") }), 0, &[]),
        );

        assert_ok!(service.add_todo("groceries").await);
        assert_eq!(ids(&service), ["c", "a"]);
        assert_eq!(service.store().get("c").unwrap().todo.title, "groceries");
    }

    #[tokio::test]
    async fn test_add_todo_refused_leaves_mirror() {
        let service = loaded(&["a"]).await;
        let before = service.store().snapshot();
        transport(&service).respond(200, envelope(json!({}), 1, &["Title is too long"]));

        let err = assert_err!(service.add_todo("x".repeat(200).as_str()).await);

        assert!(err.is_domain());
        assert_eq!(service.store().snapshot(), before);
        assert_eq!(
            service.notifications.current().unwrap().message,
            "Title is too long"
        );
    }

    #[tokio::test]
    async fn test_update_title() {
        let service = loaded(&["a", "b"]).await;
        transport(&service).respond(200, envelope(json!({}), 0, &[]));

        assert_ok!(service.update_todo_title("b", "renamed").await);

        assert_eq!(service.store().get("b").unwrap().todo.title, "renamed");
        let sent = transport(&service).last_request().unwrap();
        assert_eq!(sent.method, Method::Put);
        assert_eq!(sent.path, "/todo-lists/b");
    }

    #[tokio::test]
    async fn test_delete_keeps_others_in_order() {
        let service = loaded(&["a", "b", "c"]).await;
        transport(&service).respond(200, Value::Null);

        assert_ok!(service.delete_todo("b").await);
        assert_eq!(ids(&service), ["a", "c"]);
    }

    #[tokio::test]
    async fn test_delete_transport_failure_leaves_mirror() {
        let service = loaded(&["a", "b"]).await;
        let before = service.store().snapshot();
        transport(&service).respond(503, Value::Null);

        let err = assert_err!(service.delete_todo("a").await);

        assert!(err.is_transport());
        assert_eq!(service.store().snapshot(), before);
        assert!(service.notifications.current().is_some());
    }

    #[tokio::test]
    async fn test_change_filter_is_local() {
        let service = loaded(&["a", "b"]).await;
        let sent_before = transport(&service).requests().len();

        service.change_filter("a", FilterType::Completed);

        let todos = service.store().snapshot();
        assert_eq!(todos[0].filter, FilterType::Completed);
        assert_eq!(todos[1].filter, FilterType::All);
        assert_eq!(transport(&service).requests().len(), sent_before);
    }

    /// Transport whose responses are released by the test, in any order.
    #[derive(Default)]
    struct GatedTransport {
        gates: std::sync::Mutex<std::collections::VecDeque<oneshot::Receiver<ApiResponse>>>,
    }

    impl GatedTransport {
        fn gate(&self) -> oneshot::Sender<ApiResponse> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl HttpTransport for GatedTransport {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse> {
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.map_err(|_| Error::ChannelClosed),
                None => Err(Error::transport("no gate")),
            }
        }
    }

    fn gated_service() -> TodosService<GatedTransport> {
        TodosService::new(
            Arc::new(ApiClient::new(GatedTransport::default())),
            Arc::new(NotificationService::new()),
            Arc::new(TodoStore::new()),
            Arc::new(RequestSequencer::new()),
        )
    }

    #[tokio::test]
    async fn test_stale_reload_is_dropped() {
        let service = gated_service();
        let older_gate = service.client.transport().gate();
        let newer_gate = service.client.transport().gate();

        let mut older = task::spawn(service.get_todos());
        let mut newer = task::spawn(service.get_todos());
        assert_pending!(older.poll());
        assert_pending!(newer.poll());

        newer_gate
            .send(ApiResponse::new(200, json!([todo_json("new", "new")])))
            .unwrap();
        assert_ready_ok!(newer.poll());

        older_gate
            .send(ApiResponse::new(200, json!([todo_json("old", "old")])))
            .unwrap();
        assert_ready_ok!(older.poll());

        let ids: Vec<String> = service
            .store()
            .snapshot()
            .iter()
            .map(|todo| todo.id().to_string())
            .collect();
        assert_eq!(ids, ["new"]);
    }

    #[tokio::test]
    async fn test_older_reload_applies_when_newer_fails() {
        let service = gated_service();
        let older_gate = service.client.transport().gate();
        let newer_gate = service.client.transport().gate();

        let mut older = task::spawn(service.get_todos());
        let mut newer = task::spawn(service.get_todos());
        assert_pending!(older.poll());
        assert_pending!(newer.poll());

        drop(newer_gate);
        assert_ready_err!(newer.poll());

        older_gate
            .send(ApiResponse::new(200, json!([todo_json("a", "a")])))
            .unwrap();
        assert_ready_ok!(older.poll());

        let ids: Vec<String> = service
            .store()
            .snapshot()
            .iter()
            .map(|todo| todo.id().to_string())
            .collect();
        assert_eq!(ids, ["a"]);
    }
}
