//! Headless mode runner - stdin command loop
//!
//! Reads commands from stdin on a blocking thread, runs them one at a time
//! against the [`App`], and writes every resulting state change as
//! [`HeadlessEvent`]s before the next command is read.

use std::io::Write;

use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use taskdeck_api::HttpTransport;
use taskdeck_app::config::ConsoleSettings;
use taskdeck_app::{App, Route, SessionState, TaskMap};
use taskdeck_core::prelude::Result;
use taskdeck_core::{DomainTodo, LoginRequest, Notification, TaskStatus};

use super::command::{Command, USAGE};
use super::HeadlessEvent;

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run in headless mode until `quit` or end of input.
pub async fn run_headless<T: HttpTransport + Sync>(
    app: &App<T>,
    settings: &ConsoleSettings,
) -> Result<()> {
    info!("═══════════════════════════════════════════════════════");
    info!("taskdeck starting in HEADLESS mode");
    info!("═══════════════════════════════════════════════════════");

    let (line_tx, line_rx) = mpsc::channel::<String>(32);
    std::thread::spawn(move || {
        spawn_stdin_reader_blocking(line_tx);
    });

    let mut stdout = std::io::stdout();
    let result = run_console(app, settings, line_rx, &mut stdout).await;

    info!("taskdeck headless mode exiting");
    result
}

/// Console loop over any line source and event sink.
///
/// State changes caused by a command are written before that command's
/// `error` event and before the next line is read.
pub async fn run_console<T, W>(
    app: &App<T>,
    settings: &ConsoleSettings,
    mut lines: mpsc::Receiver<String>,
    out: &mut W,
) -> Result<()>
where
    T: HttpTransport + Sync,
    W: Write,
{
    let mut changes = StateChanges::new(app);

    if settings.check_session_on_start {
        // Failures are already reported through the notification stream
        let _ = app.check_session().await;
        app.auth().startup_latch().wait().await;
    }

    changes.write_session(out);
    changes.flush(out);
    HeadlessEvent::ready().write_to(out);

    while let Some(line) = lines.recv().await {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if settings.echo_commands {
            HeadlessEvent::command(trimmed).write_to(out);
        }

        let command = match Command::parse(trimmed) {
            Ok(command) => command,
            Err(message) => {
                warn!("Rejected stdin command: {}", message);
                HeadlessEvent::error(message, false).write_to(out);
                continue;
            }
        };

        let result = execute(app, command, out).await;
        changes.flush(out);

        match result {
            Ok(Flow::Quit) => {
                info!("Quit requested");
                break;
            }
            Ok(Flow::Continue) => {}
            Err(e) => HeadlessEvent::error(e.to_string(), false).write_to(out),
        }
    }

    Ok(())
}

/// Run one command against the app.
///
/// Service failures have already been reported as notifications by the
/// time the error reaches the caller.
pub async fn execute<T, W>(app: &App<T>, command: Command, out: &mut W) -> Result<Flow>
where
    T: HttpTransport + Sync,
    W: Write,
{
    match command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let request = LoginRequest::new(email, password).remember(remember);
            app.login(&request).await?;
        }
        Command::Logout => app.logout().await?,
        Command::Me => app.check_session().await?,
        Command::Todos => app.get_todos().await?,
        Command::TodoAdd { title } => {
            app.add_todo(&title).await?;
        }
        Command::TodoRename { todo_id, title } => app.update_todo_title(&todo_id, &title).await?,
        Command::TodoDelete { todo_id } => app.delete_todo(&todo_id).await?,
        Command::TodoFilter { todo_id, filter } => {
            app.change_filter(&todo_id, filter);
            write_visible(app, &todo_id, out);
        }
        Command::Tasks { todo_id } => app.get_tasks(&todo_id).await?,
        Command::TaskAdd { todo_id, title } => {
            app.add_task(&todo_id, &title).await?;
        }
        Command::TaskRename {
            todo_id,
            task_id,
            title,
        } => app.rename_task(&todo_id, &task_id, &title).await?,
        Command::TaskDone { todo_id, task_id } => {
            app.set_task_status(&todo_id, &task_id, TaskStatus::Completed)
                .await?
        }
        Command::TaskUndone { todo_id, task_id } => {
            app.set_task_status(&todo_id, &task_id, TaskStatus::New)
                .await?
        }
        Command::TaskDelete { todo_id, task_id } => app.delete_task(&todo_id, &task_id).await?,
        Command::Show { todo_id } => write_visible(app, &todo_id, out),
        Command::Dismiss => app.dismiss_notification(),
        Command::Help => eprintln!("{USAGE}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn write_visible<T, W: Write>(app: &App<T>, todo_id: &str, out: &mut W) {
    let filter = app
        .todo_store()
        .get(todo_id)
        .map(|todo| todo.filter)
        .unwrap_or_default();
    HeadlessEvent::visible_tasks(todo_id, filter, app.visible_tasks(todo_id)).write_to(out);
}

/// Receivers for every observable piece of app state.
///
/// Each [`StateChanges::flush`] writes one event per receiver whose value
/// changed since the previous flush.
struct StateChanges {
    todos: watch::Receiver<Vec<DomainTodo>>,
    tasks: watch::Receiver<TaskMap>,
    session: watch::Receiver<SessionState>,
    route: watch::Receiver<Route>,
    notification: watch::Receiver<Option<Notification>>,
}

impl StateChanges {
    fn new<T>(app: &App<T>) -> Self {
        Self {
            todos: app.todo_store().subscribe(),
            tasks: app.task_store().subscribe(),
            session: app.auth().subscribe_session(),
            route: app.routes().subscribe(),
            notification: app.notifications().subscribe(),
        }
    }

    /// Write the session unconditionally.
    fn write_session<W: Write>(&mut self, out: &mut W) {
        let event = HeadlessEvent::session(&self.session.borrow_and_update());
        event.write_to(out);
    }

    fn flush<W: Write>(&mut self, out: &mut W) {
        if let Some(todos) = take_changed(&mut self.todos) {
            HeadlessEvent::todos(todos).write_to(out);
        }
        if let Some(tasks) = take_changed(&mut self.tasks) {
            HeadlessEvent::tasks(tasks).write_to(out);
        }
        if let Some(session) = take_changed(&mut self.session) {
            HeadlessEvent::session(&session).write_to(out);
        }
        if let Some(route) = take_changed(&mut self.route) {
            HeadlessEvent::navigated(route).write_to(out);
        }
        if let Some(current) = take_changed(&mut self.notification) {
            HeadlessEvent::notification(current.as_ref()).write_to(out);
        }
    }
}

fn take_changed<V: Clone>(rx: &mut watch::Receiver<V>) -> Option<V> {
    match rx.has_changed() {
        Ok(true) => Some(rx.borrow_and_update().clone()),
        _ => None,
    }
}

/// Read stdin lines and forward them to the command loop (blocking version)
fn spawn_stdin_reader_blocking(line_tx: mpsc::Sender<String>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    let reader = stdin.lock();

    for line in reader.lines() {
        match line {
            Ok(line) => {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
