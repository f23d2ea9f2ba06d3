//! Line commands accepted on stdin.

use taskdeck_core::FilterType;

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login {
        email: String,
        password: String,
        remember: bool,
    },
    Logout,
    Me,
    Todos,
    TodoAdd {
        title: String,
    },
    TodoRename {
        todo_id: String,
        title: String,
    },
    TodoDelete {
        todo_id: String,
    },
    TodoFilter {
        todo_id: String,
        filter: FilterType,
    },
    Tasks {
        todo_id: String,
    },
    TaskAdd {
        todo_id: String,
        title: String,
    },
    TaskRename {
        todo_id: String,
        task_id: String,
        title: String,
    },
    TaskDone {
        todo_id: String,
        task_id: String,
    },
    TaskUndone {
        todo_id: String,
        task_id: String,
    },
    TaskDelete {
        todo_id: String,
        task_id: String,
    },
    Show {
        todo_id: String,
    },
    Dismiss,
    Help,
    Quit,
}

pub const USAGE: &str = "\
commands:
  login <email> <password> [remember]
  logout
  me
  todos
  todo add <title>
  todo rename <todoId> <title>
  todo delete <todoId>
  todo filter <todoId> <all|active|completed>
  tasks <todoId>
  task add <todoId> <title>
  task rename <todoId> <taskId> <title>
  task done <todoId> <taskId>
  task undone <todoId> <taskId>
  task delete <todoId> <taskId>
  show <todoId>
  dismiss
  help
  quit";

impl Command {
    /// Parse a non-empty line. Titles take the rest of the line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Err("empty command".to_string());
        };

        match head {
            "login" => match args {
                [email, password] => Ok(Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                    remember: false,
                }),
                [email, password, flag] => Ok(Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                    remember: parse_remember(flag)?,
                }),
                _ => Err("usage: login <email> <password> [remember]".to_string()),
            },
            "logout" => no_args(args, Command::Logout),
            "me" => no_args(args, Command::Me),
            "todos" => no_args(args, Command::Todos),
            "tasks" => match args {
                [todo_id] => Ok(Command::Tasks {
                    todo_id: todo_id.to_string(),
                }),
                _ => Err("usage: tasks <todoId>".to_string()),
            },
            "show" => match args {
                [todo_id] => Ok(Command::Show {
                    todo_id: todo_id.to_string(),
                }),
                _ => Err("usage: show <todoId>".to_string()),
            },
            "todo" => parse_todo(args),
            "task" => parse_task(args),
            "dismiss" => no_args(args, Command::Dismiss),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

fn no_args(args: &[&str], command: Command) -> Result<Command, String> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(format!("'{}' takes no arguments", args.join(" ")))
    }
}

fn parse_remember(flag: &str) -> Result<bool, String> {
    match flag {
        "remember" | "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        other => Err(format!("unexpected '{other}', expected 'remember'")),
    }
}

fn title(words: &[&str]) -> Result<String, String> {
    if words.is_empty() {
        Err("title must not be empty".to_string())
    } else {
        Ok(words.join(" "))
    }
}

fn parse_todo(args: &[&str]) -> Result<Command, String> {
    match args {
        ["add", rest @ ..] => Ok(Command::TodoAdd { title: title(rest)? }),
        ["rename", todo_id, rest @ ..] => Ok(Command::TodoRename {
            todo_id: todo_id.to_string(),
            title: title(rest)?,
        }),
        ["delete", todo_id] => Ok(Command::TodoDelete {
            todo_id: todo_id.to_string(),
        }),
        ["filter", todo_id, filter] => Ok(Command::TodoFilter {
            todo_id: todo_id.to_string(),
            filter: filter.parse()?,
        }),
        _ => Err("usage: todo add|rename|delete|filter ...".to_string()),
    }
}

fn parse_task(args: &[&str]) -> Result<Command, String> {
    match args {
        ["add", todo_id, rest @ ..] => Ok(Command::TaskAdd {
            todo_id: todo_id.to_string(),
            title: title(rest)?,
        }),
        ["rename", todo_id, task_id, rest @ ..] => Ok(Command::TaskRename {
            todo_id: todo_id.to_string(),
            task_id: task_id.to_string(),
            title: title(rest)?,
        }),
        ["done", todo_id, task_id] => Ok(Command::TaskDone {
            todo_id: todo_id.to_string(),
            task_id: task_id.to_string(),
        }),
        ["undone", todo_id, task_id] => Ok(Command::TaskUndone {
            todo_id: todo_id.to_string(),
            task_id: task_id.to_string(),
        }),
        ["delete", todo_id, task_id] => Ok(Command::TaskDelete {
            todo_id: todo_id.to_string(),
            task_id: task_id.to_string(),
        }),
        _ => Err("usage: task add|rename|done|undone|delete ...".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        assert_eq!(
            Command::parse("login testemail@gmail.com qwerty123").unwrap(),
            Command::Login {
                email: "testemail@gmail.com".into(),
                password: "qwerty123".into(),
                remember: false,
            }
        );
        assert!(matches!(
            Command::parse("login a@b.c pw remember").unwrap(),
            Command::Login { remember: true, .. }
        ));
        assert!(Command::parse("login a@b.c").is_err());
        assert!(Command::parse("login a@b.c pw maybe").is_err());
    }

    #[test]
    fn test_titles_take_rest_of_line() {
        assert_eq!(
            Command::parse("todo add  weekly   groceries ").unwrap(),
            Command::TodoAdd {
                title: "weekly groceries".into()
            }
        );
        assert_eq!(
            Command::parse("task rename l1 t1 call the plumber").unwrap(),
            Command::TaskRename {
                todo_id: "l1".into(),
                task_id: "t1".into(),
                title: "call the plumber".into(),
            }
        );
        assert!(Command::parse("todo add").is_err());
        assert!(Command::parse("task add l1").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            Command::parse("todo filter l1 Completed").unwrap(),
            Command::TodoFilter {
                todo_id: "l1".into(),
                filter: FilterType::Completed,
            }
        );
        let err = Command::parse("todo filter l1 finished").unwrap_err();
        assert!(err.contains("unknown filter"));
    }

    #[test]
    fn test_parse_task_commands() {
        assert!(matches!(
            Command::parse("task done l1 t1").unwrap(),
            Command::TaskDone { .. }
        ));
        assert!(matches!(
            Command::parse("task undone l1 t1").unwrap(),
            Command::TaskUndone { .. }
        ));
        assert!(matches!(
            Command::parse("task delete l1 t1").unwrap(),
            Command::TaskDelete { .. }
        ));
        assert!(Command::parse("task done l1").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("todos").unwrap(), Command::Todos);
        assert_eq!(Command::parse("me").unwrap(), Command::Me);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert_eq!(Command::parse("dismiss").unwrap(), Command::Dismiss);
        assert!(Command::parse("logout now").is_err());
        assert!(Command::parse("launch").unwrap_err().contains("unknown command"));
        assert!(Command::parse("   ").is_err());
    }
}
