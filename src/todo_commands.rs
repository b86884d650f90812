use anyhow::{anyhow, Context};
use inquire::Text;
use uuid::Uuid;

use crate::{
    models::todo_model::{Todo, TodoPatch},
    todo_client::{HttpTodoClient, TodoApi},
};

/// One line per todo, `[x] title  (id)`
pub fn format_todo_line(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };

    format!("[{}] {}  ({})", mark, todo.title, todo.id)
}

fn parse_id(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("Invalid todo id {:?}", raw))
}

/// List all the todos
pub fn list_todos<A: TodoApi>(api: &A) -> anyhow::Result<Vec<String>> {
    let todos = api.fetch_todos().context("Failed to fetch todos")?;

    if todos.is_empty() {
        return Ok(vec![String::from("Nothing to do")]);
    }

    let done = todos.iter().filter(|todo| todo.completed).count();

    let mut lines: Vec<String> = todos.iter().map(format_todo_line).collect();
    lines.push(format!("Completed: {} / {}", done, todos.len()));

    Ok(lines)
}

/// Prompt user to create new todo if no title was given
pub fn create_new_todo<A: TodoApi>(api: &A, title: Option<String>) -> anyhow::Result<Todo> {
    let title = match title {
        Some(title) => title,
        None => Text::new("Title")
            .with_help_message("Title for your new todo")
            .prompt()
            .map_err(|e| anyhow!("{}", e))?,
    };

    if title.trim().is_empty() {
        return Err(anyhow!("Title is required"));
    }

    api.create_todo(title.trim()).context("Failed to add todo")
}

/// Flip the completed flag of a todo
pub fn toggle_todo<A: TodoApi>(api: &A, raw_id: &str) -> anyhow::Result<Todo> {
    let id = parse_id(raw_id)?;

    let current = api
        .fetch_todos()
        .context("Failed to fetch todos")?
        .into_iter()
        .find(|todo| todo.id == id)
        .ok_or_else(|| anyhow!("Todo not found"))?;

    api.update_todo(id, &TodoPatch::completed(!current.completed))
        .context("Failed to update todo")
}

pub fn delete_todo<A: TodoApi>(api: &A, raw_id: &str) -> anyhow::Result<()> {
    let id = parse_id(raw_id)?;

    api.delete_todo(id).context("Failed to delete todo")
}

pub fn print_health(client: &HttpTodoClient) -> anyhow::Result<()> {
    let health = client
        .health()
        .with_context(|| format!("Server at {} is not reachable", client.base_url()))?;

    println!("{} {}", health.status, health.timestamp);

    Ok(())
}
