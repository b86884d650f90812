use tui::widgets::ListState;
use uuid::Uuid;

use crate::{
    models::todo_model::{Todo, TodoPatch},
    todo_client::TodoApi,
};

pub const FETCH_FAILED: &str = "Failed to fetch todos";
pub const ADD_FAILED: &str = "Failed to add todo";
pub const UPDATE_FAILED: &str = "Failed to update todo";
pub const DELETE_FAILED: &str = "Failed to delete todo";

pub struct StatefulList<T> {
    pub state: ListState,
    pub items: Vec<T>,
}

impl<T> StatefulList<T> {
    pub fn with_items(items: Vec<T>) -> StatefulList<T> {
        StatefulList {
            state: ListState::default(),
            items,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return self.unselect();
        }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return self.unselect();
        }

        let i = match self.state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => self.items.len() - 1,
        };
        self.state.select(Some(i));
    }

    pub fn unselect(&mut self) {
        self.state.select(None);
    }

    pub fn selected(&self) -> Option<&T> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    /// Keeps the selection inside the list after removals
    fn clamp_selection(&mut self) {
        match self.state.selected() {
            Some(_) if self.items.is_empty() => self.unselect(),
            Some(i) if i >= self.items.len() => self.state.select(Some(self.items.len() - 1)),
            _ => {}
        }
    }
}

/// What the view shows above the list
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Before the first fetch finished
    Loading,
    Ready,
    /// Last operation failed, the list keeps its previous content
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    None,
    Editing,
}

/// Client side state of the todo list.
///
/// Every operation goes to the api first and only touches the local list
/// once the server answered, failures just set the error banner.
pub struct App {
    pub todos: StatefulList<Todo>,
    pub state: ViewState,
    pub input_text: String,
    pub input_mode: InputMode,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> App {
        App {
            todos: StatefulList::with_items(vec![]),
            state: ViewState::Loading,
            input_text: String::new(),
            input_mode: InputMode::None,
        }
    }

    fn handle_error(&mut self, banner: &str, e: impl std::fmt::Display) {
        log::debug!("{}: {}", banner, e);
        self.state = ViewState::Error(banner.to_string());
    }

    /// Fetches the whole list, replacing the local one on success
    pub fn load<A: TodoApi + ?Sized>(&mut self, api: &A) {
        match api.fetch_todos() {
            Ok(todos) => {
                self.todos.items = todos;
                self.todos.clamp_selection();
                self.state = ViewState::Ready;
            }
            Err(e) => self.handle_error(FETCH_FAILED, e),
        }
    }

    /// Sends the input line as a new todo, blank input is ignored
    pub fn add_todo<A: TodoApi + ?Sized>(&mut self, api: &A) {
        let title = self.input_text.trim();

        if title.is_empty() {
            return;
        }

        match api.create_todo(title) {
            Ok(todo) => {
                self.todos.items.push(todo);
                self.input_text.clear();
                self.state = ViewState::Ready;
            }
            Err(e) => self.handle_error(ADD_FAILED, e),
        }
    }

    /// Flips `completed` of the todo with `id`, unknown ids are ignored
    pub fn toggle_todo<A: TodoApi + ?Sized>(&mut self, api: &A, id: Uuid) {
        let index = match self.todos.items.iter().position(|todo| todo.id == id) {
            Some(index) => index,
            None => return,
        };

        let patch = TodoPatch::completed(!self.todos.items[index].completed);

        match api.update_todo(id, &patch) {
            Ok(updated) => {
                self.todos.items[index] = updated;
                self.state = ViewState::Ready;
            }
            Err(e) => self.handle_error(UPDATE_FAILED, e),
        }
    }

    pub fn delete_todo<A: TodoApi + ?Sized>(&mut self, api: &A, id: Uuid) {
        match api.delete_todo(id) {
            Ok(()) => {
                self.todos.items.retain(|todo| todo.id != id);
                self.todos.clamp_selection();
                self.state = ViewState::Ready;
            }
            Err(e) => self.handle_error(DELETE_FAILED, e),
        }
    }

    pub fn toggle_selected<A: TodoApi + ?Sized>(&mut self, api: &A) {
        if let Some(id) = self.todos.selected().map(|todo| todo.id) {
            self.toggle_todo(api, id);
        }
    }

    pub fn delete_selected<A: TodoApi + ?Sized>(&mut self, api: &A) {
        if let Some(id) = self.todos.selected().map(|todo| todo.id) {
            self.delete_todo(api, id);
        }
    }

    pub fn completed_count(&self) -> usize {
        self.todos.items.iter().filter(|todo| todo.completed).count()
    }

    pub fn banner(&self) -> Option<&str> {
        match &self.state {
            ViewState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == ViewState::Loading
    }
}
