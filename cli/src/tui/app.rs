use chrono::Local;
use ratatui::widgets::TableState;
use taskboard_core::{
    apply_input, draft_from_input, format_line, parse_line, ParsedInput, Task, TaskId, TaskUpdate,
    TaskView, Theme, ViewState,
};
use tracing::warn;

use crate::Service;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    Adding,
    Editing(TaskId),
}

pub struct App {
    pub service: Service,
    pub view_state: ViewState,
    pub state: TableState,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub message: Option<String>,
}

impl App {
    pub fn new(service: Service) -> App {
        let mut app = App {
            service,
            view_state: ViewState::default(),
            state: TableState::default(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            message: None,
        };
        app.clamp_selection();
        app
    }

    pub fn view(&self) -> TaskView<'_> {
        self.view_state.project(self.service.tasks())
    }

    pub fn theme(&self) -> Theme {
        self.service.theme()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.view().visible.get(i).copied()
    }

    fn visible_len(&self) -> usize {
        self.view().visible.len()
    }

    pub fn next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Keeps the selection inside the visible list after it changes.
    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
    }

    fn select_task(&mut self, id: &TaskId) {
        let position = self.view().visible.iter().position(|t| &t.id == id);
        if position.is_some() {
            self.state.select(position);
        } else {
            self.clamp_selection();
        }
    }

    pub fn toggle_status(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        self.report(|service| service.toggle_complete(&id));
        self.clamp_selection();
    }

    pub fn delete_task(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        self.report(|service| service.delete(&id));
        self.clamp_selection();
    }

    pub fn toggle_theme(&mut self) {
        self.report(|service| service.toggle_theme());
    }

    pub fn next_filter(&mut self) {
        self.view_state.filter = self.view_state.filter.next();
        self.clamp_selection();
    }

    pub fn previous_filter(&mut self) {
        self.view_state.filter = self.view_state.filter.previous();
        self.clamp_selection();
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.set_input(String::new());
    }

    pub fn enter_edit_mode(&mut self) {
        if let Some((id, line)) = self.selected_task().map(|t| (t.id, format_line(t))) {
            self.input_mode = InputMode::Editing(id);
            self.set_input(line);
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        let search = self.view_state.search.clone();
        self.set_input(search);
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    fn set_input(&mut self, value: String) {
        self.cursor_position = value.chars().count();
        self.input = value;
        self.message = None;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
        self.sync_search();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
            self.sync_search();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }

    // Search narrows the list as you type.
    fn sync_search(&mut self) {
        if self.input_mode == InputMode::Searching {
            self.view_state.search = self.input.clone();
            self.clamp_selection();
        }
    }

    pub fn submit(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.submit_add(),
            InputMode::Editing(id) => self.submit_edit(id),
            InputMode::Searching | InputMode::Normal => self.exit_input_mode(),
        }
    }

    // An unclosed quote leaves the form open with the reason shown.
    fn parse_input(&mut self) -> Option<ParsedInput> {
        match parse_line(&self.input) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.message = Some(format!("Cannot read input: {}", err));
                None
            }
        }
    }

    /// A blank title leaves the form open.
    fn submit_add(&mut self) {
        let Some(parsed) = self.parse_input() else {
            return;
        };
        let (draft, warnings) = draft_from_input(parsed, Local::now().date_naive());
        if !draft.has_title() {
            return;
        }
        let created = match self.service.create(draft) {
            Ok(created) => created,
            Err(err) => {
                self.fail(err);
                return;
            }
        };
        self.exit_input_mode();
        self.show_warnings(warnings);
        if let Some(task) = created {
            self.select_task(&task.id);
        }
    }

    fn submit_edit(&mut self, id: TaskId) {
        let Some(task) = self.service.get(&id) else {
            self.exit_input_mode();
            return;
        };
        let mut fields = TaskUpdate::from(task);
        let Some(parsed) = self.parse_input() else {
            return;
        };
        let warnings = apply_input(&mut fields, parsed, Local::now().date_naive());
        if !fields.has_title() {
            return;
        }
        if let Err(err) = self.service.update(&id, fields) {
            self.fail(err);
            return;
        }
        self.exit_input_mode();
        self.show_warnings(warnings);
        self.select_task(&id);
    }

    fn show_warnings(&mut self, warnings: Vec<String>) {
        if !warnings.is_empty() {
            self.message = Some(format!("Warning: {}", warnings.join("; ")));
        }
    }

    fn report<T>(&mut self, op: impl FnOnce(&mut Service) -> anyhow::Result<T>) {
        if let Err(err) = op(&mut self.service) {
            self.fail(err);
        }
    }

    fn fail(&mut self, err: anyhow::Error) {
        warn!(error = %err, "failed to save");
        self.message = Some(format!("Could not save: {}", err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::{FilterSelector, KeyValueStore, MemoryKeyValueStore, TaskService};

    fn app() -> App {
        let store: Box<dyn KeyValueStore> = Box::new(MemoryKeyValueStore::new());
        App::new(TaskService::open(store))
    }

    fn type_line(app: &mut App, line: &str) {
        for c in line.chars() {
            app.input_char(c);
        }
    }

    #[test]
    fn add_form_creates_and_selects_task() {
        let mut app = app();
        app.enter_add_mode();
        type_line(&mut app, "Buy milk pri:low cat:shopping");
        app.submit();

        assert_eq!(app.input_mode, InputMode::Normal);
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category.as_str(), "shopping");
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let mut app = app();
        app.enter_add_mode();
        type_line(&mut app, "   ");
        app.submit();
        assert_eq!(app.input_mode, InputMode::Adding);
        assert!(app.service.tasks().is_empty());
    }

    #[test]
    fn search_narrows_while_typing() {
        let mut app = app();
        for title in ["Buy milk", "Report"] {
            app.enter_add_mode();
            type_line(&mut app, title);
            app.submit();
        }
        app.enter_search_mode();
        type_line(&mut app, "rep");
        assert_eq!(app.view().visible.len(), 1);
        assert_eq!(app.selected_task().unwrap().title, "Report");

        app.delete_char();
        app.delete_char();
        app.delete_char();
        assert_eq!(app.view().visible.len(), 2);
    }

    #[test]
    fn toggle_under_pending_filter_moves_selection() {
        let mut app = app();
        for title in ["Buy milk", "Report"] {
            app.enter_add_mode();
            type_line(&mut app, title);
            app.submit();
        }
        app.next_filter();
        assert_eq!(app.view_state.filter, FilterSelector::Pending);
        app.state.select(Some(1));
        app.toggle_status();
        assert_eq!(app.view().visible.len(), 1);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn edit_form_prefills_every_field() {
        let mut app = app();
        app.enter_add_mode();
        type_line(&mut app, "Reprot pri:low cat:work");
        app.submit();

        app.enter_edit_mode();
        assert_eq!(app.input, "Reprot pri:low cat:work");
        app.input.clear();
        app.cursor_position = 0;
        type_line(&mut app, "Report pri:high cat:work");
        app.submit();

        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Report");
        assert_eq!(task.priority.as_str(), "high");
        assert_eq!(task.category.as_str(), "work");
    }

    #[test]
    fn description_with_spaces_survives_edit() {
        let mut app = app();
        app.enter_add_mode();
        type_line(&mut app, r#"Note: call Bob desc:"ask about the invoice""#);
        app.submit();
        {
            let task = app.selected_task().unwrap();
            assert_eq!(task.title, "Note: call Bob");
            assert_eq!(task.description, "ask about the invoice");
        }

        // change only the priority
        app.enter_edit_mode();
        type_line(&mut app, " pri:high");
        app.submit();

        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Note: call Bob");
        assert_eq!(task.description, "ask about the invoice");
        assert_eq!(task.priority.as_str(), "high");
    }

    #[test]
    fn unclosed_quote_keeps_form_open() {
        let mut app = app();
        app.enter_add_mode();
        type_line(&mut app, r#"Call desc:"no end"#);
        app.submit();
        assert_eq!(app.input_mode, InputMode::Adding);
        assert!(app.message.is_some());
        assert!(app.service.tasks().is_empty());
    }
}
