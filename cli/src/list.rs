use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use taskboard_core::{Task, TaskCounts, TaskView};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.short(),
            done: if task.completed { "✔" } else { "☐" },
            priority: task.priority.to_string(),
            category: task.category.to_string(),
            due: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            title: task.title.clone(),
        }
    }
}

pub fn print_tasks(view: &TaskView<'_>) {
    if view.visible.is_empty() {
        println!("No tasks found.");
        if view.is_narrowed() {
            println!("Try adjusting your search or filters.");
        } else {
            println!("Add your first task to get started!");
        }
        return;
    }

    let rows: Vec<TaskRow> = view.visible.iter().map(|t| TaskRow::from(*t)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
    println!(
        "{} shown, {} total ({} pending)",
        view.visible.len(),
        view.counts.total,
        view.counts.pending
    );
}

pub fn print_counts(counts: &TaskCounts) {
    println!("Total Tasks:    {}", counts.total);
    println!("Completed:      {}", counts.completed);
    println!("Pending:        {}", counts.pending);
    println!("High Priority:  {}", counts.high);
}
