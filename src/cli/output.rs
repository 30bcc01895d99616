use serde::Serialize;

use crate::ops::query::{TaskView, ViewRow};
use crate::ops::resolve::Named;
use crate::util::unicode::{display_width, pad_to_width, strip_emojis};

/// Table placeholder for a referenced entity that could not be found
pub const NOT_AVAILABLE: &str = "N/A";

/// Display options shared by every listing
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub show_ids: bool,
    pub strip_emojis: bool,
}

impl ViewOptions {
    fn text(&self, s: &str) -> String {
        if self.strip_emojis {
            strip_emojis(s)
        } else {
            s.to_string()
        }
    }

    fn opt_text(&self, s: Option<&str>) -> Option<String> {
        s.map(|s| self.text(s))
    }
}

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// One task in `--json` output. Inactive optional columns are left out
/// entirely; active ones are `null` when the lookup missed.
#[derive(Debug, Serialize)]
pub struct TaskJson {
    pub id: String,
    pub content: String,
    pub project: Option<String>,
    pub priority: u8,
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Option<String>>,
}

/// A project, section or label in `--json` output
#[derive(Debug, Serialize)]
pub struct EntityJson {
    pub id: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(row: &ViewRow, view: &TaskView, display: ViewOptions) -> TaskJson {
    TaskJson {
        id: row.id.clone(),
        content: display.text(&row.content),
        project: display.opt_text(row.project.as_deref()),
        priority: row.priority,
        due: display.opt_text(row.due.as_deref()),
        section: view
            .columns
            .section
            .then(|| display.opt_text(row.section.as_deref())),
        parent: view
            .columns
            .parent
            .then(|| display.opt_text(row.parent.as_deref())),
    }
}

pub fn view_to_json(view: &TaskView, display: ViewOptions) -> Vec<TaskJson> {
    view.rows
        .iter()
        .map(|row| task_to_json(row, view, display))
        .collect()
}

pub fn entities_to_json<T: Named>(items: &[T], display: ViewOptions) -> Vec<EntityJson> {
    items
        .iter()
        .map(|item| EntityJson {
            id: item.id().to_string(),
            name: display.text(item.name()),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Lay out `rows` under `headers`, columns separated by two spaces and padded
/// by terminal cell width. The last column is not padded.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(cell));
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(headers.iter().copied(), &widths));
    for row in rows {
        lines.push(render_line(row.iter().map(String::as_str), &widths));
    }
    lines
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::new();
    let mut cells = cells.enumerate().peekable();
    while let Some((col, cell)) = cells.next() {
        if cells.peek().is_some() {
            line.push_str(&pad_to_width(cell, widths[col]));
            line.push_str("  ");
        } else {
            line.push_str(cell);
        }
    }
    line
}

/// Table lines for a task listing: ID (with `show_ids`), Content, Parent Task
/// and Section when their columns are on, then Project, Priority and Due.
pub fn format_task_table(view: &TaskView, display: ViewOptions) -> Vec<String> {
    let columns = view.columns;
    let mut headers = Vec::new();
    if display.show_ids {
        headers.push("ID");
    }
    headers.push("Content");
    if columns.parent {
        headers.push("Parent Task");
    }
    headers.push("Project");
    if columns.section {
        headers.push("Section");
    }
    headers.push("Priority");
    headers.push("Due");

    let or_na = |s: Option<&str>| {
        display
            .opt_text(s)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(headers.len());
            if display.show_ids {
                cells.push(row.id.clone());
            }
            cells.push(display.text(&row.content));
            if columns.parent {
                cells.push(or_na(row.parent.as_deref()));
            }
            cells.push(or_na(row.project.as_deref()));
            if columns.section {
                cells.push(or_na(row.section.as_deref()));
            }
            cells.push(row.priority.to_string());
            cells.push(or_na(row.due.as_deref()));
            cells
        })
        .collect();

    format_table(&headers, &rows)
}

/// Table lines for a project, section or label listing.
pub fn format_entity_table<T: Named>(items: &[T], display: ViewOptions) -> Vec<String> {
    let headers: &[&str] = if display.show_ids {
        &["ID", "Name"]
    } else {
        &["Name"]
    };
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            let mut cells = Vec::with_capacity(2);
            if display.show_ids {
                cells.push(item.id().to_string());
            }
            cells.push(display.text(item.name()));
            cells
        })
        .collect();
    format_table(headers, &rows)
}
