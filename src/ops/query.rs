//! Task listing: scope → subtasks → section → temporal union → recurring →
//! sort → rows.
//!
//! Each stage is a plain function over `&Task` so it can be tested on its
//! own; [`list_tasks`] wires them together against the cache. The resulting
//! [`TaskView`] is the single source for both table and JSON output.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::io::remote::RemoteError;
use crate::model::Task;
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{Halt, Outcome, Soft, finish};
use crate::ops::resolve::{optional_project, require_section};

/// Which due-date filters to apply.
///
/// `today` and `overdue` combine as a union; `recurring` narrows the result
/// of that union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalFilter {
    pub today: bool,
    pub overdue: bool,
    pub recurring: bool,
}

impl TemporalFilter {
    /// The `task today` shortcut: due today or overdue.
    pub fn due_now() -> Self {
        TemporalFilter {
            today: true,
            overdue: true,
            recurring: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.today || self.overdue || self.recurring
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Project partial name or numeric id
    pub project: Option<String>,
    /// Section partial name; only valid together with `project`
    pub section: Option<String>,
    pub include_subtasks: bool,
    pub temporal: TemporalFilter,
}

/// Optional columns active for a result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    pub parent: bool,
    pub section: bool,
}

/// A display-ready task. `None` in a name field means the referenced entity
/// could not be found ("not available").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub id: String,
    pub content: String,
    /// Content of the parent task; only meaningful when the parent column is on
    pub parent: Option<String>,
    pub project: Option<String>,
    /// Only meaningful when the section column is on
    pub section: Option<String>,
    pub priority: u8,
    pub due: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskView {
    pub rows: Vec<ViewRow>,
    pub columns: ColumnPlan,
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

pub fn drop_subtasks(tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.into_iter().filter(|t| !t.is_subtask()).collect()
}

pub fn keep_section<'a>(tasks: Vec<&'a Task>, section_id: &str) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|t| t.section_id.as_deref() == Some(section_id))
        .collect()
}

/// The section column is shown as soon as any remaining task has a section.
pub fn needs_section_column(tasks: &[&Task]) -> bool {
    tasks.iter().any(|t| t.section_id.is_some())
}

pub fn is_due_today(task: &Task, today: NaiveDate) -> bool {
    task.due_date() == Some(today)
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.due_date().is_some_and(|d| d < today)
}

/// Keep tasks matching any requested of {today, overdue}, each id once.
/// Without either flag the input is returned untouched.
pub fn temporal_union<'a>(
    tasks: Vec<&'a Task>,
    filter: TemporalFilter,
    today: NaiveDate,
) -> Vec<&'a Task> {
    if !filter.today && !filter.overdue {
        return tasks;
    }
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|t| {
            (filter.today && is_due_today(t, today)) || (filter.overdue && is_overdue(t, today))
        })
        .filter(|t| seen.insert(t.id.as_str()))
        .collect()
}

pub fn keep_recurring(tasks: Vec<&Task>) -> Vec<&Task> {
    tasks.into_iter().filter(|t| t.is_recurring()).collect()
}

/// Sort by (project, section, content), all lower-cased. Stable.
pub fn sort_tasks(
    tasks: &mut [&Task],
    project_names: &HashMap<String, String>,
    section_names: &HashMap<String, String>,
) {
    tasks.sort_by_cached_key(|t| {
        let project = project_names
            .get(&t.project_id)
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        let section = t
            .section_id
            .as_ref()
            .and_then(|sid| section_names.get(sid))
            .map(|n| n.to_lowercase())
            .unwrap_or_default();
        (project, section, t.content.to_lowercase())
    });
}

/// Merged section-id → name lookup for the given projects, one cache read each.
fn section_lookup<'p>(
    cache: &mut EntityCache<'_>,
    project_ids: impl IntoIterator<Item = &'p str>,
) -> Result<HashMap<String, String>, RemoteError> {
    let mut names = HashMap::new();
    for pid in project_ids {
        for s in cache.sections(pid)?.iter() {
            names.insert(s.id.clone(), s.name.clone());
        }
    }
    Ok(names)
}

fn to_row(
    task: &Task,
    columns: ColumnPlan,
    project_names: &HashMap<String, String>,
    section_names: &HashMap<String, String>,
    by_id: &HashMap<&str, &Task>,
) -> ViewRow {
    let parent = if columns.parent {
        task.parent_id
            .as_deref()
            .and_then(|pid| by_id.get(pid))
            .map(|p| p.content.clone())
    } else {
        None
    };
    let section = if columns.section {
        task.section_id
            .as_ref()
            .and_then(|sid| section_names.get(sid))
            .cloned()
    } else {
        None
    };
    ViewRow {
        id: task.id.clone(),
        content: task.content.clone(),
        parent,
        project: project_names.get(&task.project_id).cloned(),
        section,
        priority: task.priority,
        due: task.due.as_ref().map(|d| d.string.clone()),
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Build the task listing for `opts`, with `today` as the current date.
pub fn list_tasks(
    cache: &mut EntityCache<'_>,
    opts: &ListOptions,
    today: NaiveDate,
) -> Result<Outcome<TaskView>, RemoteError> {
    finish(build_view(cache, opts, today))
}

fn build_view(
    cache: &mut EntityCache<'_>,
    opts: &ListOptions,
    today: NaiveDate,
) -> Result<TaskView, Halt> {
    if opts.section.is_some() && opts.project.is_none() {
        return Err(Soft::ProjectRequired {
            context: "--section",
        }
        .into());
    }

    let project_id = optional_project(cache, opts.project.as_deref())?;
    let population = cache.tasks(project_id.as_deref())?;
    let mut tasks: Vec<&Task> = population.iter().collect();

    if !opts.include_subtasks {
        tasks = drop_subtasks(tasks);
    }

    let mut columns = ColumnPlan {
        parent: opts.include_subtasks,
        section: false,
    };
    let section_names = match (opts.section.as_deref(), project_id.as_deref()) {
        (Some(partial), Some(pid)) => {
            let project_query = opts.project.as_deref().unwrap_or_default();
            let sid = require_section(cache, pid, project_query, partial)?;
            tasks = keep_section(tasks, &sid);
            columns.section = true;
            section_lookup(cache, [pid])?
        }
        _ if needs_section_column(&tasks) => {
            columns.section = true;
            let mut pids: Vec<&str> = tasks
                .iter()
                .filter(|t| t.section_id.is_some())
                .map(|t| t.project_id.as_str())
                .collect();
            pids.sort_unstable();
            pids.dedup();
            section_lookup(cache, pids)?
        }
        _ => HashMap::new(),
    };

    tasks = temporal_union(tasks, opts.temporal, today);
    if opts.temporal.recurring {
        tasks = keep_recurring(tasks);
    }

    let project_names: HashMap<String, String> = cache
        .projects()?
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect();
    // Parents outside the filtered set render as not available.
    let by_id: HashMap<&str, &Task> = if columns.parent {
        tasks.iter().map(|&t| (t.id.as_str(), t)).collect()
    } else {
        HashMap::new()
    };

    sort_tasks(&mut tasks, &project_names, &section_names);

    let rows = tasks
        .into_iter()
        .map(|t| to_row(t, columns, &project_names, &section_names, &by_id))
        .collect();
    Ok(TaskView { rows, columns })
}
