//! In-memory [`Remote`] for unit tests: behaves like the service for the
//! calls it supports and counts every call by method name.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::io::remote::{Remote, RemoteError};
use crate::model::{Due, Label, NewTask, Project, Section, Task, TaskUpdate};

/// Fixed "current date" used by every query test
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

pub const TODAY: &str = "2024-05-10";
pub const YESTERDAY: &str = "2024-05-09";
pub const TOMORROW: &str = "2024-05-11";

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    sections: Vec<Section>,
    tasks: Vec<Task>,
    labels: Vec<Label>,
    reminders: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeRemote {
    state: RefCell<State>,
    calls: RefCell<HashMap<&'static str, usize>>,
    failing: RefCell<HashSet<&'static str>>,
    next_id: Cell<u64>,
}

impl FakeRemote {
    pub fn new() -> Self {
        FakeRemote {
            next_id: Cell::new(9000),
            ..Default::default()
        }
    }

    /// Number of calls made to the named method so far.
    pub fn calls(&self, method: &str) -> usize {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    /// Total number of mutating calls so far.
    pub fn mutations(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(name, _)| !name.starts_with("list_"))
            .map(|(_, n)| n)
            .sum()
    }

    /// Make the next call to `method` fail with a transport error.
    pub fn fail_next(&self, method: &'static str) {
        self.failing.borrow_mut().insert(method);
    }

    pub fn add_project_row(&self, id: &str, name: &str) {
        self.state.borrow_mut().projects.push(Project::new(id, name));
    }

    pub fn add_section_row(&self, id: &str, name: &str, project_id: &str) {
        self.state
            .borrow_mut()
            .sections
            .push(Section::new(id, name, project_id));
    }

    pub fn add_task_row(&self, task: Task) {
        self.state.borrow_mut().tasks.push(task);
    }

    pub fn add_label_row(&self, id: &str, name: &str) {
        self.state.borrow_mut().labels.push(Label::new(id, name));
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.borrow().tasks.clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.state.borrow().projects.clone()
    }

    pub fn sections(&self) -> Vec<Section> {
        self.state.borrow().sections.clone()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.state.borrow().labels.clone()
    }

    pub fn reminders(&self) -> Vec<(String, String)> {
        self.state.borrow().reminders.clone()
    }

    fn hit(&self, method: &'static str) -> Result<(), RemoteError> {
        *self.calls.borrow_mut().entry(method).or_insert(0) += 1;
        if self.failing.borrow_mut().remove(method) {
            return Err(RemoteError::Transport(format!("{} failed", method)));
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }
}

fn missing(what: &str, id: &str) -> RemoteError {
    RemoteError::Status {
        status: 404,
        body: format!("{} {} not found", what, id),
    }
}

/// Build a task row with the common optional fields.
pub fn task(id: &str, content: &str, project_id: &str) -> Task {
    Task::new(id, content, project_id)
}

pub fn with_section(mut t: Task, section_id: &str) -> Task {
    t.section_id = Some(section_id.to_string());
    t
}

pub fn with_parent(mut t: Task, parent_id: &str) -> Task {
    t.parent_id = Some(parent_id.to_string());
    t
}

pub fn with_due(mut t: Task, date: &str, recurring: bool) -> Task {
    t.due = Some(Due {
        date: date.to_string(),
        is_recurring: recurring,
        string: if recurring {
            format!("every day from {}", date)
        } else {
            date.to_string()
        },
    });
    t
}

/// Two projects with sections, subtasks and assorted due dates.
///
/// - Work (1): sections Doing (11), Backlog (12)
///   - 100 "Write report" in Doing, due today, p4
///   - 101 "review PR" in Backlog, due tomorrow
///   - 102 "Fix typo", subtask of 100
/// - home (2): section Garden (21)
///   - 200 "Mow lawn" in Garden, due yesterday
///   - 201 "Call mom", due today, recurring
///   - 202 "buy milk", no due date
pub fn sample_remote() -> FakeRemote {
    let remote = FakeRemote::new();
    remote.add_project_row("1", "Work");
    remote.add_project_row("2", "home");
    remote.add_section_row("11", "Doing", "1");
    remote.add_section_row("12", "Backlog", "1");
    remote.add_section_row("21", "Garden", "2");

    let mut report = with_due(with_section(task("100", "Write report", "1"), "11"), TODAY, false);
    report.priority = 4;
    remote.add_task_row(report);
    remote.add_task_row(with_due(
        with_section(task("101", "review PR", "1"), "12"),
        TOMORROW,
        false,
    ));
    remote.add_task_row(with_parent(task("102", "Fix typo", "1"), "100"));
    remote.add_task_row(with_due(
        with_section(task("200", "Mow lawn", "2"), "21"),
        YESTERDAY,
        false,
    ));
    remote.add_task_row(with_due(task("201", "Call mom", "2"), TODAY, true));
    remote.add_task_row(task("202", "buy milk", "2"));
    remote
}

impl Remote for FakeRemote {
    fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        self.hit("list_projects")?;
        Ok(self.state.borrow().projects.clone())
    }

    fn list_sections(&self, project_id: &str) -> Result<Vec<Section>, RemoteError> {
        self.hit("list_sections")?;
        Ok(self
            .state
            .borrow()
            .sections
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect())
    }

    fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>, RemoteError> {
        self.hit("list_tasks")?;
        Ok(self
            .state
            .borrow()
            .tasks
            .iter()
            .filter(|t| project_id.is_none_or(|pid| t.project_id == pid))
            .cloned()
            .collect())
    }

    fn list_labels(&self) -> Result<Vec<Label>, RemoteError> {
        self.hit("list_labels")?;
        Ok(self.state.borrow().labels.clone())
    }

    fn add_task(&self, new: &NewTask) -> Result<Task, RemoteError> {
        self.hit("add_task")?;
        let mut t = Task::new(
            self.fresh_id(),
            new.content.clone(),
            new.project_id.clone().unwrap_or_else(|| "inbox".to_string()),
        );
        t.section_id = new.section_id.clone();
        if let Some(p) = new.priority {
            t.priority = p;
        }
        if let Some(ds) = &new.due_string {
            t.due = Some(Due {
                date: TODAY.to_string(),
                is_recurring: false,
                string: ds.clone(),
            });
        }
        self.state.borrow_mut().tasks.push(t.clone());
        Ok(t)
    }

    fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, RemoteError> {
        self.hit("update_task")?;
        let mut state = self.state.borrow_mut();
        let t = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| missing("task", task_id))?;
        if let Some(c) = &update.content {
            t.content = c.clone();
        }
        if let Some(p) = update.priority {
            t.priority = p;
        }
        if let Some(ds) = &update.due_string {
            t.due = Some(Due {
                date: TODAY.to_string(),
                is_recurring: false,
                string: ds.clone(),
            });
        }
        Ok(t.clone())
    }

    fn close_task(&self, task_id: &str) -> Result<(), RemoteError> {
        self.hit("close_task")?;
        let mut state = self.state.borrow_mut();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != task_id);
        if state.tasks.len() == before {
            return Err(missing("task", task_id));
        }
        Ok(())
    }

    fn delete_task(&self, task_id: &str) -> Result<(), RemoteError> {
        self.hit("delete_task")?;
        let mut state = self.state.borrow_mut();
        let before = state.tasks.len();
        state
            .tasks
            .retain(|t| t.id != task_id && t.parent_id.as_deref() != Some(task_id));
        if state.tasks.len() == before {
            return Err(missing("task", task_id));
        }
        Ok(())
    }

    fn add_project(&self, name: &str) -> Result<Project, RemoteError> {
        self.hit("add_project")?;
        let p = Project::new(self.fresh_id(), name);
        self.state.borrow_mut().projects.push(p.clone());
        Ok(p)
    }

    fn update_project(&self, project_id: &str, name: &str) -> Result<Project, RemoteError> {
        self.hit("update_project")?;
        let mut state = self.state.borrow_mut();
        let p = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| missing("project", project_id))?;
        p.name = name.to_string();
        Ok(p.clone())
    }

    fn delete_project(&self, project_id: &str) -> Result<(), RemoteError> {
        self.hit("delete_project")?;
        let mut state = self.state.borrow_mut();
        state.projects.retain(|p| p.id != project_id);
        state.sections.retain(|s| s.project_id != project_id);
        state.tasks.retain(|t| t.project_id != project_id);
        Ok(())
    }

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, RemoteError> {
        self.hit("add_section")?;
        let s = Section::new(self.fresh_id(), name, project_id);
        self.state.borrow_mut().sections.push(s.clone());
        Ok(s)
    }

    fn update_section(&self, section_id: &str, name: &str) -> Result<Section, RemoteError> {
        self.hit("update_section")?;
        let mut state = self.state.borrow_mut();
        let s = state
            .sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| missing("section", section_id))?;
        s.name = name.to_string();
        Ok(s.clone())
    }

    fn delete_section(&self, section_id: &str) -> Result<(), RemoteError> {
        self.hit("delete_section")?;
        let mut state = self.state.borrow_mut();
        state.sections.retain(|s| s.id != section_id);
        state
            .tasks
            .retain(|t| t.section_id.as_deref() != Some(section_id));
        Ok(())
    }

    fn add_label(&self, name: &str) -> Result<Label, RemoteError> {
        self.hit("add_label")?;
        let l = Label::new(self.fresh_id(), name);
        self.state.borrow_mut().labels.push(l.clone());
        Ok(l)
    }

    fn update_label(&self, label_id: &str, name: &str) -> Result<Label, RemoteError> {
        self.hit("update_label")?;
        let mut state = self.state.borrow_mut();
        let l = state
            .labels
            .iter_mut()
            .find(|l| l.id == label_id)
            .ok_or_else(|| missing("label", label_id))?;
        l.name = name.to_string();
        Ok(l.clone())
    }

    fn delete_label(&self, label_id: &str) -> Result<(), RemoteError> {
        self.hit("delete_label")?;
        self.state.borrow_mut().labels.retain(|l| l.id != label_id);
        Ok(())
    }

    fn add_reminder(&self, task_id: &str, due_string: &str) -> Result<(), RemoteError> {
        self.hit("add_reminder")?;
        self.state
            .borrow_mut()
            .reminders
            .push((task_id.to_string(), due_string.to_string()));
        Ok(())
    }
}
