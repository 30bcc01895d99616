use crate::io::remote::RemoteError;
use crate::model::{NewTask, Task, TaskUpdate};
use crate::ops::cache::EntityCache;
use crate::ops::outcome::{EntityKind, Halt, Outcome, Soft, finish};
use crate::ops::resolve::{find_exact, optional_project, require_section};
use crate::util::unicode::{fold_name, strip_emojis};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Parameters for creating a task
#[derive(Debug, Clone, Default)]
pub struct CreateTask {
    pub content: String,
    /// Project partial name or id; `None` lets the service pick (the inbox)
    pub project: Option<String>,
    /// Section partial name inside `project`; requires `project`
    pub section: Option<String>,
    /// 1 (normal) to 4 (urgent); `None` keeps the service default
    pub priority: Option<u8>,
    /// Natural-language due date, e.g. "next friday"
    pub due: Option<String>,
    /// Natural-language reminder. Attached after the task exists; a failure
    /// here does not undo the task.
    pub reminder: Option<String>,
    /// Create even if a task with the same content is already in scope
    pub force: bool,
}

/// Parameters for updating a task found by its content
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// Current content, matched exactly (ignoring case and outer whitespace)
    pub content: String,
    /// Narrow the search to this project
    pub project: Option<String>,
    pub new_content: Option<String>,
    pub priority: Option<u8>,
    pub due: Option<String>,
}

/// Locates a single task for done/delete
#[derive(Debug, Clone, Default)]
pub struct TaskTarget {
    /// Content, matched exactly (ignoring case and outer whitespace)
    pub content: String,
    /// Narrow the search to this project
    pub project: Option<String>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to the reminder requested alongside a new task
#[derive(Debug)]
pub enum ReminderStatus {
    NotRequested,
    Added,
    Failed(RemoteError),
}

#[derive(Debug)]
pub struct TaskCreated {
    pub task: Task,
    pub reminder: ReminderStatus,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Content comparison key for duplicate detection: emoji, case and outer
/// whitespace are ignored.
fn duplicate_key(content: &str) -> String {
    fold_name(&strip_emojis(content))
}

pub fn find_duplicate<'a>(tasks: &'a [Task], content: &str) -> Option<&'a Task> {
    let key = duplicate_key(content);
    tasks.iter().find(|t| duplicate_key(&t.content) == key)
}

/// Drop the task slots a write to `task` could have changed: the slot the
/// lookup went through and the task's own project.
fn invalidate_for(cache: &mut EntityCache<'_>, scope: Option<&str>, task: &Task) {
    cache.invalidate_tasks(Some(&task.project_id));
    if let Some(pid) = scope
        && pid != task.project_id
    {
        cache.invalidate_tasks(Some(pid));
    }
}

fn locate(
    cache: &mut EntityCache<'_>,
    content: &str,
    project: Option<&str>,
) -> Result<(Option<String>, Task), Halt> {
    let pid = optional_project(cache, project)?;
    let tasks = cache.tasks(pid.as_deref())?;
    let target = find_exact(&tasks[..], content)
        .cloned()
        .ok_or_else(|| Soft::NotFound {
            kind: EntityKind::Task,
            query: content.to_string(),
        })?;
    Ok((pid, target))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn create_task(
    cache: &mut EntityCache<'_>,
    req: &CreateTask,
) -> Result<Outcome<TaskCreated>, RemoteError> {
    finish(create_inner(cache, req))
}

fn create_inner(cache: &mut EntityCache<'_>, req: &CreateTask) -> Result<TaskCreated, Halt> {
    if req.section.is_some() && req.project.is_none() {
        return Err(Soft::ProjectRequired {
            context: "--section",
        }
        .into());
    }
    let pid = optional_project(cache, req.project.as_deref())?;
    let sid = match (req.section.as_deref(), pid.as_deref()) {
        (Some(section), Some(p)) => {
            let project_query = req.project.as_deref().unwrap_or_default();
            Some(require_section(cache, p, project_query, section)?)
        }
        _ => None,
    };

    if !req.force {
        let existing = cache.tasks(pid.as_deref())?;
        if let Some(dup) = find_duplicate(&existing[..], &req.content) {
            return Err(Soft::Duplicate {
                kind: EntityKind::Task,
                name: dup.content.clone(),
                id: dup.id.clone(),
            }
            .into());
        }
    }

    let new = NewTask {
        content: req.content.clone(),
        priority: req.priority,
        due_string: req.due.clone(),
        project_id: pid.clone(),
        section_id: sid,
    };
    let remote = cache.remote();
    let task = remote.add_task(&new)?;
    log::info!("created task {} in project {}", task.id, task.project_id);
    invalidate_for(cache, pid.as_deref(), &task);

    let reminder = match req.reminder.as_deref() {
        None => ReminderStatus::NotRequested,
        Some(when) => match remote.add_reminder(&task.id, when) {
            Ok(()) => ReminderStatus::Added,
            Err(e) => {
                log::warn!("reminder for task {} failed: {}", task.id, e);
                ReminderStatus::Failed(e)
            }
        },
    };

    Ok(TaskCreated { task, reminder })
}

pub fn update_task(
    cache: &mut EntityCache<'_>,
    req: &UpdateTask,
) -> Result<Outcome<Task>, RemoteError> {
    finish(update_inner(cache, req))
}

fn update_inner(cache: &mut EntityCache<'_>, req: &UpdateTask) -> Result<Task, Halt> {
    let (pid, target) = locate(cache, &req.content, req.project.as_deref())?;
    let update = TaskUpdate {
        content: req.new_content.clone(),
        priority: req.priority,
        due_string: req.due.clone(),
    };
    let updated = cache.remote().update_task(&target.id, &update)?;
    log::info!("updated task {}", updated.id);
    invalidate_for(cache, pid.as_deref(), &target);
    Ok(updated)
}

/// Mark a task done. Returns the task as it was before closing.
pub fn close_task(
    cache: &mut EntityCache<'_>,
    target: &TaskTarget,
) -> Result<Outcome<Task>, RemoteError> {
    finish(close_inner(cache, target))
}

fn close_inner(cache: &mut EntityCache<'_>, target: &TaskTarget) -> Result<Task, Halt> {
    let (pid, task) = locate(cache, &target.content, target.project.as_deref())?;
    cache.remote().close_task(&task.id)?;
    log::info!("closed task {}", task.id);
    invalidate_for(cache, pid.as_deref(), &task);
    Ok(task)
}

/// Delete a task. Returns the deleted task.
pub fn delete_task(
    cache: &mut EntityCache<'_>,
    target: &TaskTarget,
) -> Result<Outcome<Task>, RemoteError> {
    finish(delete_inner(cache, target))
}

fn delete_inner(cache: &mut EntityCache<'_>, target: &TaskTarget) -> Result<Task, Halt> {
    let (pid, task) = locate(cache, &target.content, target.project.as_deref())?;
    cache.remote().delete_task(&task.id)?;
    log::info!("deleted task {}", task.id);
    invalidate_for(cache, pid.as_deref(), &task);
    Ok(task)
}
