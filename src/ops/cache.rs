//! Per-invocation read-through cache in front of a [`Remote`].
//!
//! Each slot is filled by exactly one remote call the first time it is read
//! and is only cleared by an explicit `invalidate_*`. A failed fetch leaves
//! the slot empty, so the next read fetches again.
//!
//! All reads take `&mut self`, so two fills of the same slot can never be in
//! flight at once. Slots hand out `Arc<[T]>`: repeated reads return the same
//! allocation, and callers may keep a listing alive across later reads.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::io::remote::{Remote, RemoteError};
use crate::model::{Label, Project, Section, Task};

/// Key of a task slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskScope {
    All,
    Project(String),
}

impl TaskScope {
    pub fn from_project(project_id: Option<&str>) -> Self {
        match project_id {
            Some(pid) => TaskScope::Project(pid.to_string()),
            None => TaskScope::All,
        }
    }

    fn project_id(&self) -> Option<&str> {
        match self {
            TaskScope::All => None,
            TaskScope::Project(pid) => Some(pid),
        }
    }
}

impl fmt::Display for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskScope::All => f.write_str("all"),
            TaskScope::Project(pid) => write!(f, "project {}", pid),
        }
    }
}

pub struct EntityCache<'r> {
    remote: &'r dyn Remote,
    projects: Option<Arc<[Project]>>,
    labels: Option<Arc<[Label]>>,
    sections: HashMap<String, Arc<[Section]>>,
    tasks: HashMap<TaskScope, Arc<[Task]>>,
}

impl<'r> EntityCache<'r> {
    pub fn new(remote: &'r dyn Remote) -> Self {
        EntityCache {
            remote,
            projects: None,
            labels: None,
            sections: HashMap::new(),
            tasks: HashMap::new(),
        }
    }

    /// The underlying service, for mutations.
    pub fn remote(&self) -> &'r dyn Remote {
        self.remote
    }

    pub fn projects(&mut self) -> Result<Arc<[Project]>, RemoteError> {
        if let Some(cached) = &self.projects {
            return Ok(Arc::clone(cached));
        }
        log::debug!("cache miss: projects");
        let fetched: Arc<[Project]> = self.remote.list_projects()?.into();
        self.projects = Some(Arc::clone(&fetched));
        Ok(fetched)
    }

    pub fn sections(&mut self, project_id: &str) -> Result<Arc<[Section]>, RemoteError> {
        if let Some(cached) = self.sections.get(project_id) {
            return Ok(Arc::clone(cached));
        }
        log::debug!("cache miss: sections of project {}", project_id);
        let fetched: Arc<[Section]> = self.remote.list_sections(project_id)?.into();
        self.sections
            .insert(project_id.to_string(), Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Tasks of one project, or of every project when `project_id` is `None`.
    pub fn tasks(&mut self, project_id: Option<&str>) -> Result<Arc<[Task]>, RemoteError> {
        let scope = TaskScope::from_project(project_id);
        if let Some(cached) = self.tasks.get(&scope) {
            return Ok(Arc::clone(cached));
        }
        log::debug!("cache miss: tasks ({})", scope);
        let fetched: Arc<[Task]> = self.remote.list_tasks(scope.project_id())?.into();
        self.tasks.insert(scope, Arc::clone(&fetched));
        Ok(fetched)
    }

    pub fn labels(&mut self) -> Result<Arc<[Label]>, RemoteError> {
        if let Some(cached) = &self.labels {
            return Ok(Arc::clone(cached));
        }
        log::debug!("cache miss: labels");
        let fetched: Arc<[Label]> = self.remote.list_labels()?.into();
        self.labels = Some(Arc::clone(&fetched));
        Ok(fetched)
    }

    pub fn invalidate_projects(&mut self) {
        log::debug!("invalidate: projects");
        self.projects = None;
    }

    pub fn invalidate_sections(&mut self, project_id: &str) {
        log::debug!("invalidate: sections of project {}", project_id);
        self.sections.remove(project_id);
    }

    /// Clears the project's slot (if given) and always the "all" slot.
    pub fn invalidate_tasks(&mut self, project_id: Option<&str>) {
        if let Some(pid) = project_id {
            log::debug!("invalidate: tasks (project {})", pid);
            self.tasks.remove(&TaskScope::Project(pid.to_string()));
        }
        log::debug!("invalidate: tasks (all)");
        self.tasks.remove(&TaskScope::All);
    }

    pub fn invalidate_labels(&mut self) {
        log::debug!("invalidate: labels");
        self.labels = None;
    }

    /// Whether a task slot currently holds data.
    pub fn has_tasks(&self, scope: &TaskScope) -> bool {
        self.tasks.contains_key(scope)
    }

    pub fn has_sections(&self, project_id: &str) -> bool {
        self.sections.contains_key(project_id)
    }

    pub fn has_projects(&self) -> bool {
        self.projects.is_some()
    }

    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }
}

impl fmt::Debug for EntityCache<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("projects", &self.projects.as_ref().map(|p| p.len()))
            .field("labels", &self.labels.as_ref().map(|l| l.len()))
            .field("sections", &self.sections.keys().collect::<Vec<_>>())
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}
