use crate::model::{Label, NewTask, Project, Section, Task, TaskUpdate};

/// Error type for calls to the remote service.
///
/// The core never inspects these beyond "the call failed"; they are carried
/// to the command boundary and shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("service rejected command: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}

/// Blocking access to the task service.
///
/// Implementations own authentication, timeouts and connection reuse.
/// Every method performs exactly one logical call.
pub trait Remote {
    fn list_projects(&self) -> Result<Vec<Project>, RemoteError>;
    fn list_sections(&self, project_id: &str) -> Result<Vec<Section>, RemoteError>;
    /// All active tasks, or only those of `project_id`
    fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>, RemoteError>;
    fn list_labels(&self) -> Result<Vec<Label>, RemoteError>;

    fn add_task(&self, task: &NewTask) -> Result<Task, RemoteError>;
    fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, RemoteError>;
    fn close_task(&self, task_id: &str) -> Result<(), RemoteError>;
    fn delete_task(&self, task_id: &str) -> Result<(), RemoteError>;

    fn add_project(&self, name: &str) -> Result<Project, RemoteError>;
    fn update_project(&self, project_id: &str, name: &str) -> Result<Project, RemoteError>;
    fn delete_project(&self, project_id: &str) -> Result<(), RemoteError>;

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, RemoteError>;
    fn update_section(&self, section_id: &str, name: &str) -> Result<Section, RemoteError>;
    fn delete_section(&self, section_id: &str) -> Result<(), RemoteError>;

    fn add_label(&self, name: &str) -> Result<Label, RemoteError>;
    fn update_label(&self, label_id: &str, name: &str) -> Result<Label, RemoteError>;
    fn delete_label(&self, label_id: &str) -> Result<(), RemoteError>;

    /// Attach a reminder described in natural language ("tomorrow 9am").
    fn add_reminder(&self, task_id: &str, due_string: &str) -> Result<(), RemoteError>;
}
