use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::io::remote::{Remote, RemoteError};
use crate::model::{Label, NewTask, Project, Section, Task, TaskUpdate};

/// HTTPS/JSON client for the Todoist REST API.
///
/// Reads go to `api_url`; reminders have no REST endpoint and are sent as a
/// single command to the sync API at `sync_url`.
#[derive(Debug)]
pub struct RestClient {
    http: Client,
    api_url: String,
    sync_url: String,
    token: String,
}

impl RestClient {
    pub fn new(
        token: &str,
        api_url: &str,
        sync_url: &str,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tdc/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(RestClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            sync_url: sync_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.bearer_auth(&self.token)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, RemoteError> {
        log::debug!("GET /{} {:?}", path, query);
        let resp = self.authed(self.http.get(self.url(path))).query(query).send()?;
        decode(check_status(resp)?)
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, RemoteError> {
        log::debug!("POST /{}", path);
        let resp = self.authed(self.http.post(self.url(path))).json(body).send()?;
        decode(check_status(resp)?)
    }

    fn post_empty(&self, path: &str) -> Result<(), RemoteError> {
        log::debug!("POST /{}", path);
        let resp = self.authed(self.http.post(self.url(path))).send()?;
        check_status(resp).map(|_| ())
    }

    fn delete(&self, path: &str) -> Result<(), RemoteError> {
        log::debug!("DELETE /{}", path);
        let resp = self.authed(self.http.delete(self.url(path))).send()?;
        check_status(resp).map(|_| ())
    }
}

fn check_status(resp: Response) -> Result<Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body: body.trim().to_string(),
    })
}

fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, RemoteError> {
    let text = resp.text()?;
    serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Inspect a sync API reply for the status of the command tagged `uuid`.
fn sync_command_status(reply: &Value, uuid: &str) -> Result<(), RemoteError> {
    match reply.get("sync_status").and_then(|s| s.get(uuid)) {
        Some(Value::String(s)) if s == "ok" => Ok(()),
        Some(other) => Err(RemoteError::Rejected(other.to_string())),
        None => Err(RemoteError::Decode(format!(
            "no sync status for command {}",
            uuid
        ))),
    }
}

impl Remote for RestClient {
    fn list_projects(&self) -> Result<Vec<Project>, RemoteError> {
        self.get("projects", &[])
    }

    fn list_sections(&self, project_id: &str) -> Result<Vec<Section>, RemoteError> {
        self.get("sections", &[("project_id", project_id)])
    }

    fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>, RemoteError> {
        match project_id {
            Some(pid) => self.get("tasks", &[("project_id", pid)]),
            None => self.get("tasks", &[]),
        }
    }

    fn list_labels(&self) -> Result<Vec<Label>, RemoteError> {
        self.get("labels", &[])
    }

    fn add_task(&self, task: &NewTask) -> Result<Task, RemoteError> {
        let body = serde_json::to_value(task).map_err(|e| RemoteError::Decode(e.to_string()))?;
        self.post("tasks", &body)
    }

    fn update_task(&self, task_id: &str, update: &TaskUpdate) -> Result<Task, RemoteError> {
        let body =
            serde_json::to_value(update).map_err(|e| RemoteError::Decode(e.to_string()))?;
        self.post(&format!("tasks/{}", task_id), &body)
    }

    fn close_task(&self, task_id: &str) -> Result<(), RemoteError> {
        self.post_empty(&format!("tasks/{}/close", task_id))
    }

    fn delete_task(&self, task_id: &str) -> Result<(), RemoteError> {
        self.delete(&format!("tasks/{}", task_id))
    }

    fn add_project(&self, name: &str) -> Result<Project, RemoteError> {
        self.post("projects", &json!({ "name": name }))
    }

    fn update_project(&self, project_id: &str, name: &str) -> Result<Project, RemoteError> {
        self.post(&format!("projects/{}", project_id), &json!({ "name": name }))
    }

    fn delete_project(&self, project_id: &str) -> Result<(), RemoteError> {
        self.delete(&format!("projects/{}", project_id))
    }

    fn add_section(&self, name: &str, project_id: &str) -> Result<Section, RemoteError> {
        self.post(
            "sections",
            &json!({ "name": name, "project_id": project_id }),
        )
    }

    fn update_section(&self, section_id: &str, name: &str) -> Result<Section, RemoteError> {
        self.post(&format!("sections/{}", section_id), &json!({ "name": name }))
    }

    fn delete_section(&self, section_id: &str) -> Result<(), RemoteError> {
        self.delete(&format!("sections/{}", section_id))
    }

    fn add_label(&self, name: &str) -> Result<Label, RemoteError> {
        self.post("labels", &json!({ "name": name }))
    }

    fn update_label(&self, label_id: &str, name: &str) -> Result<Label, RemoteError> {
        self.post(&format!("labels/{}", label_id), &json!({ "name": name }))
    }

    fn delete_label(&self, label_id: &str) -> Result<(), RemoteError> {
        self.delete(&format!("labels/{}", label_id))
    }

    fn add_reminder(&self, task_id: &str, due_string: &str) -> Result<(), RemoteError> {
        let uuid = uuid::Uuid::new_v4().to_string();
        let temp_id = uuid::Uuid::new_v4().to_string();
        let commands = json!([{
            "type": "reminder_add",
            "uuid": uuid,
            "temp_id": temp_id,
            "args": {
                "item_id": task_id,
                "due": { "string": due_string },
            },
        }]);
        log::debug!("POST /sync reminder_add for task {}", task_id);
        let resp = self
            .authed(self.http.post(format!("{}/sync", self.sync_url)))
            .json(&json!({ "commands": commands }))
            .send()?;
        let reply: Value = decode(check_status(resp)?)?;
        sync_command_status(&reply, &uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = RestClient::new(
            "t",
            "http://localhost:1/rest/v2/",
            "http://localhost:1/sync/v9/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.url("tasks"), "http://localhost:1/rest/v2/tasks");
        assert_eq!(client.sync_url, "http://localhost:1/sync/v9");
    }

    #[test]
    fn test_sync_status_ok() {
        let reply = json!({ "sync_status": { "abc": "ok" } });
        assert!(sync_command_status(&reply, "abc").is_ok());
    }

    #[test]
    fn test_sync_status_rejected() {
        let reply = json!({ "sync_status": { "abc": { "error": "Premium only" } } });
        let err = sync_command_status(&reply, "abc").unwrap_err();
        assert!(matches!(err, RemoteError::Rejected(_)));
        assert!(err.to_string().contains("Premium only"));
    }

    #[test]
    fn test_sync_status_missing() {
        let reply = json!({ "sync_status": {} });
        assert!(matches!(
            sync_command_status(&reply, "abc"),
            Err(RemoteError::Decode(_))
        ));
    }
}
