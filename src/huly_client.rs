use crate::config::HulyConfig;
use crate::errors::{AppError, ResultExt};
use crate::models::{custom_field, ProjectProgress, TaskType};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Map, Value};

/// Marker written into every record this client creates or changes.
const CLIENT_TAG: &str = "tiny_sumo_huly_client";
const BRAND: &str = "tiny_sumo";

/// Client for the Huly project-management API.
///
/// Unlike the Twenty client there is no fallback data: failures are
/// returned to the caller.
#[derive(Clone)]
pub struct HulyClient {
    client: reqwest::Client,
    config: HulyConfig,
}

impl HulyClient {
    pub fn new(config: HulyConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create Huly client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HulyConfig {
        &self.config
    }

    // ============ Projects ============

    /// Creates a project, stamped with the agency's client tag, brand colors
    /// and `custom_fields` markers. Caller `custom_fields` are kept.
    pub async fn create_project(&self, project: Map<String, Value>) -> Result<Value, AppError> {
        tracing::info!("Creating Huly project");
        self.send(Method::POST, "projects", Some(brand_project(project)))
            .await
            .context("POST /projects")
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Value, AppError> {
        self.send(Method::GET, &format!("projects/{}", project_id), None)
            .await
            .with_context(|| format!("GET /projects/{}", project_id))
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        updates: Map<String, Value>,
    ) -> Result<Value, AppError> {
        let body = stamp_update(updates, Utc::now());
        self.send(Method::PATCH, &format!("projects/{}", project_id), Some(body))
            .await
            .with_context(|| format!("PATCH /projects/{}", project_id))
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<Value, AppError> {
        tracing::info!("Deleting Huly project {}", project_id);
        self.send(Method::DELETE, &format!("projects/{}", project_id), None)
            .await
            .with_context(|| format!("DELETE /projects/{}", project_id))
    }

    // ============ Tasks ============

    pub async fn create_task(&self, task: Map<String, Value>) -> Result<Value, AppError> {
        self.send(Method::POST, "tasks", Some(brand_task(task, Utc::now())))
            .await
            .context("POST /tasks")
    }

    /// All tasks of a project. A body that is not a JSON array is an
    /// `InvalidResponse`.
    pub async fn get_project_tasks(&self, project_id: &str) -> Result<Vec<Value>, AppError> {
        let body = self
            .send(Method::GET, &format!("projects/{}/tasks", project_id), None)
            .await
            .with_context(|| format!("GET /projects/{}/tasks", project_id))?;

        match body {
            Value::Array(tasks) => Ok(tasks),
            other => Err(AppError::InvalidResponse(format!(
                "Expected a task list from Huly, got {}",
                other
            ))),
        }
    }

    /// Tasks of a project whose `custom_fields.task_type` equals `task_type`.
    pub async fn get_tasks_by_type(
        &self,
        project_id: &str,
        task_type: TaskType,
    ) -> Result<Vec<Value>, AppError> {
        let tasks = self.get_project_tasks(project_id).await?;
        Ok(tasks
            .into_iter()
            .filter(|t| custom_field(t, "task_type") == Some(task_type.as_str()))
            .collect())
    }

    pub async fn update_task(
        &self,
        task_id: &str,
        updates: Map<String, Value>,
    ) -> Result<Value, AppError> {
        let body = stamp_update(updates, Utc::now());
        self.send(Method::PATCH, &format!("tasks/{}", task_id), Some(body))
            .await
            .with_context(|| format!("PATCH /tasks/{}", task_id))
    }

    /// Marks a task completed, recording when and by whom.
    pub async fn complete_task(&self, task_id: &str) -> Result<Value, AppError> {
        let mut updates = Map::new();
        updates.insert("status".to_string(), json!("completed"));
        updates.insert("completed_at".to_string(), json!(Utc::now().to_rfc3339()));
        updates.insert("completed_by".to_string(), json!(CLIENT_TAG));
        self.update_task(task_id, updates).await
    }

    // ============ Reporting ============

    /// Fetches a project and its tasks and summarizes their progress.
    pub async fn get_project_progress_summary(
        &self,
        project_id: &str,
    ) -> Result<ProjectProgress, AppError> {
        let project = self.get_project(project_id).await?;
        let tasks = self.get_project_tasks(project_id).await?;

        let progress = ProjectProgress::from_tasks(project_id, &project, &tasks, Utc::now());
        tracing::info!(
            "Huly project {}: {}/{} tasks completed",
            project_id,
            progress.completed_tasks,
            progress.total_tasks
        );
        Ok(progress)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, AppError> {
        let url = self.config.endpoint(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .header("X-Tiny-Sumo-Brand", "tiny-sumo-marketing")
            .header("X-Client-Version", "1.0.0")
            .header("X-Tiny-Sumo-Client", "tiny-sumo-marketing")
            .header("X-Request-Source", "tiny-sumo-huly-integration");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Huly request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Huly API {} {} failed with {}", method, path, status);
            return Err(AppError::ExternalApiError(format!(
                "Huly returned {}: {}",
                status, error_text
            )));
        }

        // DELETE may answer 204 with no body
        let bytes = response.bytes().await?;
        let data = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::InvalidResponse(format!("Failed to parse Huly response: {}", e))
            })?
        };

        tracing::info!("Huly API: {} {} - Success", method, path);
        Ok(data)
    }
}

/// Adds the agency markers to a new project.
fn brand_project(mut project: Map<String, Value>) -> Value {
    let mut custom_fields = match project.remove("custom_fields") {
        Some(Value::Object(fields)) => fields,
        _ => Map::new(),
    };
    custom_fields.insert("brand".to_string(), json!(BRAND));
    custom_fields.insert("created_by".to_string(), json!(CLIENT_TAG));
    custom_fields.insert("api_version".to_string(), json!("1.0"));

    project.insert("client".to_string(), json!("tiny_sumo_marketing"));
    project.insert(
        "brand_colors".to_string(),
        json!({"primary": "#8b0000", "secondary": "#2d1b1b", "accent": "#a52a2a"}),
    );
    project.insert("custom_fields".to_string(), Value::Object(custom_fields));
    Value::Object(project)
}

fn brand_task(mut task: Map<String, Value>, now: DateTime<Utc>) -> Value {
    task.insert("created_by".to_string(), json!(CLIENT_TAG));
    task.insert("brand".to_string(), json!(BRAND));
    task.insert("timestamp".to_string(), json!(now.to_rfc3339()));
    Value::Object(task)
}

fn stamp_update(mut updates: Map<String, Value>, now: DateTime<Utc>) -> Value {
    updates.insert("updated_by".to_string(), json!(CLIENT_TAG));
    updates.insert("update_timestamp".to_string(), json!(now.to_rfc3339()));
    Value::Object(updates)
}
