use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::api::{self, ProjectsApi};
use crate::models::{Project, ProjectId, ProjectInput};
use crate::ui::{
    project_form::{self, ProjectFormAction, ProjectFormState},
    projects::{self, ProjectAction, ProjectsState},
};

/// A write against the collection
#[derive(Debug, Clone)]
pub enum Mutation {
    Create(ProjectInput),
    Update(ProjectId, ProjectInput),
    Delete(ProjectId),
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Create(input) => write!(f, "create `{}`", input.project_name),
            Mutation::Update(id, _) => write!(f, "update {id}"),
            Mutation::Delete(id) => write!(f, "delete {id}"),
        }
    }
}

/// Completion of a request spawned by [`App`]
#[derive(Debug)]
pub enum ApiEvent {
    Loaded {
        generation: u64,
        result: api::Result<Vec<Project>>,
    },
    Mutated {
        mutation: Mutation,
        result: api::Result<()>,
    },
}

/// Root state of the admin screen.
///
/// Owns the fetched list and the modal form. Requests run as spawned tasks
/// and report back through a channel so the screen stays responsive; only
/// the most recently issued load may replace the list.
pub struct App {
    api: Arc<dyn ProjectsApi>,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
    load_generation: u64,
    projects: ProjectsState,
    form: Option<ProjectFormState>,
    should_quit: bool,
}

impl App {
    pub fn new(api: Arc<dyn ProjectsApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            api,
            events_tx,
            events_rx,
            load_generation: 0,
            projects: ProjectsState::new(Vec::new()),
            form: None,
            should_quit: false,
        }
    }

    #[cfg(test)]
    pub fn projects(&self) -> &ProjectsState {
        &self.projects
    }

    pub fn projects_mut(&mut self) -> &mut ProjectsState {
        &mut self.projects
    }

    pub fn form(&self) -> Option<&ProjectFormState> {
        self.form.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Fetch the whole collection. Supersedes any load still in flight.
    pub fn load(&mut self) {
        self.load_generation += 1;
        let generation = self.load_generation;
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();

        debug!(generation, "loading projects");
        tokio::spawn(async move {
            let result = api.list().await;
            let _ = tx.send(ApiEvent::Loaded { generation, result });
        });
    }

    pub fn open_add(&mut self) {
        self.form = Some(ProjectFormState::new());
    }

    pub fn open_edit(&mut self, project: &Project) {
        self.form = Some(ProjectFormState::from_existing(project));
    }

    pub fn remove(&mut self, id: ProjectId) {
        self.mutate(Mutation::Delete(id));
    }

    fn mutate(&mut self, mutation: Mutation) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();

        info!(%mutation, "sending");
        tokio::spawn(async move {
            let result = match &mutation {
                Mutation::Create(input) => api.create(input).await,
                Mutation::Update(id, input) => api.update(id, input).await,
                Mutation::Delete(id) => api.delete(id).await,
            };
            let _ = tx.send(ApiEvent::Mutated { mutation, result });
        });
    }

    /// Route a key press to the modal if one is open, else to the list
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(form) = &mut self.form {
            match project_form::handle_key(form, key) {
                Some(ProjectFormAction::Cancel) => self.form = None,
                Some(ProjectFormAction::Create(input)) => {
                    self.form = None;
                    self.mutate(Mutation::Create(input));
                }
                Some(ProjectFormAction::Update(id, input)) => {
                    self.form = None;
                    self.mutate(Mutation::Update(id, input));
                }
                None => {}
            }
            return;
        }

        match projects::handle_key(&mut self.projects, key) {
            Some(ProjectAction::Quit) => self.should_quit = true,
            Some(ProjectAction::NewProject) => self.open_add(),
            Some(ProjectAction::EditProject(project)) => self.open_edit(&project),
            Some(ProjectAction::DeleteProject(id)) => self.remove(id),
            None => {}
        }
    }

    /// Fold a finished request into the screen state
    pub fn apply(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Loaded { generation, .. } if generation != self.load_generation => {
                debug!(
                    generation,
                    latest = self.load_generation,
                    "discarding stale project list"
                );
            }
            ApiEvent::Loaded {
                result: Ok(projects),
                ..
            } => {
                info!(count = projects.len(), "projects loaded");
                self.projects.replace(projects);
            }
            ApiEvent::Loaded { result: Err(e), .. } => {
                error!(error = %e, "failed to load projects");
                self.projects.replace(Vec::new());
            }
            ApiEvent::Mutated { mutation, result } => {
                match result {
                    Ok(()) => info!(%mutation, "done"),
                    Err(e) => error!(%mutation, error = %e, "request failed"),
                }
                self.load();
            }
        }
    }

    /// Apply every event that has already arrived, without waiting
    pub fn drain_api_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
    }

    /// Wait for the next request to finish
    pub async fn next_api_event(&mut self) -> Option<ApiEvent> {
        self.events_rx.recv().await
    }
}
