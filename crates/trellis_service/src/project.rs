//! The project actor.
//!
//! One task owns all writes to a project's [`HdlParam`]. Callers send
//! requests through a bounded inbox and wait for the reply, so the effect of
//! an event is visible once `send` returns. Parsing happens on the blocking
//! pool before the write lock is taken; queries take the read lock and never
//! wait for a parse.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use trellis_common::ContentHash;
use trellis_config::{hardware_files, load_config, ProjectConfig, ScopeLayout};
use trellis_param::{FastParser, HdlParam, MemoryParser, ParamError, ParseError, ParsedFile};
use trellis_source::path;

use crate::command::CommandParser;
use crate::error::ServiceError;
use crate::event::{EventOutcome, ProjectEvent};

const INBOX_CAPACITY: usize = 256;

enum Request {
    Initialize {
        files: Vec<String>,
        reply: oneshot::Sender<usize>,
    },
    Event {
        event: ProjectEvent,
        reply: oneshot::Sender<Result<EventOutcome, ServiceError>>,
    },
}

/// Entry point for starting a project actor.
pub struct ProjectService;

impl ProjectService {
    /// Starts the actor on the current tokio runtime and returns a handle.
    ///
    /// The actor stops once every handle has been dropped.
    pub fn spawn(layout: ScopeLayout, parser: Arc<dyn FastParser>) -> ProjectHandle {
        let graph = Arc::new(RwLock::new(HdlParam::new(layout)));
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let actor = ProjectActor {
            graph: Arc::clone(&graph),
            parser,
            hashes: HashMap::new(),
        };
        tokio::spawn(actor.run(rx));
        ProjectHandle { tx, graph }
    }

    /// Loads `trellis.toml` from `project_dir`, starts an actor with the
    /// configured command parser and builds the initial graph.
    pub async fn open(project_dir: &Path) -> Result<ProjectHandle, ServiceError> {
        let (config, layout, files) = scan(project_dir)?;
        let parser = CommandParser::from_config(&config.parser).ok_or(ServiceError::NoParser)?;
        tracing::debug!(project = %config.project.name, files = files.len(), "opening project");
        let handle = Self::spawn(layout, Arc::new(parser));
        handle.initialize(files).await?;
        Ok(handle)
    }
}

/// A cloneable handle to a running project actor.
#[derive(Clone)]
pub struct ProjectHandle {
    tx: mpsc::Sender<Request>,
    graph: Arc<RwLock<HdlParam>>,
}

impl ProjectHandle {
    /// Rebuilds the graph from `files`. Returns the number of files that
    /// could be parsed.
    pub async fn initialize(&self, files: Vec<String>) -> Result<usize, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Initialize { files, reply })
            .await
            .map_err(|_| ServiceError::Stopped)?;
        rx.await.map_err(|_| ServiceError::Stopped)
    }

    /// Applies one event and waits until it has taken effect.
    pub async fn send(&self, event: ProjectEvent) -> Result<EventOutcome, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Request::Event { event, reply })
            .await
            .map_err(|_| ServiceError::Stopped)?;
        rx.await.map_err(|_| ServiceError::Stopped)?
    }

    /// Re-reads `trellis.toml` from `project_dir` and applies the resulting
    /// layout and file list as a reconfigure event.
    pub async fn reload(&self, project_dir: &Path) -> Result<EventOutcome, ServiceError> {
        let (_, layout, files) = scan(project_dir)?;
        self.send(ProjectEvent::Reconfigure { layout, files }).await
    }

    /// Runs a read-only query against the current graph.
    pub fn query<R>(&self, f: impl FnOnce(&HdlParam) -> R) -> R {
        f(&self.graph.read())
    }
}

struct ProjectActor {
    graph: Arc<RwLock<HdlParam>>,
    parser: Arc<dyn FastParser>,
    /// Content hash of the last applied version of each file.
    hashes: HashMap<String, ContentHash>,
}

impl ProjectActor {
    async fn run(mut self, mut inbox: mpsc::Receiver<Request>) {
        while let Some(request) = inbox.recv().await {
            match request {
                Request::Initialize { files, reply } => {
                    let count = self.initialize(files).await;
                    let _ = reply.send(count);
                }
                Request::Event { event, reply } => {
                    let kind = event.kind();
                    let result = self.handle(event).await;
                    if let Err(err) = &result {
                        tracing::warn!(event = kind, error = %err, "event rejected");
                    }
                    let _ = reply.send(result);
                }
            }
        }
        tracing::debug!("project inbox closed, actor stopping");
    }

    async fn handle(&mut self, event: ProjectEvent) -> Result<EventOutcome, ServiceError> {
        match event {
            ProjectEvent::Add(p) => self.add(path::normalize(&p)).await,
            ProjectEvent::Change(p) => self.change(path::normalize(&p)).await,
            ProjectEvent::Unlink(p) => self.unlink(path::normalize(&p)),
            ProjectEvent::Reconfigure { layout, files } => self.reconfigure(layout, files).await,
        }
    }

    async fn initialize(&mut self, files: Vec<String>) -> usize {
        self.hashes.clear();
        let keys: Vec<String> = files.iter().map(|f| path::normalize(f)).collect();
        let mut tasks = JoinSet::new();
        for key in keys.iter().cloned() {
            let parser = Arc::clone(&self.parser);
            tasks.spawn_blocking(move || {
                let hash = ContentHash::of_file(std::path::Path::new(&key)).ok();
                let parsed = parser.fast(&key);
                (key, hash, parsed)
            });
        }

        let staged = MemoryParser::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, hash, Ok(parsed))) => {
                    staged.insert(&key, parsed);
                    if let Some(hash) = hash {
                        self.hashes.insert(key, hash);
                    }
                }
                Ok((key, _, Err(err))) => {
                    tracing::warn!(path = %key, error = %err, "parse unavailable, skipping file");
                }
                Err(err) => tracing::warn!(error = %err, "parse task failed"),
            }
        }
        let parsed: Vec<&String> = keys.iter().filter(|k| staged.contains(k)).collect();
        self.graph.write().initialize(parsed, &staged)
    }

    async fn add(&mut self, key: String) -> Result<EventOutcome, ServiceError> {
        let registered = self.graph.read().has_hdl_file(&key);
        if registered {
            tracing::debug!(path = %key, "added file is already registered, re-parsing");
            return self.change(key).await;
        }
        let hash = content_hash(&key).await;
        let parsed = self.parse(&key).await?;
        self.graph.write().add_parsed_file(&key, parsed)?;
        self.remember(key, hash);
        Ok(EventOutcome::Applied)
    }

    async fn change(&mut self, key: String) -> Result<EventOutcome, ServiceError> {
        let registered = self.graph.read().has_hdl_file(&key);
        if !registered {
            return Err(ParamError::NotRegistered(key).into());
        }
        let hash = content_hash(&key).await;
        if hash.is_some() && self.hashes.get(&key) == hash.as_ref() {
            tracing::trace!(path = %key, "content unchanged, skipping");
            return Ok(EventOutcome::Unchanged);
        }
        let parsed = self.parse(&key).await?;
        self.graph.write().apply_file_change(&key, parsed)?;
        self.remember(key, hash);
        Ok(EventOutcome::Applied)
    }

    fn unlink(&mut self, key: String) -> Result<EventOutcome, ServiceError> {
        self.graph.write().delete_hdl_file(&key)?;
        self.hashes.remove(&key);
        Ok(EventOutcome::Applied)
    }

    async fn reconfigure(
        &mut self,
        layout: ScopeLayout,
        files: Vec<String>,
    ) -> Result<EventOutcome, ServiceError> {
        let same_layout = *self.graph.read().layout() == layout;
        if !same_layout {
            tracing::debug!(src = layout.src_dir(), sim = layout.sim_dir(), "layout changed, rebuilding");
            self.graph.write().set_layout(layout);
            self.initialize(files).await;
            return Ok(EventOutcome::Applied);
        }

        let wanted: Vec<String> = files.iter().map(|f| path::normalize(f)).collect();
        let wanted_set: HashSet<&str> = wanted.iter().map(String::as_str).collect();
        let current: Vec<String> = self
            .graph
            .read()
            .get_all_hdl_files()
            .map(|f| f.path().to_string())
            .collect();
        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();

        for stale in current.iter().filter(|p| !wanted_set.contains(p.as_str())) {
            if let Err(err) = self.unlink(stale.clone()) {
                tracing::warn!(path = %stale, error = %err, "failed to remove file");
            }
        }
        for fresh in wanted.iter().filter(|p| !current_set.contains(p.as_str())) {
            if let Err(err) = self.add(fresh.clone()).await {
                tracing::warn!(path = %fresh, error = %err, "failed to add file");
            }
        }
        Ok(EventOutcome::Applied)
    }

    async fn parse(&self, key: &str) -> Result<ParsedFile, ParamError> {
        let parser = Arc::clone(&self.parser);
        let owned = key.to_string();
        let joined = tokio::task::spawn_blocking(move || parser.fast(&owned)).await;
        match joined {
            Ok(result) => Ok(result?),
            Err(err) => Err(ParseError::Failed {
                path: key.to_string(),
                reason: err.to_string(),
            }
            .into()),
        }
    }

    fn remember(&mut self, key: String, hash: Option<ContentHash>) {
        match hash {
            Some(hash) => {
                self.hashes.insert(key, hash);
            }
            None => {
                self.hashes.remove(&key);
            }
        }
    }
}

fn scan(project_dir: &Path) -> Result<(ProjectConfig, ScopeLayout, Vec<String>), ServiceError> {
    let config = load_config(project_dir)?;
    let root = path::normalize(&project_dir.to_string_lossy());
    let layout = ScopeLayout::from_config(&config, &root);
    let files = hardware_files(&layout)?;
    Ok((config, layout, files))
}

async fn content_hash(key: &str) -> Option<ContentHash> {
    tokio::fs::read(key)
        .await
        .ok()
        .map(|bytes| ContentHash::from_bytes(&bytes))
}
