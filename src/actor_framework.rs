use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;
    type CreateParams: Send + Debug + 'static;
    type Patch: Send + Debug + 'static;
    type Action: Send + Debug + 'static;
    type ActionResult: Send + Debug + 'static;
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and creation parameters.
    fn from_create(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// Checked against every stored item before a new one is inserted.
    fn check_unique(&self, _existing: &Self) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Lifecycle Hooks ---

    /// Apply a patch. Implementations validate before mutating, so a rejected
    /// patch leaves the record untouched.
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;

    // --- Action Handler ---

    /// Handle a domain-specific action. Runs inside the actor loop, so the
    /// read-check-write it performs is atomic with respect to other requests.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Transport and lookup failures shared by every resource actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("actor closed")]
    ActorClosed,
    #[error("actor dropped the request")]
    ActorDropped,
    #[error("item not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Entity(E),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

/// Predicate used by [`ResourceRequest::List`].
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

impl<T: Entity> Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { params, .. } => f.debug_struct("Create").field("params", params).finish(),
            Self::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            Self::List { .. } => f.debug_struct("List").finish_non_exhaustive(),
            Self::Update { id, patch, .. } => f
                .debug_struct("Update")
                .field("id", id)
                .field("patch", patch)
                .finish(),
            Self::Action { id, action, .. } => f
                .debug_struct("Action")
                .field("id", id)
                .field("action", action)
                .finish(),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    // Insertion order, used to list newest first.
    order: Vec<T::Id>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            order: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        debug!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let id = (self.next_id_fn)();
                    let result = T::from_create(id.clone(), params)
                        .and_then(|item| {
                            self.store.values().try_for_each(|existing| item.check_unique(existing))?;
                            Ok(item)
                        })
                        .map(|item| {
                            self.store.insert(id.clone(), item.clone());
                            self.order.push(id);
                            item
                        })
                        .map_err(FrameworkError::Entity);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { filter: accept, respond_to } => {
                    let items = self
                        .order
                        .iter()
                        .rev()
                        .filter_map(|id| self.store.get(id))
                        .filter(|item| accept(*item))
                        .cloned()
                        .collect();
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item
                            .on_update(patch)
                            .map(|()| item.clone())
                            .map_err(FrameworkError::Entity),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Entity),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    if let Err(e) = &result {
                        warn!(item_id = %id, error = %e, "Action rejected");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }
        debug!(items = self.store.len(), "Actor stopped");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Lists every item accepted by `filter`, newest first.
    pub async fn list(
        &self,
        filter: impl Fn(&T) -> bool + Send + 'static,
    ) -> Result<Vec<T>, FrameworkError<T::Error>> {
        let filter: Filter<T> = Box::new(filter);
        self.request(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use testresult::TestResult;

    #[derive(Clone, Debug, PartialEq)]
    struct Bin {
        id: u64,
        label: String,
        count: u32,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum BinError {
        #[error("bin {0} would go below zero")]
        Underflow(u64),
        #[error("label must not be empty")]
        EmptyLabel,
        #[error("label {0} is taken")]
        DuplicateLabel(String),
    }

    #[derive(Debug)]
    enum BinAction {
        Take(u32),
    }

    impl Entity for Bin {
        type Id = u64;
        type CreateParams = String;
        type Patch = String;
        type Action = BinAction;
        type ActionResult = u32;
        type Error = BinError;

        fn id(&self) -> &u64 {
            &self.id
        }

        fn from_create(id: u64, label: String) -> Result<Self, BinError> {
            if label.is_empty() {
                return Err(BinError::EmptyLabel);
            }
            Ok(Self { id, label, count: 10 })
        }

        fn check_unique(&self, existing: &Self) -> Result<(), BinError> {
            if self.label == existing.label {
                return Err(BinError::DuplicateLabel(self.label.clone()));
            }
            Ok(())
        }

        fn on_update(&mut self, label: String) -> Result<(), BinError> {
            if label.is_empty() {
                return Err(BinError::EmptyLabel);
            }
            self.label = label;
            Ok(())
        }

        fn handle_action(&mut self, action: BinAction) -> Result<u32, BinError> {
            match action {
                BinAction::Take(n) if n <= self.count => {
                    self.count -= n;
                    Ok(self.count)
                }
                BinAction::Take(_) => Err(BinError::Underflow(self.id)),
            }
        }
    }

    fn spawn_bins() -> ResourceClient<Bin> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn create_then_get_returns_stored_item() -> TestResult {
        let client = spawn_bins();

        let created = client.create("almonds".to_string()).await?;
        let fetched = client.get(created.id).await?;

        assert_eq!(fetched, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_create_is_not_stored() -> TestResult {
        let client = spawn_bins();

        let result = client.create(String::new()).await;

        assert_eq!(result, Err(FrameworkError::Entity(BinError::EmptyLabel)));
        assert!(client.list(|_| true).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn conflicting_create_is_rejected_and_not_stored() -> TestResult {
        let client = spawn_bins();
        client.create("pecans".to_string()).await?;

        let duplicate = client.create("pecans".to_string()).await;

        assert_eq!(duplicate, Err(FrameworkError::Entity(BinError::DuplicateLabel("pecans".to_string()))));
        assert_eq!(client.list(|_| true).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() -> TestResult {
        let client = spawn_bins();
        for label in ["a", "b", "c"] {
            client.create(label.to_string()).await?;
        }

        let labels: Vec<String> = client
            .list(|bin: &Bin| bin.label != "b")
            .await?
            .into_iter()
            .map(|bin| bin.label)
            .collect();

        assert_eq!(labels, vec!["c".to_string(), "a".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn actions_mutate_atomically_and_reject_without_change() -> TestResult {
        let client = spawn_bins();
        let bin = client.create("cashews".to_string()).await?;

        assert_eq!(client.perform_action(bin.id, BinAction::Take(4)).await?, 6);
        let rejected = client.perform_action(bin.id, BinAction::Take(7)).await;

        assert_eq!(rejected, Err(FrameworkError::Entity(BinError::Underflow(bin.id))));
        assert_eq!(client.get(bin.id).await?.map(|b| b.count), Some(6));
        Ok(())
    }

    #[tokio::test]
    async fn update_and_action_on_unknown_id_report_not_found() {
        let client = spawn_bins();

        let update = client.update(99, "x".to_string()).await;
        let action = client.perform_action(99, BinAction::Take(1)).await;

        assert_eq!(update, Err(FrameworkError::NotFound("99".to_string())));
        assert_eq!(action, Err(FrameworkError::NotFound("99".to_string())));
    }
}
