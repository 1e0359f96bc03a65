//! Sync dispatch: routes a persistence request to the right `Store` call.

use std::sync::Arc;

use tracing::{debug, trace};

use super::config::{EmptyFetchPolicy, SyncConfig};
use super::model::Model;
use super::operation::{SyncError, SyncMethod, SyncResponse};

/// Completion callbacks for the callback-style [`SyncStrategy::sync`].
pub struct SyncOptions<'a> {
    success: Box<dyn FnOnce(SyncResponse) + 'a>,
    error: Box<dyn FnOnce(SyncError) + 'a>,
}

impl<'a> SyncOptions<'a> {
    #[must_use]
    pub fn new(
        success: impl FnOnce(SyncResponse) + 'a,
        error: impl FnOnce(SyncError) + 'a,
    ) -> Self {
        Self {
            success: Box::new(success),
            error: Box::new(error),
        }
    }
}

impl std::fmt::Debug for SyncOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions").finish_non_exhaustive()
    }
}

/// Persistence strategy injected into the model layer.
///
/// The model layer calls one strategy for every persistence operation
/// instead of relying on a process-wide override.
///
/// Used as `Arc<dyn SyncStrategy>`.
pub trait SyncStrategy: Send + Sync {
    /// Performs `method` for `model`.
    ///
    /// `Create` may assign an id, which is written into `model`'s record.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] when no record is produced,
    /// [`SyncError::NoStore`] when the model has no store, and
    /// [`SyncError::Store`] when the store fails.
    fn dispatch(&self, method: SyncMethod, model: &mut Model) -> Result<SyncResponse, SyncError>;

    /// Callback form of [`dispatch`](Self::dispatch): exactly one of
    /// `options`' callbacks is invoked.
    fn sync(&self, method: SyncMethod, model: &mut Model, options: SyncOptions<'_>) {
        match self.dispatch(method, model) {
            Ok(response) => (options.success)(response),
            Err(err) => (options.error)(err),
        }
    }
}

/// [`SyncStrategy`] that persists through the model's (or its collection's)
/// local [`Store`](crate::Store).
#[derive(Debug, Clone, Default)]
pub struct LocalSync {
    config: SyncConfig,
}

impl LocalSync {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}

impl SyncStrategy for LocalSync {
    fn dispatch(&self, method: SyncMethod, model: &mut Model) -> Result<SyncResponse, SyncError> {
        let store = Arc::clone(model.resolve_store().ok_or(SyncError::NoStore)?);
        trace!(%method, store = store.name(), id = ?model.id(), "dispatching sync");

        let response = match method {
            SyncMethod::Read if model.id().is_some() => store
                .find(model.record())?
                .map(SyncResponse::Record)
                .ok_or(SyncError::NotFound)?,
            SyncMethod::Read => {
                let records = store.find_all()?;
                if records.is_empty() && self.config.empty_fetch == EmptyFetchPolicy::NotFound {
                    debug!(store = store.name(), "empty fetch reported as not found");
                    return Err(SyncError::NotFound);
                }
                SyncResponse::Records(records)
            }
            SyncMethod::Create => SyncResponse::Record(store.create(model.record_mut())?),
            SyncMethod::Update => SyncResponse::Record(store.update(model.record())?),
            SyncMethod::Delete => SyncResponse::Record(store.destroy(model.record())?),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use localsync_core::{Attributes, Record, SequentialIds};
    use serde_json::{json, Value};

    use super::*;
    use crate::engines::MemoryEngine;
    use crate::store::{SharedStore, Store, StoreError};
    use crate::sync::model::Collection;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn store(name: &str) -> SharedStore {
        Arc::new(Store::with_id_generator(
            name,
            Arc::new(MemoryEngine::new()),
            Arc::new(SequentialIds::new(name)),
        ))
    }

    fn model_in(store: &SharedStore, value: Value) -> Model {
        Model::new(Record::new(attrs(value))).with_store(Arc::clone(store))
    }

    /// Runs the callback form and reports which callback fired.
    fn run(sync: &LocalSync, method: SyncMethod, model: &mut Model) -> Result<SyncResponse, String> {
        let outcome = RefCell::new(None);
        sync.sync(
            method,
            model,
            SyncOptions::new(
                |resp| *outcome.borrow_mut() = Some(Ok(resp)),
                |err| *outcome.borrow_mut() = Some(Err(err.to_string())),
            ),
        );
        outcome.into_inner().expect("one callback must fire")
    }

    #[test]
    fn create_assigns_id_to_model() {
        let todos = store("todo");
        let mut model = model_in(&todos, json!({"title": "milk"}));

        let resp = LocalSync::default()
            .dispatch(SyncMethod::Create, &mut model)
            .unwrap();

        assert_eq!(model.id(), Some("todo-1"));
        assert_eq!(resp.into_record().unwrap().id(), Some("todo-1"));
        assert_eq!(todos.len().unwrap(), 1);
    }

    #[test]
    fn read_without_id_fetches_collection() {
        let todos = store("todo");
        let sync = LocalSync::default();
        sync.dispatch(SyncMethod::Create, &mut model_in(&todos, json!({"n": 1})))
            .unwrap();
        sync.dispatch(SyncMethod::Create, &mut model_in(&todos, json!({"n": 2})))
            .unwrap();

        let collection = Arc::new(Collection::new(Arc::clone(&todos)));
        let mut fetcher = Model::new(Record::default()).in_collection(collection);
        let resp = sync.dispatch(SyncMethod::Read, &mut fetcher).unwrap();

        assert!(matches!(resp, SyncResponse::Records(ref r) if r.len() == 2));
    }

    #[test]
    fn read_with_id_fetches_single_record() {
        let todos = store("todo");
        let sync = LocalSync::default();
        sync.dispatch(SyncMethod::Create, &mut model_in(&todos, json!({"n": 1})))
            .unwrap();
        sync.dispatch(SyncMethod::Create, &mut model_in(&todos, json!({"n": 2})))
            .unwrap();

        let mut model = model_in(&todos, json!({"id": "todo-2"}));
        let resp = sync.dispatch(SyncMethod::Read, &mut model).unwrap();

        let record = resp.into_record().expect("single-record response");
        assert_eq!(record.get("n"), Some(&json!(2)));
    }

    #[test]
    fn read_missing_id_invokes_error_callback() {
        let todos = store("todo");
        let mut model = model_in(&todos, json!({"id": "nope"}));

        let outcome = run(&LocalSync::default(), SyncMethod::Read, &mut model);

        assert_eq!(outcome.unwrap_err(), "Record not found");
    }

    #[test]
    fn success_callback_receives_response() {
        let todos = store("todo");
        let mut model = model_in(&todos, json!({"title": "milk"}));

        let outcome = run(&LocalSync::default(), SyncMethod::Create, &mut model);

        let record = outcome.unwrap().into_record().unwrap();
        assert_eq!(record.get("title"), Some(&json!("milk")));
    }

    #[test]
    fn empty_fetch_succeeds_by_default() {
        let todos = store("todo");
        let mut model = Model::new(Record::default()).with_store(todos);

        let resp = LocalSync::default()
            .dispatch(SyncMethod::Read, &mut model)
            .unwrap();

        assert_eq!(resp, SyncResponse::Records(Vec::new()));
    }

    #[test]
    fn empty_fetch_can_be_reported_as_not_found() {
        let todos = store("todo");
        let mut model = Model::new(Record::default()).with_store(todos);
        let sync = LocalSync::new(SyncConfig {
            empty_fetch: EmptyFetchPolicy::NotFound,
        });

        let outcome = run(&sync, SyncMethod::Read, &mut model);

        assert_eq!(outcome.unwrap_err(), "Record not found");
    }

    #[test]
    fn update_and_delete_route_to_store() {
        let todos = store("todo");
        let sync = LocalSync::default();
        let mut model = model_in(&todos, json!({"title": "milk"}));
        sync.dispatch(SyncMethod::Create, &mut model).unwrap();

        model.record_mut().set("title", json!("oat milk"));
        sync.dispatch(SyncMethod::Update, &mut model).unwrap();
        let stored = todos.find(model.record()).unwrap().unwrap();
        assert_eq!(stored.get("title"), Some(&json!("oat milk")));

        let resp = sync.dispatch(SyncMethod::Delete, &mut model).unwrap();
        assert_eq!(resp.into_record().as_ref(), Some(model.record()));
        assert!(todos.is_empty().unwrap());
    }

    #[test]
    fn model_store_takes_precedence() {
        let own = store("own");
        let shared = store("shared");
        let collection = Arc::new(Collection::new(Arc::clone(&shared)));
        let mut model = model_in(&own, json!({"title": "x"})).in_collection(collection);

        LocalSync::default()
            .dispatch(SyncMethod::Create, &mut model)
            .unwrap();

        assert_eq!(own.len().unwrap(), 1);
        assert!(shared.is_empty().unwrap());
    }

    #[test]
    fn missing_store_is_an_error() {
        let mut model = Model::new(Record::default());
        let err = LocalSync::default()
            .dispatch(SyncMethod::Read, &mut model)
            .unwrap_err();
        assert!(matches!(err, SyncError::NoStore));
    }

    #[test]
    fn update_without_id_surfaces_store_error() {
        let todos = store("todo");
        let mut model = model_in(&todos, json!({"title": "x"}));
        let err = LocalSync::default()
            .dispatch(SyncMethod::Update, &mut model)
            .unwrap_err();
        assert!(matches!(
            err,
            SyncError::Store(StoreError::MissingId { operation: "update" })
        ));
    }

    #[test]
    fn strategy_is_object_safe() {
        let strategy: Arc<dyn SyncStrategy> = Arc::new(LocalSync::default());
        let mut model = Model::new(Record::default()).with_store(store("todo"));
        assert!(strategy.dispatch(SyncMethod::Read, &mut model).is_ok());
    }
}
