//! Python module entry point
use crate::converters::{PyItem, extract_keyed_items, instructions_to_pylist, item_key_fn};
use crate::diff_engine::compare_with;
use crate::keyed_sequence::KeyedSequence;
use crate::types::{ADDED, CompareOptions, MOVED, REMOVED};
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Contexts = HashMap<String, KeyedSequence<PyItem>>;

/// Keeps the last rendered generation per context so successive calls diff
/// against it.
#[pyclass]
pub struct Reconciler {
    contexts: Arc<Mutex<Contexts>>,
}

#[pymethods]
impl Reconciler {
    #[new]
    fn new() -> Self {
        log::info!("Reconciler: initialized");
        Reconciler {
            contexts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn clear_context(&self, context_key: String) {
        self.lock().remove(&context_key);
    }

    fn clear_all_contexts(&self) {
        self.lock().clear();
        log::info!("Reconciler: cleared all contexts");
    }

    #[pyo3(signature = (context_key, items, key, on_match=None, collapse_moves=true))]
    fn reconcile<'py>(
        &self,
        py: Python<'py>,
        context_key: String,
        items: &Bound<'py, PyAny>,
        key: &Bound<'py, PyAny>,
        on_match: Option<&Bound<'py, PyAny>>,
        collapse_moves: bool,
    ) -> PyResult<Bound<'py, PyList>> {
        // Python callables run outside the context lock.
        let next = KeyedSequence::from_items(extract_keyed_items(items, key)?, item_key_fn());
        let mut matches = Vec::new();
        let instructions = {
            let mut contexts = self.lock();
            // A failed diff leaves the taken-out generation half-rewritten; it is dropped.
            let mut previous = contexts
                .remove(&context_key)
                .unwrap_or_else(|| KeyedSequence::new(item_key_fn()));
            let options = CompareOptions { collapse_moves };
            let instructions = compare_with(
                &mut previous,
                &next,
                |new_item, old_item| matches.push((new_item.clone(), old_item.clone())),
                &options,
            )?;
            contexts.insert(context_key, next);
            instructions
        };
        notify_matches(py, on_match, matches)?;
        instructions_to_pylist(py, &instructions)
    }
}

impl Reconciler {
    fn lock(&self) -> MutexGuard<'_, Contexts> {
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[pyfunction]
#[pyo3(signature = (old_items, new_items, key, on_match=None, collapse_moves=true))]
fn compare<'py>(
    py: Python<'py>,
    old_items: &Bound<'py, PyAny>,
    new_items: &Bound<'py, PyAny>,
    key: &Bound<'py, PyAny>,
    on_match: Option<&Bound<'py, PyAny>>,
    collapse_moves: bool,
) -> PyResult<Bound<'py, PyList>> {
    let mut old = KeyedSequence::from_items(extract_keyed_items(old_items, key)?, item_key_fn());
    let new = KeyedSequence::from_items(extract_keyed_items(new_items, key)?, item_key_fn());
    let mut matches = Vec::new();
    let options = CompareOptions { collapse_moves };
    let instructions = compare_with(
        &mut old,
        &new,
        |new_item, old_item| matches.push((new_item.clone(), old_item.clone())),
        &options,
    )?;
    notify_matches(py, on_match, matches)?;
    instructions_to_pylist(py, &instructions)
}

fn notify_matches(
    py: Python<'_>,
    on_match: Option<&Bound<'_, PyAny>>,
    matches: Vec<(PyItem, PyItem)>,
) -> PyResult<()> {
    let Some(callback) = on_match else {
        return Ok(());
    };
    for (new, old) in matches {
        callback.call1((new.object.bind(py), old.object.bind(py)))?;
    }
    Ok(())
}

#[pymodule]
fn keyed_reconciler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Reconciler>()?;
    m.add_function(wrap_pyfunction!(compare, m)?)?;

    m.add("ADDED", ADDED)?;
    m.add("REMOVED", REMOVED)?;
    m.add("MOVED", MOVED)?;

    Ok(())
}
