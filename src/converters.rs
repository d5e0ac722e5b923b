//! Conversions between Python objects and keyed items / instruction dicts
use crate::errors::ReconcilerError;
use crate::keyed_sequence::KeyFn;
use crate::types::Instruction;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::sync::Arc;

/// A Python list item paired with the key extracted from it.
pub struct PyItem {
    pub key: String,
    pub object: Py<PyAny>,
}

impl Clone for PyItem {
    fn clone(&self) -> Self {
        // Py<PyAny> only clones with the GIL held
        Python::attach(|py| PyItem {
            key: self.key.clone(),
            object: self.object.clone_ref(py),
        })
    }
}

impl std::fmt::Debug for PyItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PyItem({}, <py-object>)", self.key)
    }
}

pub fn item_key_fn() -> KeyFn<PyItem> {
    Arc::new(|item: &PyItem| item.key.clone())
}

/// Run the Python `key` callable over every element of `items`.
pub fn extract_keyed_items<'py>(
    items: &Bound<'py, PyAny>,
    key: &Bound<'py, PyAny>,
) -> Result<Vec<PyItem>, ReconcilerError> {
    let mut keyed = Vec::new();
    for item in items.try_iter()? {
        let item = item?;
        let raw_key = key.call1((&item,)).map_err(|e| ReconcilerError::KeyError {
            details: e.to_string(),
        })?;
        let key_str: String = raw_key.extract().map_err(|e: PyErr| ReconcilerError::TypeConversionError {
            expected: "str".into(),
            actual: e.to_string(),
        })?;
        keyed.push(PyItem {
            key: key_str,
            object: item.unbind(),
        });
    }
    Ok(keyed)
}

pub fn instruction_to_pydict<'py>(
    py: Python<'py>,
    instruction: &Instruction<PyItem>,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("action", instruction.action())?;
    dict.set_item("pos", instruction.pos())?;
    if let Instruction::Moved { from_pos, .. } = instruction {
        dict.set_item("from_pos", *from_pos)?;
    }
    match instruction.item() {
        Some(item) => dict.set_item("item", item.object.bind(py))?,
        None => dict.set_item("item", py.None())?,
    }
    Ok(dict)
}

pub fn instructions_to_pylist<'py>(
    py: Python<'py>,
    instructions: &[Instruction<PyItem>],
) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for instruction in instructions {
        list.append(instruction_to_pydict(py, instruction)?)?;
    }
    Ok(list)
}
