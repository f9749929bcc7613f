use serde_json::Value;

use crate::delta::{Delta, Operation};
use crate::error::Result;
use crate::pointer;

/// Apply `ops` in order to a deep copy of `document`.
///
/// The input is never touched; callers holding the previous document keep a
/// valid, unchanged value. Later operations on the same path win.
pub fn apply_ops(document: &Value, ops: &[Operation]) -> Result<Value> {
    let mut out = document.clone();
    for op in ops {
        match op {
            Operation::Set { path, value }
            | Operation::Merge { path, value }
            | Operation::Append { path, value } => {
                pointer::set(&mut out, path, value.clone())?;
            }
            Operation::Remove { path } => {
                pointer::remove(&mut out, path)?;
            }
        }
    }
    Ok(out)
}

pub fn apply_delta(document: &Value, delta: &Delta) -> Result<Value> {
    apply_ops(document, &delta.ops)
}
