//! Presence, equality, and substring functions

use super::{expect_args, opt_bool, opt_int, opt_str};
use crate::registry::{Function, FunctionError};
use terminus_core::Value;

/// `is_set(value)` — whether the argument carries a value
pub struct IsSet;

impl Function for IsSet {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        Ok(Some(Value::Bool(args[0].is_some())))
    }
}

/// `not(value)` — boolean negation; absent stays absent
pub struct Not;

impl Function for Not {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        Ok(opt_bool(args, 0)?.map(|b| Value::Bool(!b)))
    }
}

/// `string_equals(left, right)` — absent if either side is absent
pub struct StringEquals;

impl Function for StringEquals {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 2)?;
        match (opt_str(args, 0)?, opt_str(args, 1)?) {
            (Some(left), Some(right)) => Ok(Some(Value::Bool(left == right))),
            _ => Ok(None),
        }
    }
}

/// `boolean_equals(left, right)` — absent if either side is absent
pub struct BooleanEquals;

impl Function for BooleanEquals {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 2)?;
        match (opt_bool(args, 0)?, opt_bool(args, 1)?) {
            (Some(left), Some(right)) => Ok(Some(Value::Bool(left == right))),
            _ => Ok(None),
        }
    }
}

/// `substring(input, start, stop, reverse)` — the `[start, stop)` window
/// of an ASCII string, counted from the end when `reverse` is true.
/// Absent on an empty window, an out-of-range stop, or non-ASCII input.
pub struct Substring;

impl Function for Substring {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 4)?;
        let (input, start, stop, reverse) = match (
            opt_str(args, 0)?,
            opt_int(args, 1)?,
            opt_int(args, 2)?,
            opt_bool(args, 3)?,
        ) {
            (Some(input), Some(start), Some(stop), Some(reverse)) => {
                (input, start, stop, reverse)
            }
            _ => return Ok(None),
        };

        if start < 0 || stop <= start {
            return Ok(None);
        }
        let (start, stop) = (start as usize, stop as usize);
        if !input.is_ascii() || input.len() < stop {
            return Ok(None);
        }

        let window = if reverse {
            &input[input.len() - stop..input.len() - start]
        } else {
            &input[start..stop]
        };
        Ok(Some(Value::String(window.to_string())))
    }
}
