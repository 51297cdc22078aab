//! Resource-name parsing

use super::{expect_args, opt_str};
use crate::registry::{Function, FunctionError};
use terminus_core::{Arn, Value};

/// `parse_arn(value)` — parse the six-segment `arn:` form into a
/// structured descriptor; absent for anything that does not parse
pub struct ParseArn;

impl Function for ParseArn {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        let Some(input) = opt_str(args, 0)? else {
            return Ok(None);
        };
        Ok(Arn::parse(input).map(Value::Arn))
    }
}
