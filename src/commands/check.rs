//! The check command.

use crate::args::CheckArgs;
use crate::commands::Out;
use crate::model::TransactionField;
use crate::validate::{
    ValidatorVariant, AMOUNT_PATTERN, CATEGORY_PATTERN, DATE_PATTERN, DESCRIPTION_PATTERN,
};
use crate::{Config, Result};
use serde::Serialize;

/// The result of checking one field value.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    field: TransactionField,
    value: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// The pattern the value has to match, if the field has one under the configured rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
}

impl Check {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

/// Runs the configured validator for one field, the same check the form runs when the field is
/// left. An invalid value is reported in the output, it is not an error.
pub fn check(config: Config, args: CheckArgs) -> Result<Out<Check>> {
    let validator = config.validator();
    let field = args.field();
    let error = validator.validate_field(field, args.value());
    let pattern = match field {
        TransactionField::Description => Some(DESCRIPTION_PATTERN),
        TransactionField::Amount => Some(AMOUNT_PATTERN),
        TransactionField::Date => Some(DATE_PATTERN),
        TransactionField::Category => match validator.variant() {
            ValidatorVariant::Strict => Some(CATEGORY_PATTERN),
            ValidatorVariant::Lenient => None,
        },
    };
    let message = match error {
        Some(error) => format!("{field} is invalid: {error}"),
        None => format!("{field} is valid"),
    };
    Ok(Out::new(
        message,
        Check {
            field,
            value: args.value().to_string(),
            valid: error.is_none(),
            error: error.map(str::to_string),
            pattern: pattern.map(str::to_string),
        },
    ))
}
