use validator::{Validate, ValidationErrors};

use crate::error::{CoaError, CoaResult};

pub fn validate_model<T: Validate>(model: &T) -> CoaResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(CoaError::validation("config", error_messages))
        }
    }
}

/// Flatten nested validator errors into `section.field: reason` messages.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages("", errors, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match error.code.as_ref() {
                        "range" => format!("{}: value out of range", path),
                        "length" => format!("{}: length out of bounds", path),
                        "required" => format!("{}: is required", path),
                        code => format!("{}: failed {}", path, code),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect_messages(&format!("{}[{}]", path, idx), nested, messages);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_model(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_nested_errors_carry_their_path() {
        let mut config = AppConfig::default();
        config.output.bar_width = 3;
        config.analyzer.min_header_matches = 0;

        let error = validate_model(&config).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("output.bar_width: value out of range"), "{}", message);
        assert!(message.contains("analyzer.min_header_matches: value out of range"), "{}", message);
    }
}
