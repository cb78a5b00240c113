use inkstreak_domain::shared::DomainError;

/// Extension trait for Result types to simplify error handling
pub trait ResultExt<T, E> {
    /// Convert error to DomainError::Infrastructure
    /// Usage: `result.to_infra_err()?`
    fn to_infra_err(self) -> Result<T, DomainError>;

    /// Convert error to DomainError::InvalidInput, prefixed with `what`
    fn to_invalid_input(self, what: &str) -> Result<T, DomainError>;

    /// Convert error to DomainError::Serialization
    fn to_serialization_err(self) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn to_invalid_input(self, what: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::InvalidInput(format!("{}: {}", what, e)))
    }

    fn to_serialization_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_infra_err() {
        let result: Result<i32, &str> = Err("infra error");
        match result.to_infra_err() {
            Err(DomainError::Infrastructure(msg)) => assert_eq!(msg, "infra error"),
            _ => panic!("Expected Infrastructure error"),
        }
    }

    #[test]
    fn test_to_invalid_input_names_the_field() {
        let result: Result<i32, &str> = Err("not a number");
        match result.to_invalid_input("word_count") {
            Err(DomainError::InvalidInput(msg)) => assert_eq!(msg, "word_count: not a number"),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_ok_passes_through() {
        let result: Result<i32, &str> = Ok(7);
        assert_eq!(result.to_serialization_err().unwrap(), 7);
    }
}
