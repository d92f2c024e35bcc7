//! Tests for error types

use quantum_collab::scheduler::ExperimentStatus;
use quantum_collab::Error;

#[test]
fn test_unauthorized_error() {
    let error = Error::Unauthorized;
    assert_eq!(format!("{error}"), "Unauthorized");
    assert_eq!(error.code(), 100);
}

#[test]
fn test_invalid_status_error() {
    let error = Error::InvalidStatus {
        id: 1,
        status: ExperimentStatus::Completed,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid experiment status"));
    assert!(error_str.contains("completed"));
    assert_eq!(error.code(), 101);
}

#[test]
fn test_insufficient_balance_error() {
    let error = Error::InsufficientBalance {
        balance: 100,
        requested: 1_000_000,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Insufficient balance"));
    assert!(error_str.contains("100"));
    assert!(error_str.contains("1000000"));
    assert_eq!(error.code(), 102);
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("amount must be positive".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("amount must be positive"));
    assert_eq!(error.code(), 103);
}

#[test]
fn test_not_found_error() {
    let error = Error::NotFound("experiment 999".to_string());
    assert!(format!("{error}").contains("experiment 999"));
    assert_eq!(error.code(), 104);
}

#[test]
fn test_unknown_operation_error() {
    let error = Error::UnknownOperation {
        contract: "quantum-token".to_string(),
        operation: "burn".to_string(),
    };
    assert_eq!(format!("{error}"), "Unknown operation: quantum-token.burn");
    assert_eq!(error.code(), 111);
}

#[test]
fn test_serialization_error_conversion() {
    let json_error = serde_json::from_str::<u64>("not json").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("Serialization error"));
    assert_eq!(error.code(), 121);
}

#[test]
fn test_codes_are_distinct() {
    let errors = [
        Error::Unauthorized,
        Error::InvalidStatus {
            id: 1,
            status: ExperimentStatus::Scheduled,
        },
        Error::InsufficientBalance {
            balance: 0,
            requested: 1,
        },
        Error::InvalidInput(String::new()),
        Error::NotFound(String::new()),
        Error::Overflow,
        Error::UnknownContract(String::new()),
        Error::UnknownOperation {
            contract: String::new(),
            operation: String::new(),
        },
        Error::Storage(String::new()),
    ];
    let mut codes: Vec<u32> = errors.iter().map(Error::code).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), errors.len());
}

#[test]
fn test_error_debug() {
    let error = Error::Overflow;
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("Overflow"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> quantum_collab::Result<u64> {
        Err(Error::Unauthorized)
    }

    assert!(returns_error().is_err());
}
