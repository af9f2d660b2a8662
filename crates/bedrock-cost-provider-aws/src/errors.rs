//! Mapping of Cost Explorer SDK failures onto `CostError`
//!
//! Throttling and transport failures become retryable variants; rejected
//! or missing credentials and access-denied responses are surfaced as
//! `Credentials` and `Permission` so the CLI can report them verbatim.

use aws_sdk_costexplorer::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageError;
use bedrock_cost_core::error::CostError;

const THROTTLING_CODES: &[&str] = &[
    "LimitExceededException",
    "ThrottlingException",
    "TooManyRequestsException",
];

const PERMISSION_CODES: &[&str] = &[
    "AccessDeniedException",
    "AccessDenied",
    "UnauthorizedOperation",
];

const CREDENTIALS_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidClientTokenId",
    "ExpiredTokenException",
    "InvalidSignatureException",
    "SignatureDoesNotMatch",
];

/// Classify a `GetCostAndUsage` failure
pub fn classify_sdk_error(err: SdkError<GetCostAndUsageError>) -> CostError {
    let message = DisplayErrorContext(&err).to_string();
    match &err {
        SdkError::TimeoutError(_) => CostError::Network(message),
        SdkError::DispatchFailure(failure) if failure.is_timeout() || failure.is_io() => {
            CostError::Network(message)
        }
        SdkError::ServiceError(context) => classify_error_code(context.err().code(), message),
        _ => classify_error_code(None, message),
    }
}

/// Classify a failure from its AWS error code and rendered message
pub fn classify_error_code(code: Option<&str>, message: String) -> CostError {
    match code {
        Some(code) if THROTTLING_CODES.contains(&code) => CostError::Throttled(message),
        Some(code) if PERMISSION_CODES.contains(&code) => CostError::Permission(message),
        Some(code) if CREDENTIALS_CODES.contains(&code) => CostError::Credentials(message),
        _ if message.to_ascii_lowercase().contains("credential") => {
            CostError::Credentials(message)
        }
        _ => CostError::Provider(message),
    }
}
