/*!
 * Tests for the error taxonomy
 */

use xliff_translator::errors::{AppError, ParseError, ProviderError, TranslationError};

#[test]
fn test_providerError_fromStatus_shouldClassifyStatusCodes() {
    assert!(matches!(
        ProviderError::from_status(429, "slow down".to_string()),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(401, "bad key".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(503, "unavailable".to_string()),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_providerError_isRateLimited_shouldOnlyMatchThrottling() {
    assert!(ProviderError::RateLimitExceeded("quota".to_string()).is_rate_limited());
    assert!(
        ProviderError::ApiError {
            status_code: 429,
            message: "Too Many Requests".to_string()
        }
        .is_rate_limited()
    );

    assert!(!ProviderError::ConnectionError("refused".to_string()).is_rate_limited());
    assert!(!ProviderError::AuthenticationError("denied".to_string()).is_rate_limited());
    assert!(!ProviderError::ResponseMismatch { expected: 3, actual: 2 }.is_rate_limited());
}

#[test]
fn test_appError_conversions_shouldWrapSourceErrors() {
    let parse: AppError = ParseError::NoRootElement.into();
    assert!(matches!(parse, AppError::Parse(ParseError::NoRootElement)));

    let provider: AppError = ProviderError::ConnectionError("refused".to_string()).into();
    assert!(matches!(provider, AppError::Provider(_)));

    let translation: AppError = TranslationError::RetryBudgetExhausted { batch: 2, attempts: 5 }.into();
    assert_eq!(translation.to_string(), "Translation error: Batch 2 still throttled after 5 attempts");

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));

    let other: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(other.to_string(), "Unknown error: boom");
}

#[test]
fn test_parseError_display_shouldNameElementAndAttribute() {
    let error = ParseError::MissingAttribute {
        element: "g".to_string(),
        attribute: "id",
    };

    assert_eq!(error.to_string(), "<g> is missing required attribute 'id'");
}
