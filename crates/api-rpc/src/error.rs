//! RPC Error Types
//!
//! Maps application and correction errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use paysweep_core::domain::CorrectionError;
use paysweep_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const BAD_REQUEST: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    /// Correction finished without reconciling (no reference, provider
    /// error, or payment not yet succeeded); message carries the detail
    pub const NOT_RECONCILED: i32 = 4020;
    pub const PERMISSION_DENIED: i32 = 4030;
    pub const WRONG_METHOD: i32 = 4040;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const PROVIDER_UNAVAILABLE: i32 = 5030;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => ErrorObjectOwned::owned(code::BAD_REQUEST, msg, None::<()>),
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Provider(e) => {
            ErrorObjectOwned::owned(code::NOT_RECONCILED, e.to_string(), None::<()>)
        }
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::BAD_REQUEST, e.to_string(), None::<()>)
        }
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Convert the manual-path failure taxonomy to JSON-RPC error objects
pub fn correction_to_rpc_error(err: CorrectionError) -> ErrorObjectOwned {
    let code = match &err {
        CorrectionError::PermissionDenied => code::PERMISSION_DENIED,
        CorrectionError::BadRequest(_) => code::BAD_REQUEST,
        CorrectionError::NotFound(_) => code::NOT_FOUND,
        CorrectionError::WrongMethod { .. } => code::WRONG_METHOD,
        CorrectionError::ProviderUnavailable => code::PROVIDER_UNAVAILABLE,
        CorrectionError::NoReference
        | CorrectionError::Provider(_)
        | CorrectionError::NotSucceeded(_) => code::NOT_RECONCILED,
        CorrectionError::Store(_) => code::DB_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correction_errors_map_to_distinct_codes() {
        let cases = [
            (CorrectionError::PermissionDenied, code::PERMISSION_DENIED),
            (
                CorrectionError::BadRequest("missing order id".into()),
                code::BAD_REQUEST,
            ),
            (CorrectionError::NotFound("o-1".into()), code::NOT_FOUND),
            (
                CorrectionError::WrongMethod {
                    expected: "stripe".into(),
                    actual: "paypal".into(),
                },
                code::WRONG_METHOD,
            ),
            (
                CorrectionError::ProviderUnavailable,
                code::PROVIDER_UNAVAILABLE,
            ),
            (CorrectionError::NoReference, code::NOT_RECONCILED),
            (
                CorrectionError::NotSucceeded("processing".into()),
                code::NOT_RECONCILED,
            ),
            (CorrectionError::Store("disk".into()), code::DB_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(correction_to_rpc_error(err).code(), expected);
        }
    }

    #[test]
    fn not_succeeded_error_carries_provider_status_string() {
        let err = correction_to_rpc_error(CorrectionError::NotSucceeded("requires_action".into()));
        assert!(err.message().contains("requires_action"));
    }
}
