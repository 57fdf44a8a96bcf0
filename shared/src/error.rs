use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    // 時間の値が 0〜23 の整数に変換できなかった場合のエラー。
    // 対象の 1 件にのみ影響し、バッチ全体を中断させてはならない。
    #[error("時間の値が不正です: {0}")]
    InvalidHour(String),
    #[error("日付は YYYY-MM-DD 形式で指定してください: {0}")]
    InvalidDate(String),
    // 空き状況ストアへの問い合わせが失敗またはタイムアウトした場合のエラー。
    // 「空き枠なし」と区別するために必ず呼び出し元へ伝搬させる
    #[error("空き状況ストアへの問い合わせに失敗しました: {0}")]
    StoreUnavailable(String),
    #[error("スロットの付け替えが競合しました: {0}")]
    ReassignmentConflict(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConversionEntityError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidHour(_)
            | AppError::InvalidDate(_)
            | AppError::ValidationError(_)
            | AppError::ConversionEntityError(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ReassignmentConflict(_) => StatusCode::CONFLICT,
            e @ (AppError::SpecificOperationError(_) | AppError::NoRowsAffectedError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        status_code.into_response()
    }
}
