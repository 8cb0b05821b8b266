//! Receipt download endpoint

use axum::{
    Extension,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use engine::{EngineError, ExpenseId, Receipt};

use crate::{ServerError, server::ServerState, user};

/// `Content-Disposition` value for `filename`.
///
/// `filename` carries an ASCII fallback (non-ASCII replaced by `_`, quotes
/// and controls dropped); `filename*` carries the exact UTF-8 name, percent
/// encoded as in RFC 5987.
fn disposition(filename: &str) -> HeaderValue {
    let visible = filename.chars().filter(|c| !c.is_control());
    let fallback: String = visible
        .clone()
        .filter(|c| *c != '"' && *c != '\\')
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let exact = urlencoding::encode(&visible.collect::<String>()).into_owned();

    HeaderValue::from_str(&format!(
        "inline; filename=\"{fallback}\"; filename*=UTF-8''{exact}"
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

fn content_type(mime_type: &str) -> HeaderValue {
    HeaderValue::from_str(mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

fn into_download(receipt: Receipt) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type(&receipt.mime_type)),
            (header::CONTENT_DISPOSITION, disposition(&receipt.filename)),
        ],
        receipt.bytes,
    )
        .into_response()
}

/// Handle requests for the receipt attached to one of the user's expenses
pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<String>,
) -> Result<Response, ServerError> {
    let expense_id: ExpenseId = expense_id.parse()?;

    match state
        .engine
        .receipt_by_expense(user.user_id()?, expense_id)
        .await?
    {
        Some(receipt) => Ok(into_download(receipt)),
        None => Err(EngineError::KeyNotFound(format!("receipt for expense {expense_id}")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_strips_quotes_and_controls() {
        assert_eq!(
            disposition("a\"b\n.pdf"),
            HeaderValue::from_static("inline; filename=\"ab.pdf\"; filename*=UTF-8''a%22b.pdf")
        );
    }

    #[test]
    fn disposition_keeps_non_ascii_names_in_extended_form() {
        assert_eq!(
            disposition("ticket é.png"),
            HeaderValue::from_static(
                "inline; filename=\"ticket _.png\"; filename*=UTF-8''ticket%20%C3%A9.png"
            )
        );
    }

    #[test]
    fn content_type_falls_back_to_octet_stream() {
        assert_eq!(content_type("image/png"), "image/png");
        assert_eq!(content_type("bad\nmime"), "application/octet-stream");
    }
}
