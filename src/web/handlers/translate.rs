//! 批量翻译处理器
//!
//! 无论成败都返回 HTTP 200，结果写在 `{Code, Message, Data}` 信封里。

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::translation::error::helpers;
use crate::translation::model::{PhraseRecord, ResultMessage};
use crate::web::types::AppState;

/// 请求体无法解析
pub const MESSAGE_BAD_REQUEST: &str = "参数错误";
/// 翻译服务商失败
pub const MESSAGE_TRANSLATE_FAILED: &str = "翻译出错";

/// 批量翻译短语
pub async fn translate_phrases(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<PhraseRecord>>, JsonRejection>,
) -> Json<ResultMessage<Vec<PhraseRecord>>> {
    let records = match payload {
        Ok(Json(records)) => records,
        Err(rejection) => {
            helpers::log(&helpers::validation_error(format!(
                "请求参数错误: {}",
                rejection.body_text()
            )));
            return Json(ResultMessage::error(MESSAGE_BAD_REQUEST));
        }
    };

    tracing::debug!("收到翻译请求: {} 条", records.len());

    match state.engine.translate_batch(records).await {
        Ok(translated) => Json(ResultMessage::ok(translated)),
        Err(e) => {
            tracing::debug!(category = ?e.category(), "翻译请求失败");
            Json(ResultMessage::error(MESSAGE_TRANSLATE_FAILED))
        }
    }
}
