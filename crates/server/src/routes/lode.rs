use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Form, Json,
};
use service::Entry;

use crate::binding::{self, VALUE_FIELD};
use crate::errors::ApiError;
use crate::state::AppState;

/// 按 search 列表顺序查找第一个存在的 key
pub async fn get_key(
    State(state): State<AppState>,
    route: Result<Path<HashMap<String, String>>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Entry>, ApiError> {
    let Path(route) = route?;
    let Query(query) = query?;
    let params = binding::bind(route, query);
    let entry = state.lode.get(&params).await?;
    Ok(Json(entry))
}

/// 使用写入模板解析 key 并保存 value
pub async fn set_key(
    State(state): State<AppState>,
    route: Result<Path<HashMap<String, String>>, PathRejection>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<Entry>, ApiError> {
    let Path(route) = route?;
    let Form(form) = form?;
    let value = form
        .get(VALUE_FIELD)
        .cloned()
        .ok_or_else(|| ApiError::bad_request(format!("missing form field `{VALUE_FIELD}`")))?;
    let params = binding::bind(route, form);
    let entry = state.lode.set(&params, &value).await?;
    Ok(Json(entry))
}
