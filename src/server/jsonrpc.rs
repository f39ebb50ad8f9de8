//! JSON-RPC 2.0 dispatch onto a [`RequestHandler`]

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    codec::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION},
    protocol::{
        error::{codes, A2AError},
        A2AOperation,
    },
    server::handler::RequestHandler,
};

/// Route one decoded JSON-RPC request to the handler
///
/// Always produces a response envelope: handler errors are reported through
/// the `error` member with the request's id.
pub async fn dispatch<H>(handler: &H, request: JsonRpcRequest) -> JsonRpcResponse
where
    H: RequestHandler + ?Sized,
{
    let JsonRpcRequest {
        jsonrpc,
        method,
        params,
        id,
    } = request;

    if jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::error(
            id,
            JsonRpcError::new(
                codes::INVALID_REQUEST,
                "Invalid JSON-RPC version, expected 2.0",
            ),
        );
    }

    tracing::debug!(%method, %id, "dispatching JSON-RPC request");

    let result = match method.as_str() {
        A2AOperation::SEND_MESSAGE => match parse_params(params) {
            Ok(params) => to_result(handler.on_message_send(params).await),
            Err(error) => Err(error),
        },
        A2AOperation::GET_TASK => match parse_params(params) {
            Ok(params) => to_result(handler.on_get_task(params).await),
            Err(error) => Err(error),
        },
        A2AOperation::CANCEL_TASK => match parse_params(params) {
            Ok(params) => to_result(handler.on_cancel_task(params).await),
            Err(error) => Err(error),
        },
        other => Err(JsonRpcError::new(
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    };

    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(error) => {
            tracing::debug!(%method, code = error.code, message = %error.message, "request failed");
            JsonRpcResponse::error(id, error)
        }
    }
}

fn parse_params<P: DeserializeOwned>(params: Value) -> Result<P, JsonRpcError> {
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::new(codes::INVALID_PARAMS, format!("Invalid params: {e}")))
}

fn to_result<T: Serialize>(result: Result<T, A2AError>) -> Result<Value, JsonRpcError> {
    result
        .and_then(|value| serde_json::to_value(value).map_err(A2AError::from))
        .map_err(|e| {
            let mut error = JsonRpcError::from(&e);
            // The handler produced the value; failing to encode it is on us
            if matches!(e, A2AError::Serialization(_)) {
                error.code = codes::INTERNAL_ERROR;
            }
            error
        })
}
