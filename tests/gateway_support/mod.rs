#![allow(dead_code)]

use std::time::Duration;

use chargeamps_gateway::api::ApiClient;
use chargeamps_gateway::config::GatewayConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&GatewayConfig::new(server.uri())).expect("build client")
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> ApiClient {
    ApiClient::new(&GatewayConfig::new(server.uri()).with_timeout(timeout)).expect("build client")
}

/// Response body of `auth/login` and `auth/refreshToken`.
pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "token": access,
        "refreshToken": refresh,
        "user": {
            "id": "u1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "a@b.com",
            "mobile": "+4670000000",
            "rfidTags": [{"active": true, "rfid": "04AB", "rfidDec": "1195", "rfidDecReverse": "43780"}],
            "userStatus": "Valid"
        }
    })
}

pub fn blob(access: &str, refresh: &str) -> String {
    token_body(access, refresh).to_string()
}

/// Authorization header values of every request the server received.
pub async fn authorization_headers(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|req| {
            req.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        })
        .collect()
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .len()
}
