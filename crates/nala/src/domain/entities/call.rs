//! Web Call - Credentials for a live audio session

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Short-lived web call credentials, as returned by create-web-call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebCall {
    pub access_token: String,
    pub call_id: String,
}

/// Parameters handed to the call client when starting a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartCallParams {
    pub access_token: String,
    pub call_id: String,
    pub sample_rate: u32,
    /// Ask the client to emit transcript updates
    pub enable_update: bool,
}

impl StartCallParams {
    pub fn from_web_call(call: WebCall) -> Self {
        Self {
            access_token: call.access_token,
            call_id: call.call_id,
            sample_rate: DEFAULT_SAMPLE_RATE,
            enable_update: true,
        }
    }
}
