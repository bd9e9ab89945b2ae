//! Entry function payloads in the node's JSON submission format

use serde::{Deserialize, Serialize};
use serde_json::Value;

use tontine_types::Address;

use crate::core::SdkResult;

pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// A call to `<module>::<function>` ready for a wallet to sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    pub fn new(function: String, arguments: Vec<Value>) -> Self {
        Self {
            kind: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }

    /// Function name without the module prefix
    pub fn function_name(&self) -> &str {
        self.function.rsplit("::").next().unwrap_or(&self.function)
    }

    pub fn to_json_pretty(&self) -> SdkResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds payloads for one deployed tontine module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadBuilder {
    module_id: String,
}

impl PayloadBuilder {
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub(crate) fn call(&self, function: &str, arguments: Vec<Value>) -> EntryFunctionPayload {
        EntryFunctionPayload::new(format!("{}::{}", self.module_id, function), arguments)
    }
}

/// Move `address` argument
pub(crate) fn address_arg(address: &Address) -> Value {
    Value::String(address.to_string())
}

/// Move `u64` argument; the node expects decimal strings
pub(crate) fn u64_arg(value: u64) -> Value {
    Value::String(value.to_string())
}

pub(crate) fn u8_arg(value: u8) -> Value {
    Value::from(value)
}
