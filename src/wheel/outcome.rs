//! Draw outcomes and the JSON envelopes they arrive in
//!
//! The engine never performs requests itself; these types only describe
//! what the configuration and draw services hand back.

use serde::{Deserialize, Serialize};

use super::sector::Tier;
use crate::error::{Result, WheelError};

/// Server-chosen result of one draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawOutcome {
    #[serde(alias = "level")]
    pub tier: Tier,
    pub label: String,
    /// Redemption code
    #[serde(alias = "cdk")]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
}

/// `{ "success": bool, "data": T, "message": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful payload, or the service's rejection reason
    pub fn into_result(self) -> Result<T> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(WheelError::DrawRejected(
                "response carried no data".to_string(),
            )),
            (false, _) => Err(WheelError::DrawRejected(
                self.message.unwrap_or_else(|| "request rejected".to_string()),
            )),
        }
    }
}

impl<T: serde::de::DeserializeOwned> ApiResponse<T> {
    pub fn from_json(body: &str) -> Result<T> {
        serde_json::from_str::<ApiResponse<T>>(body)?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::sector::SectorSpec;

    #[test]
    fn test_spin_response() {
        let body = r#"{"success":true,"data":{"level":"major","label":"5000x","cdk":"ABCD-1234","times":5000,"quota":2500000}}"#;
        let outcome: DrawOutcome = ApiResponse::from_json(body).unwrap();
        assert_eq!(outcome.tier, Tier::new("major"));
        assert_eq!(outcome.code, "ABCD-1234");
        assert_eq!(outcome.quota, Some(2_500_000));
    }

    #[test]
    fn test_rejection_carries_message() {
        let body = r#"{"success":false,"message":"quota exhausted"}"#;
        match ApiResponse::<DrawOutcome>::from_json(body) {
            Err(WheelError::DrawRejected(msg)) => assert_eq!(msg, "quota exhausted"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_fields_are_none() {
        // DrawOutcome has no Default; absent optional fields must still parse
        let bare: ApiResponse<DrawOutcome> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(bare.data.is_none());
        assert!(bare.message.is_none());
        match bare.into_result() {
            Err(WheelError::DrawRejected(msg)) => assert_eq!(msg, "request rejected"),
            other => panic!("unexpected {other:?}"),
        }

        match ApiResponse::<DrawOutcome>::from_json(r#"{"success":true}"#) {
            Err(WheelError::DrawRejected(msg)) => assert_eq!(msg, "response carried no data"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_config_response() {
        let body = r#"{"success":true,"data":[{"label":"All","probability":100,"level":"all"}]}"#;
        let specs: Vec<SectorSpec> = ApiResponse::from_json(body).unwrap();
        assert_eq!(specs.len(), 1);
    }

    #[test]
    fn test_malformed_body() {
        assert!(matches!(
            ApiResponse::<DrawOutcome>::from_json("not json"),
            Err(WheelError::Serialization(_))
        ));
    }
}
