//! Typed S3 bucket policy documents.
//!
//! The document is built from a validated [`BucketName`] and serialized with
//! serde, so the bucket name never reaches the JSON unescaped.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::BucketName;

pub const POLICY_VERSION: &str = "2012-10-17";

/// An IAM-style policy document attached to a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

/// One statement of a [`PolicyDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub sid: String,
    pub effect: Effect,
    pub principal: String,
    pub action: Vec<String>,
    pub resource: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

impl PolicyDocument {
    /// Everyone may `s3:GetObject` every key in `bucket`.
    pub fn public_read(bucket: &BucketName) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement: vec![Statement {
                sid: "PublicReadGetObject".to_string(),
                effect: Effect::Allow,
                principal: "*".to_string(),
                action: vec!["s3:GetObject".to_string()],
                resource: vec![format!("arn:aws:s3:::{bucket}/*")],
            }],
        }
    }

    /// Serialize to the compact JSON string `PutBucketPolicy` expects.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}
