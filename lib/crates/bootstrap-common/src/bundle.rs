use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder printed in place of secret material.
pub const REDACTED: &str = "********";

/// AWS account and EC2 certificate material for bundling images.
///
/// Every field is an opaque string supplied once at configuration time.
/// The record is never mutated after construction; share it by reference.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleCredentials {
    account_number: String,
    remote_ec2_private_key: String,
    local_ec2_private_key: String,
    remote_ec2_cert: String,
    local_ec2_cert: String,
    access_key_id: String,
    secret_access_key: String,
    bucket: String,
}

impl BundleCredentials {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        account_number: impl Into<String>,
        remote_ec2_private_key: impl Into<String>,
        local_ec2_private_key: impl Into<String>,
        remote_ec2_cert: impl Into<String>,
        local_ec2_cert: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            remote_ec2_private_key: remote_ec2_private_key.into(),
            local_ec2_private_key: local_ec2_private_key.into(),
            remote_ec2_cert: remote_ec2_cert.into(),
            local_ec2_cert: local_ec2_cert.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
        }
    }

    #[must_use]
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Path of the EC2 private key on the instance being bundled.
    #[must_use]
    pub fn remote_ec2_private_key(&self) -> &str {
        &self.remote_ec2_private_key
    }

    /// Path of the EC2 private key on this machine.
    #[must_use]
    pub fn local_ec2_private_key(&self) -> &str {
        &self.local_ec2_private_key
    }

    /// Path of the EC2 certificate on the instance being bundled.
    #[must_use]
    pub fn remote_ec2_cert(&self) -> &str {
        &self.remote_ec2_cert
    }

    /// Path of the EC2 certificate on this machine.
    #[must_use]
    pub fn local_ec2_cert(&self) -> &str {
        &self.local_ec2_cert
    }

    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// S3 bucket the bundled image is uploaded to.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns a copy with the secret access key replaced by [`REDACTED`].
    ///
    /// Used when the record is displayed or serialised for humans.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            secret_access_key: REDACTED.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for BundleCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleCredentials")
            .field("account_number", &self.account_number)
            .field("remote_ec2_private_key", &self.remote_ec2_private_key)
            .field("local_ec2_private_key", &self.local_ec2_private_key)
            .field("remote_ec2_cert", &self.remote_ec2_cert)
            .field("local_ec2_cert", &self.local_ec2_cert)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &REDACTED)
            .field("bucket", &self.bucket)
            .finish()
    }
}
