use std::collections::BTreeMap;

use k8s_openapi::ByteString;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, PostParams};

use crate::error::RelayError;
use crate::settings::Settings;

const DEFAULT_SECRET_KEY: &str = "vault-token";

/// Upserts the token into a cluster Secret object.
pub struct KubernetesSecretWriter {
    client: kube::Client,
    namespace: String,
    secret_name: String,
    secret_key: String,
}

impl std::fmt::Debug for KubernetesSecretWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubernetesSecretWriter")
            .field("namespace", &self.namespace)
            .field("secret_name", &self.secret_name)
            .field("secret_key", &self.secret_key)
            .finish_non_exhaustive()
    }
}

impl KubernetesSecretWriter {
    /// Addressing is validated before the in-cluster client is built, so
    /// an incomplete config never touches the cluster.
    pub async fn from_settings(settings: &Settings) -> Result<Self, RelayError> {
        let (namespace, secret_name, secret_key) = addressing(settings)?;

        let client = kube::Client::try_default()
            .await
            .map_err(|e| RelayError::KubeClient(e.to_string()))?;

        Ok(Self::new(client, namespace, secret_name, secret_key))
    }

    pub fn new(
        client: kube::Client,
        namespace: String,
        secret_name: String,
        secret_key: String,
    ) -> Self {
        Self {
            client,
            namespace,
            secret_name,
            secret_key,
        }
    }

    fn secret_object(&self, data: &[u8]) -> Secret {
        let mut payload = BTreeMap::new();
        payload.insert(self.secret_key.clone(), ByteString(data.to_vec()));

        Secret {
            metadata: ObjectMeta {
                name: Some(self.secret_name.clone()),
                ..ObjectMeta::default()
            },
            type_: Some("Opaque".to_string()),
            data: Some(payload),
            ..Secret::default()
        }
    }

    /// Update first; only a not-found update falls back to create. The
    /// ordering makes a concurrent external delete surface as a create
    /// failure instead of silent loss, and a repeated write overwrites
    /// in place rather than duplicating the object.
    pub async fn write(&self, data: &[u8]) -> Result<(), RelayError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        let secret = self.secret_object(data);

        match secrets
            .replace(&self.secret_name, &PostParams::default(), &secret)
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => secrets
                .create(&PostParams::default(), &secret)
                .await
                .map(|_| ())
                .map_err(|e| self.delivery(format!("failed to create secret: {e}"))),
            Err(e) => Err(self.delivery(format!("failed to write secret: {e}"))),
        }
    }

    fn delivery(&self, reason: String) -> RelayError {
        RelayError::DeliveryFailed {
            destination: "kubernetes-secret",
            reason,
        }
    }
}

fn addressing(settings: &Settings) -> Result<(String, String, String), RelayError> {
    let secret_name = match settings.output_secret_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(RelayError::MissingSecretName),
    };

    let namespace = match settings.output_secret_namespace.as_deref().map(str::trim) {
        Some(ns) if !ns.is_empty() => ns.to_string(),
        _ => return Err(RelayError::MissingSecretNamespace),
    };

    let secret_key = settings
        .output_secret_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_SECRET_KEY)
        .to_string();

    Ok((namespace, secret_name, secret_key))
}
