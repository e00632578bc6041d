use async_trait::async_trait;
use std::fmt::Debug;

use super::{Credential, CredentialType};
use crate::domain::DomainError;

/// Where provider keys come from
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Credential for one provider backend
    async fn get_credential(&self, credential_type: CredentialType) -> Result<Credential, DomainError>;

    /// True if a key is present for `credential_type`
    async fn has_credential(&self, credential_type: CredentialType) -> bool;

    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed set of credentials, counting lookups
    #[derive(Debug, Default)]
    pub struct MockCredentialProvider {
        credentials: Vec<Credential>,
        lookups: AtomicUsize,
    }

    impl MockCredentialProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_credential(mut self, credential: Credential) -> Self {
            self.credentials
                .retain(|c| c.credential_type() != credential.credential_type());
            self.credentials.push(credential);
            self
        }

        pub fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }

        fn find(&self, credential_type: CredentialType) -> Option<&Credential> {
            self.credentials
                .iter()
                .find(|c| c.credential_type() == credential_type)
        }
    }

    #[async_trait]
    impl CredentialProvider for MockCredentialProvider {
        async fn get_credential(
            &self,
            credential_type: CredentialType,
        ) -> Result<Credential, DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.find(credential_type).cloned().ok_or_else(|| {
                DomainError::credential(format!("No {} credential configured", credential_type))
            })
        }

        async fn has_credential(&self, credential_type: CredentialType) -> bool {
            self.find(credential_type).is_some()
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}
