#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use crate::service::code_vault::CodeVault;

    #[tokio::test]
    async fn generated_codes_are_unique_and_active() {
        let vault = CodeVault::new(6);
        let mut seen = HashSet::new();

        for _ in 0..1_000 {
            let code = vault.create_code().unwrap();

            assert_eq!(code.len(), 6);
            assert!(vault.is_active(&code));
            assert!(seen.insert(code), "Vault handed out a duplicate code");
        }
    }

    #[tokio::test]
    async fn codes_never_contain_ambiguous_characters() {
        let vault = CodeVault::new(6);

        for _ in 0..200 {
            let code = vault.create_code().unwrap();
            assert!(!code.contains(['O', '0', 'I', '1']), "Ambiguous code: {}", code);
        }
    }

    #[tokio::test]
    async fn released_code_is_no_longer_active() {
        let vault = CodeVault::new(6);

        let code = vault.create_code().unwrap();
        assert!(vault.is_active(&code));

        vault.release_code(&code);
        assert!(!vault.is_active(&code));
    }

    #[tokio::test]
    async fn adopted_code_counts_as_active() {
        let vault = CodeVault::new(6);

        vault.adopt_code("ABC234").unwrap();
        assert!(vault.is_active("ABC234"));

        // Generation must route around the adopted code too.
        for _ in 0..100 {
            assert_ne!(vault.create_code().unwrap(), "ABC234");
        }
    }

    #[tokio::test]
    async fn concurrent_creation_yields_unique_codes() {
        let vault = Arc::new(CodeVault::new(6));
        let mut handles = Vec::new();

        for _ in 0..100 {
            let vault_clone = Arc::clone(&vault);
            handles.push(tokio::spawn(
                async move { vault_clone.create_code().unwrap() },
            ));
        }

        let results = futures::future::join_all(handles).await;

        let mut unique = HashSet::new();
        for result in results {
            let code = result.unwrap();
            assert!(unique.insert(code.clone()), "Duplicate code: {}", code);
        }

        assert_eq!(unique.len(), 100);
    }
}
