use chrono::Utc;
use serde::Serialize;

use crate::error::ImportError;
use crate::import::session::{ImportSession, ImportStep};
use crate::notify::{NoticeKind, Notifier};
use crate::store::AccountStore;

/// Summary of a successful commit: trades appended per account, the names
/// of the accounts written, and the P&L each balance was adjusted by.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub accounts: Vec<String>,
    pub total_pnl: f64,
}

impl ImportSession {
    /// Persist the valid trades into every selected account and adjust the
    /// stored balances. One awaited fetch, one awaited overwrite of the
    /// whole collection; nothing is written if the fetch fails, and a
    /// failed write leaves the session in the confirm step so the user can
    /// retry.
    pub async fn commit(
        &mut self,
        store: &dyn AccountStore,
        notifier: &dyn Notifier,
        user_id: &str,
    ) -> Result<ImportOutcome, ImportError> {
        self.expect_step(ImportStep::Confirm)?;

        if self.selected_accounts().is_empty() {
            return Err(ImportError::NoAccountsAvailable);
        }

        let mut accounts = store
            .fetch_accounts(user_id)
            .await
            .map_err(|e| ImportError::StoreUnavailable(e.to_string()))?;
        if accounts.is_empty() {
            notifier.notify(
                NoticeKind::Error,
                "No accounts found",
                Some("Create an account before importing trades"),
            );
            return Err(ImportError::NoAccountsAvailable);
        }

        for selected in self.selected_accounts() {
            if !accounts.iter().any(|a| &a.id == selected) {
                return Err(ImportError::StoreUnavailable(format!(
                    "account {} not found",
                    selected
                )));
            }
        }

        let trades = self.valid_trades();
        let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
        let now = Utc::now().timestamp();
        let mut written_names = Vec::new();

        // The same trade set applies to each selected account independently,
        // so every appended record gets its own identifier.
        for account in accounts.iter_mut() {
            if !self.selected_accounts().contains(&account.id) {
                continue;
            }
            account
                .trades
                .extend(trades.iter().map(|t| t.with_fresh_id()));
            account.balance += total_pnl;
            account.updated_at = now;
            written_names.push(account.name.clone());
        }

        if let Err(e) = store.put_accounts(user_id, &accounts).await {
            log::error!("Import commit failed: {}", e);
            notifier.notify(
                NoticeKind::Error,
                "Import failed",
                Some(&e.to_string()),
            );
            return Err(ImportError::CommitFailure(e.to_string()));
        }

        let outcome = ImportOutcome {
            imported: trades.len(),
            accounts: written_names,
            total_pnl,
        };

        log::info!(
            "Imported {} trades into {} account(s)",
            outcome.imported,
            outcome.accounts.len()
        );
        notifier.notify(
            NoticeKind::Success,
            &format!("Imported {} trades", outcome.imported),
            Some(&format!("Accounts: {}", outcome.accounts.join(", "))),
        );
        self.mark_complete();
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::mapping::TargetField;
    use crate::models::Account;
    use crate::notify::LogNotifier;
    use crate::store::MemoryStore;

    const CSV: &str = "Symbol,Date,Type,Entry,Exit,Size\n\
                       AAPL,01/15/2024,Long,100,110,10\n\
                       MSFT,01/16/2024,Short,200,190,5\n";

    fn confirmed_session() -> ImportSession {
        let mut session = ImportSession::new();
        session.upload(CSV).unwrap();
        for (field, column) in TargetField::REQUIRED.iter().zip([
            "Symbol", "Date", "Type", "Entry", "Exit", "Size",
        ]) {
            session.map_column(*field, column).unwrap();
        }
        session.process().unwrap();
        session.proceed_to_confirm().unwrap();
        session
    }

    fn seeded_store() -> (MemoryStore, String, String) {
        let store = MemoryStore::new();
        let a = Account::new("Main", "ProBroker", 1000.0);
        let b = Account::new("Swing", "OtherBroker", 500.0);
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        store.seed("local", vec![a, b]);
        (store, id_a, id_b)
    }

    #[tokio::test]
    async fn commits_into_every_selected_account() {
        let (store, id_a, id_b) = seeded_store();
        let mut session = confirmed_session();
        session
            .select_accounts(vec![id_a.clone(), id_b.clone()])
            .unwrap();

        let outcome = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap();

        // AAPL: (110-100)*5*10 = 500; MSFT: (190-200)*-1*5*5 = 250.
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.total_pnl, 750.0);
        assert_eq!(session.step(), ImportStep::Complete);

        let accounts = store.fetch_accounts("local").await.unwrap();
        let a = accounts.iter().find(|a| a.id == id_a).unwrap();
        let b = accounts.iter().find(|a| a.id == id_b).unwrap();
        assert_eq!(a.trades.len(), 2);
        assert_eq!(b.trades.len(), 2);
        assert_eq!(a.balance, 1750.0);
        assert_eq!(b.balance, 1250.0);

        // Each account got its own copy under a fresh identifier.
        assert_ne!(a.trades[0].id, b.trades[0].id);
    }

    #[tokio::test]
    async fn unselected_accounts_are_untouched() {
        let (store, id_a, id_b) = seeded_store();
        let mut session = confirmed_session();
        session.select_accounts(vec![id_a]).unwrap();

        session.commit(&store, &LogNotifier, "local").await.unwrap();

        let accounts = store.fetch_accounts("local").await.unwrap();
        let b = accounts.iter().find(|a| a.id == id_b).unwrap();
        assert!(b.trades.is_empty());
        assert_eq!(b.balance, 500.0);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_before_any_write() {
        let (store, id_a, _) = seeded_store();
        store.fail_next_fetch();
        let mut session = confirmed_session();
        session.select_accounts(vec![id_a]).unwrap();

        let err = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::StoreUnavailable(_)));
        // The session stays in confirm so the user may retry manually.
        assert_eq!(session.step(), ImportStep::Confirm);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn write_failure_keeps_the_session_in_confirm() {
        let (store, id_a, _) = seeded_store();
        store.fail_next_put();
        let mut session = confirmed_session();
        session.select_accounts(vec![id_a.clone()]).unwrap();

        let err = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::CommitFailure(_)));
        assert_eq!(session.step(), ImportStep::Confirm);

        // Store content is unchanged; retry succeeds.
        let accounts = store.fetch_accounts("local").await.unwrap();
        assert!(accounts.iter().all(|a| a.trades.is_empty()));

        session.commit(&store, &LogNotifier, "local").await.unwrap();
        assert_eq!(session.step(), ImportStep::Complete);
    }

    #[tokio::test]
    async fn empty_store_reports_no_accounts() {
        let store = MemoryStore::new();
        let mut session = confirmed_session();
        session.select_accounts(vec!["ACCT-missing".to_string()]).unwrap();

        let err = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NoAccountsAvailable));
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let (store, _, _) = seeded_store();
        let mut session = confirmed_session();

        let err = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::NoAccountsAvailable));
    }

    #[tokio::test]
    async fn unknown_selected_account_fails_before_writing() {
        let (store, _, _) = seeded_store();
        let mut session = confirmed_session();
        session
            .select_accounts(vec!["ACCT-bogus".to_string()])
            .unwrap();

        let err = session
            .commit(&store, &LogNotifier, "local")
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::StoreUnavailable(_)));
        assert_eq!(store.write_count(), 0);
    }
}
