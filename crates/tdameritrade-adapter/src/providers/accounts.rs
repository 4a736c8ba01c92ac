/*
[INPUT]:  Account identifier and field expansions
[OUTPUT]: Securities accounts with balances, positions and orders
[POS]:    Provider layer - accounts endpoints (GET /accounts, /accounts/{id})
[UPDATE]: When account expansions or envelope shape change
*/

use async_trait::async_trait;
use tracing::debug;

use crate::http::{QueryParams, Result, TdAmeritradeClient, TdAmeritradeError};
use crate::types::{Account, AccountEnvelope, AccountField, AccountId};

#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn get_account(&self, account_id: &AccountId, fields: &[AccountField]) -> Result<Account>;

    async fn get_accounts(&self, fields: &[AccountField]) -> Result<Vec<Account>>;
}

/// `fields=positions,orders`, deduplicated in canonical order; omitted when empty
pub(crate) fn fields_query(fields: &[AccountField]) -> QueryParams {
    let mut fields = fields.to_vec();
    fields.sort();
    fields.dedup();
    if fields.is_empty() {
        return Vec::new();
    }
    let joined = fields
        .iter()
        .map(AccountField::as_str)
        .collect::<Vec<_>>()
        .join(",");
    vec![("fields", joined)]
}

#[async_trait]
impl AccountProvider for TdAmeritradeClient {
    async fn get_account(&self, account_id: &AccountId, fields: &[AccountField]) -> Result<Account> {
        if account_id.is_empty() {
            return Err(TdAmeritradeError::InvalidRequest(
                "account id is empty".to_string(),
            ));
        }
        let segments = ["accounts", account_id.as_str().trim()];
        let envelope: AccountEnvelope = self
            .get_json("account", &segments, &fields_query(fields))
            .await?;
        debug!(account = %account_id, "account fetched");
        Ok(envelope.securities_account)
    }

    async fn get_accounts(&self, fields: &[AccountField]) -> Result<Vec<Account>> {
        let envelopes: Vec<AccountEnvelope> = self
            .get_json("accounts", &["accounts"], &fields_query(fields))
            .await?;
        debug!(count = envelopes.len(), "accounts fetched");
        Ok(envelopes
            .into_iter()
            .map(|envelope| envelope.securities_account)
            .collect())
    }
}
